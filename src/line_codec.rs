// src/line_codec.rs
//! Hex text front-end for the packet codec
//!
//! One packet per line, hex encoded. Whitespace inside a line is ignored on
//! the way in, output is always lowercase.

use std::io::{BufRead, Write};

use crate::aliases::Password;
use crate::consts::MIN_PACKET_HEX_LEN;
use crate::crypto::{decrypt, encrypt};
use crate::error::{CoreError, Result};
use crate::memory::SecureBytes;

pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Strict hex decoding: odd lengths and non-hex characters are a
/// [`CoreError::Format`].
pub fn from_hex(text: &str) -> Result<Vec<u8>> {
    hex::decode(text).map_err(|e| CoreError::format(format!("invalid hex: {e}")))
}

pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn encode_line(plaintext: &[u8], password: &Password) -> Result<String> {
    Ok(to_hex(&encrypt(plaintext, password)?))
}

/// Inverse of [`encode_line`]. Malformed hex never reaches the key derivation.
pub fn decode_line(text: &str, password: &Password) -> Result<SecureBytes> {
    let packet = from_hex(&strip_whitespace(text))?;
    decrypt(&packet, password)
}

/// Every maximal run of hex digits long enough to be a packet (even length,
/// at least [`MIN_PACKET_HEX_LEN`] characters), in order of appearance.
pub fn extract_hex_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = None;

    // hex digits are ASCII, so byte offsets are always char boundaries here
    for (i, b) in text.bytes().enumerate().chain(std::iter::once((text.len(), b' '))) {
        match (b.is_ascii_hexdigit(), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                let run = &text[s..i];
                if run.len() >= MIN_PACKET_HEX_LEN && run.len() % 2 == 0 {
                    tokens.push(run);
                }
                start = None;
            }
            _ => {}
        }
    }
    tokens
}

/// Try every candidate token in `text`; failures are kept alongside the token
/// so the caller can report them.
pub fn decode_tokens<'a>(
    text: &'a str,
    password: &Password,
) -> Vec<(&'a str, Result<SecureBytes>)> {
    extract_hex_tokens(text)
        .into_iter()
        .map(|token| (token, decode_line(token, password)))
        .collect()
}

/// Encrypt every non-blank line of `input` into one hex line of `output`.
/// Returns the number of lines written.
pub fn encode_stream<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    password: &Password,
) -> Result<usize> {
    let mut count = 0;
    for line in input.lines() {
        let line = zeroize::Zeroizing::new(line?);
        if line.trim().is_empty() {
            continue;
        }
        writeln!(output, "{}", encode_line(line.as_bytes(), password)?)?;
        count += 1;
    }
    output.flush()?;
    Ok(count)
}

/// Decrypt every non-blank hex line of `input`. Stops at the first line that
/// fails; nothing of that line is written.
pub fn decode_stream<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    password: &Password,
) -> Result<usize> {
    let mut count = 0;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let plain = decode_line(&line, password)?;
        output.write_all(plain.as_bytes())?;
        output.write_all(b"\n")?;
        count += 1;
    }
    output.flush()?;
    tracing::debug!(lines = count, "decoded stream");
    Ok(count)
}
