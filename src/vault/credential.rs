// src/vault/credential.rs
//! `identity:secret` payloads

use crate::error::Result;
use crate::memory::SecureBytes;

const SEPARATOR: u8 = b':';

/// Build `identity:secret` directly in hardened memory
pub fn join_credential(identity: &[u8], secret: &[u8]) -> Result<SecureBytes> {
    let mut out = SecureBytes::allocate(identity.len() + 1 + secret.len())?;
    out.extend_from_slice(identity);
    out.extend_from_slice(&[SEPARATOR]);
    out.extend_from_slice(secret);
    Ok(out)
}

/// Split at the first `:`. The secret may contain colons, the identity may
/// not. Without a separator the whole payload is the identity.
pub fn split_credential(credential: &SecureBytes) -> (&[u8], &[u8]) {
    let bytes = credential.as_bytes();
    match bytes.iter().position(|&b| b == SEPARATOR) {
        Some(at) => (&bytes[..at], &bytes[at + 1..]),
        None => (bytes, &bytes[bytes.len()..]),
    }
}
