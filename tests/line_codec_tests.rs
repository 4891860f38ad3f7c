// tests/line_codec_tests.rs
mod common;

use std::io::Cursor;

use common::{password, setup, wrong_password};
use sealed_vault::consts::MIN_PACKET_HEX_LEN;
use sealed_vault::line_codec::*;
use sealed_vault::CoreError;

#[test]
fn test_hex_roundtrip_and_case() {
    let bytes = [0x00, 0x7f, 0x80, 0xff];
    let hex = to_hex(&bytes);
    assert_eq!(hex, "007f80ff");
    assert_eq!(from_hex(&hex).unwrap(), bytes);
    assert_eq!(from_hex(&hex.to_uppercase()).unwrap(), bytes);
    assert!(from_hex("").unwrap().is_empty());
}

#[test]
fn test_invalid_hex_never_reaches_decryption() {
    setup();
    let line = encode_line(b"x", &password()).unwrap();

    let odd = &line[..line.len() - 1];
    assert!(matches!(decode_line(odd, &password()), Err(CoreError::Format(_))));

    let mut bad = line.clone();
    bad.replace_range(0..1, "g");
    assert!(matches!(decode_line(&bad, &password()), Err(CoreError::Format(_))));
}

#[test]
fn test_decode_line_ignores_interspersed_whitespace() {
    setup();
    let line = encode_line(b"wrapped", &password()).unwrap();
    let wrapped: String = line
        .as_bytes()
        .chunks(16)
        .map(|c| std::str::from_utf8(c).unwrap())
        .collect::<Vec<_>>()
        .join("\n  ");
    assert_eq!(decode_line(&format!(" {wrapped}\t"), &password()).unwrap().as_bytes(), b"wrapped");
}

#[test]
fn test_tokens_embedded_in_document() {
    setup();
    let first = encode_line(b"first", &password()).unwrap();
    let second = encode_line(b"second", &wrong_password()).unwrap();
    let doc = format!("config:\n  a = \"{first}\"\n  b = {second}\n  c = cafe\n");

    let results = decode_tokens(&doc, &password());
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].0, first);
    assert_eq!(results[0].1.as_ref().unwrap().as_bytes(), b"first");
    assert!(matches!(results[1].1, Err(CoreError::Authentication)));
}

#[test]
fn test_minimum_token_length() {
    let text = format!("{} {}", "ab".repeat(MIN_PACKET_HEX_LEN / 2), "ab".repeat(10));
    assert_eq!(extract_hex_tokens(&text).len(), 1);
}

#[test]
fn test_stream_roundtrip_skips_blank_lines() {
    setup();
    let input = "alpha\n\nbeta gamma\n   \ndelta\n";
    let mut encoded = Vec::new();
    assert_eq!(encode_stream(Cursor::new(input), &mut encoded, &password()).unwrap(), 3);

    let encoded = String::from_utf8(encoded).unwrap();
    assert!(encoded.lines().all(|l| l.len() >= MIN_PACKET_HEX_LEN));

    let mut decoded = Vec::new();
    assert_eq!(decode_stream(Cursor::new(&encoded), &mut decoded, &password()).unwrap(), 3);
    assert_eq!(decoded, b"alpha\nbeta gamma\ndelta\n");
}

#[test]
fn test_stream_stops_at_first_bad_line() {
    setup();
    let good = encode_line(b"ok", &password()).unwrap();
    let input = format!("{good}\nnot-hex\n{good}\n");
    let mut out = Vec::new();
    let err = decode_stream(Cursor::new(input), &mut out, &password()).unwrap_err();
    assert!(matches!(err, CoreError::Format(_)));
    assert_eq!(out, b"ok\n");
}
