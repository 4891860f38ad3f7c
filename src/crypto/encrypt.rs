// src/crypto/encrypt.rs
use aes_gcm::aead::AeadInPlace;
use aes_gcm::Nonce;
use rand::RngCore;

use crate::aliases::{CypherText, Password};
use crate::consts::{MIN_PACKET_LEN, NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::error::{CoreError, Result};

use super::{cipher_for, derive_key};

/// Encrypt `plaintext` under `password` → `salt | nonce | tag | ciphertext`
///
/// Fresh random salt and nonce on every call, no associated data. An empty
/// plaintext yields a valid 44-byte packet.
pub fn encrypt(plaintext: &[u8], password: &Password) -> Result<CypherText> {
    encrypt_with(plaintext, password.as_bytes())
}

pub(crate) fn encrypt_with(plaintext: &[u8], password: &[u8]) -> Result<CypherText> {
    let mut salt = [0u8; SALT_LEN];
    let mut nonce = [0u8; NONCE_LEN];
    let mut rng = rand::rng();
    rng.fill_bytes(&mut salt);
    rng.fill_bytes(&mut nonce);

    let key = derive_key(password, &salt)?;
    let cipher = cipher_for(&key)?;

    let mut packet = Vec::with_capacity(MIN_PACKET_LEN + plaintext.len());
    packet.extend_from_slice(&salt);
    packet.extend_from_slice(&nonce);
    packet.extend_from_slice(&[0u8; TAG_LEN]);
    packet.extend_from_slice(plaintext);

    let tag = cipher
        .encrypt_in_place_detached(Nonce::from_slice(&nonce), b"", &mut packet[MIN_PACKET_LEN..])
        .map_err(|_| CoreError::Crypto("plaintext exceeds AES-GCM limit".into()))?;
    packet[SALT_LEN + NONCE_LEN..MIN_PACKET_LEN].copy_from_slice(&tag);

    tracing::debug!(plaintext_len = plaintext.len(), "encrypted packet");
    Ok(packet)
}
