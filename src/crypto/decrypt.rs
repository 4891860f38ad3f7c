// src/crypto/decrypt.rs
use aes_gcm::aead::AeadInPlace;
use aes_gcm::{Nonce, Tag};
use zeroize::Zeroizing;

use crate::aliases::{Password, PlainText};
use crate::error::{CoreError, Result};
use crate::memory::SecureBytes;

use super::packet::Packet;
use super::{cipher_for, derive_key};

/// Decrypt a packet into a hardened buffer.
///
/// Short input is a [`CoreError::Format`]. A wrong password and a tampered
/// packet both come back as [`CoreError::Authentication`], and nothing of the
/// plaintext survives a failed call.
pub fn decrypt(packet: &[u8], password: &Password) -> Result<SecureBytes> {
    decrypt_with(packet, password.as_bytes())
}

pub(crate) fn decrypt_with(packet: &[u8], password: &[u8]) -> Result<SecureBytes> {
    let packet = Packet::parse(packet)?;
    let mut plaintext = SecureBytes::from_slice(packet.ciphertext)?;
    open_in_place(&packet, password, plaintext.as_bytes_mut())?;
    Ok(plaintext)
}

/// Same as [`decrypt`] for payloads too big to lock, e.g. whole files.
/// The buffer is zeroed when dropped but may be paged out meanwhile.
pub fn decrypt_to_vec(packet: &[u8], password: &Password) -> Result<PlainText> {
    let packet = Packet::parse(packet)?;
    let mut plaintext = Zeroizing::new(packet.ciphertext.to_vec());
    open_in_place(&packet, password.as_bytes(), &mut plaintext)?;
    Ok(plaintext)
}

fn open_in_place(packet: &Packet<'_>, password: &[u8], buf: &mut [u8]) -> Result<()> {
    let key = derive_key(password, packet.salt)?;
    let cipher = cipher_for(&key)?;
    cipher
        .decrypt_in_place_detached(
            Nonce::from_slice(packet.nonce),
            b"",
            buf,
            Tag::from_slice(packet.tag),
        )
        .map_err(|_| CoreError::Authentication)?;

    tracing::debug!(plaintext_len = buf.len(), "decrypted packet");
    Ok(())
}
