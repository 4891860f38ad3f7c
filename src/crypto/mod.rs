// src/crypto/mod.rs
//! Password-based authenticated encryption
//!
//! Packet layout: `salt[16] | nonce[12] | tag[16] | ciphertext[n]`. Every
//! call derives its own key from a fresh salt, so the same plaintext never
//! encrypts to the same packet twice.

pub mod decrypt;
pub mod encrypt;
pub mod kdf;
pub mod packet;

pub use decrypt::{decrypt, decrypt_to_vec};
pub use encrypt::encrypt;

pub(crate) use decrypt::decrypt_with;
pub(crate) use encrypt::encrypt_with;
pub use kdf::derive_key;
pub use packet::Packet;

use aes_gcm::aead::KeyInit;
use aes_gcm::Aes256Gcm;

use crate::error::{CoreError, Result};
use crate::memory::SecureBytes;

fn cipher_for(key: &SecureBytes) -> Result<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|e| CoreError::Crypto(e.to_string()))
}
