// src/aliases.rs
//! Secret-carrying types used across the public API

use zeroize::Zeroizing;

use crate::memory::SecureBytes;

/// User password, kept in hardened memory for the duration of a call
pub type Password = SecureBytes;

/// Bulk plaintext too large to lock, zeroed on drop
pub type PlainText = Zeroizing<Vec<u8>>;

/// `salt | nonce | tag | ciphertext` packet bytes
pub type CypherText = Vec<u8>;
