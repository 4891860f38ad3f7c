// src/lib.rs
//! sealed-vault: local credential store with hardened in-memory secrets
//!
//! - [`SecureBytes`]: guard-paged, mlock'd, canary-checked, wiped on drop
//! - scrypt + AES-256-GCM packets: `salt | nonce | tag | ciphertext`
//! - [`Vault`]: records decrypted one field at a time, on demand
//! - hex line codec and whole-file helpers

#[cfg(not(unix))]
compile_error!("sealed-vault relies on mmap/mprotect/mlock and only builds on unix targets");

pub mod aliases;
pub mod config;
pub mod consts;
pub mod crypto;
pub mod error;
pub mod file_ops;
pub mod hardening;
pub mod line_codec;
#[cfg(feature = "logging")]
pub mod logging;
pub mod memory;
pub mod vault;

pub use aliases::{CypherText, Password, PlainText};
pub use config::load as load_config;
pub use crypto::{decrypt, decrypt_to_vec, encrypt};
pub use error::{CoreError, Result};
pub use file_ops::{
    decrypt_directory, decrypt_file, decrypt_file_in_place, encrypt_directory, encrypt_file,
    encrypt_file_in_place, process_path, BatchReport,
};
pub use hardening::harden_process;
pub use line_codec::{decode_line, encode_line};
pub use memory::{SealedBytes, SecureBytes};
pub use vault::{locate_vault, Vault};
