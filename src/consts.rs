// src/consts.rs
//! Security parameters and wire-format sizes

/// Random salt prepended to every packet
pub const SALT_LEN: usize = 16;

/// AES-GCM nonce (96 bits)
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag (128 bits)
pub const TAG_LEN: usize = 16;

/// Derived AES-256 key
pub const KEY_LEN: usize = 32;

/// `salt | nonce | tag` with an empty ciphertext
pub const MIN_PACKET_LEN: usize = SALT_LEN + NONCE_LEN + TAG_LEN;

/// Shortest hex string that can possibly hold a packet
pub const MIN_PACKET_HEX_LEN: usize = MIN_PACKET_LEN * 2;

/// scrypt cost: N = 2^16, r = 8, p = 1 (64 MiB per derivation)
// Stored packets carry no parameters, so changing these orphans every existing
// vault.
pub const SCRYPT_LOG_N: u8 = 16;
pub const SCRYPT_R: u32 = 8;
pub const SCRYPT_P: u32 = 1;

/// Sentinel written right after the usable region of a hardened buffer
pub const CANARY_BYTE: u8 = 0xD0;

/// Number of sentinel bytes; also the distance to the trailing guard page
pub const CANARY_LEN: usize = 32;

/// Format marker stored at the top of every vault file
pub const VAULT_FORMAT: &str = "sealed-vault";

/// Current vault file version
pub const VAULT_VERSION: u32 = 1;

/// Extension given to files encrypted in place
pub const DEFAULT_ENCRYPTED_EXT: &str = "sage";

/// Default vault file name looked up by `locate_vault`
pub const DEFAULT_VAULT_FILE_NAME: &str = "sealed.vault";
