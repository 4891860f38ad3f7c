// src/crypto/kdf.rs
use scrypt::{scrypt, Params};

use crate::consts::{KEY_LEN, SALT_LEN, SCRYPT_LOG_N, SCRYPT_P, SCRYPT_R};
use crate::error::{CoreError, Result};
use crate::memory::SecureBytes;

/// scrypt(password, salt) straight into a hardened buffer.
///
/// Deterministic for a given pair; different salts give unrelated keys.
/// Blocks for one full derivation (64 MiB, tens to hundreds of ms).
pub fn derive_key(password: &[u8], salt: &[u8; SALT_LEN]) -> Result<SecureBytes> {
    let params = Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, KEY_LEN)
        .map_err(|e| CoreError::Crypto(format!("scrypt params: {e}")))?;

    let mut key = SecureBytes::zeroed(KEY_LEN)?;
    scrypt(password, salt, &params, key.as_bytes_mut())
        .map_err(|e| CoreError::Crypto(format!("scrypt output: {e}")))?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_same_key() {
        let salt = [7u8; SALT_LEN];
        let a = derive_key(b"correct horse", &salt).unwrap();
        let b = derive_key(b"correct horse", &salt).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_eq!(a.len(), KEY_LEN);
    }

    #[test]
    fn different_salt_different_key() {
        let a = derive_key(b"correct horse", &[1u8; SALT_LEN]).unwrap();
        let b = derive_key(b"correct horse", &[2u8; SALT_LEN]).unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn empty_password_still_derives() {
        let key = derive_key(b"", &[0u8; SALT_LEN]).unwrap();
        assert_ne!(key.as_bytes(), &[0u8; KEY_LEN]);
    }
}
