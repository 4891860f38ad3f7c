// src/crypto/packet.rs
use crate::consts::{MIN_PACKET_LEN, NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::error::{CoreError, Result};

/// Borrowed view over the four fields of an encrypted packet
#[derive(Debug, Clone, Copy)]
pub struct Packet<'a> {
    pub salt: &'a [u8; SALT_LEN],
    pub nonce: &'a [u8; NONCE_LEN],
    pub tag: &'a [u8; TAG_LEN],
    pub ciphertext: &'a [u8],
}

impl<'a> Packet<'a> {
    /// Split a packet into its fields. Anything shorter than
    /// [`MIN_PACKET_LEN`] is rejected here, before any key derivation.
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() < MIN_PACKET_LEN {
            return Err(CoreError::format(format!(
                "packet is {} bytes, need at least {MIN_PACKET_LEN}",
                bytes.len()
            )));
        }
        let short = || CoreError::format("truncated packet");
        let (salt, rest) = bytes.split_first_chunk::<SALT_LEN>().ok_or_else(short)?;
        let (nonce, rest) = rest.split_first_chunk::<NONCE_LEN>().ok_or_else(short)?;
        let (tag, ciphertext) = rest.split_first_chunk::<TAG_LEN>().ok_or_else(short)?;
        Ok(Packet {
            salt,
            nonce,
            tag,
            ciphertext,
        })
    }

    /// Total encoded size
    pub fn len(&self) -> usize {
        MIN_PACKET_LEN + self.ciphertext.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ciphertext.is_empty()
    }
}
