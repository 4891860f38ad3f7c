// src/vault/record.rs
use crate::consts::MIN_PACKET_LEN;
use crate::crypto::{decrypt_with, encrypt_with};
use crate::error::{CoreError, Result};
use crate::memory::SecureBytes;

/// One stored entry: two independent packets.
///
/// The label can be opened without touching the credential and vice versa.
#[derive(Clone, PartialEq, Eq)]
pub struct VaultRecord {
    label: Vec<u8>,
    credential: Vec<u8>,
}

impl VaultRecord {
    pub(crate) fn seal(label: &[u8], credential: &[u8], password: &[u8]) -> Result<Self> {
        Ok(VaultRecord {
            label: encrypt_with(label, password)?,
            credential: encrypt_with(credential, password)?,
        })
    }

    /// Wrap packets read from disk, checking only their framing
    pub(crate) fn from_packets(label: Vec<u8>, credential: Vec<u8>) -> Result<Self> {
        for (field, packet) in [("label", &label), ("credential", &credential)] {
            if packet.len() < MIN_PACKET_LEN {
                return Err(CoreError::format(format!(
                    "{field} packet is {} bytes, need at least {MIN_PACKET_LEN}",
                    packet.len()
                )));
            }
        }
        Ok(VaultRecord { label, credential })
    }

    pub fn label_packet(&self) -> &[u8] {
        &self.label
    }

    pub fn credential_packet(&self) -> &[u8] {
        &self.credential
    }

    pub(crate) fn open_label(&self, password: &[u8]) -> Result<SecureBytes> {
        decrypt_with(&self.label, password)
    }

    pub(crate) fn open_credential(&self, password: &[u8]) -> Result<SecureBytes> {
        decrypt_with(&self.credential, password)
    }

    /// Fresh salt and nonce for the credential, label packet untouched
    pub(crate) fn reseal_credential(&mut self, credential: &[u8], password: &[u8]) -> Result<()> {
        self.credential = encrypt_with(credential, password)?;
        Ok(())
    }
}

impl std::fmt::Debug for VaultRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultRecord")
            .field("label_len", &self.label.len())
            .field("credential_len", &self.credential.len())
            .finish()
    }
}
