// src/vault/mod.rs
//! Credential vault with on-demand decryption
//!
//! A [`Vault`] keeps every record as two encrypted packets and opens them one
//! field at a time: listing and searching touch labels only, [`Vault::reveal`]
//! is the one call that decrypts a credential.
//!
//! # Concurrency
//! A handle is not meant to be shared between writers. Every mutation rewrites
//! the whole file from this handle's view of it, so two handles (or threads)
//! editing the same vault can silently lose each other's updates. Serialise
//! access to one handle, or reopen after every foreign write.

use std::path::{Path, PathBuf};

use crate::aliases::Password;
use crate::config;
use crate::error::{CoreError, Result};
use crate::file_ops::write_atomic;
use crate::memory::{SealedBytes, SecureBytes};

mod credential;
mod format;
mod record;

pub use credential::{join_credential, split_credential};
pub use record::VaultRecord;

/// An open vault file and the password it was opened with.
///
/// The password is held sealed (`PROT_NONE`) in hardened memory for the life
/// of the handle, opened only inside each operation, and never written anywhere.
pub struct Vault {
    path: PathBuf,
    records: Vec<VaultRecord>,
    password: SealedBytes,
}

impl Vault {
    /// Read and validate the record list without decrypting anything.
    ///
    /// A wrong password is not detected here; it surfaces the first time a
    /// field is actually decrypted.
    pub fn open(path: impl AsRef<Path>, password: &Password) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            tracing::debug!(path = %path.display(), "vault unreadable: {e}");
            CoreError::NotFound(path.to_path_buf())
        })?;
        let records = format::decode(&bytes)?;

        tracing::debug!(path = %path.display(), records = records.len(), "vault opened");
        Ok(Vault {
            path: path.to_path_buf(),
            records,
            password: SealedBytes::new(password.as_bytes())?,
        })
    }

    /// Empty vault bound to `path`. Nothing is written until the first mutation.
    pub fn create(path: impl AsRef<Path>, password: &Password) -> Result<Self> {
        Ok(Vault {
            path: path.as_ref().to_path_buf(),
            records: Vec::new(),
            password: SealedBytes::new(password.as_bytes())?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Encrypted records, in file order
    pub fn records(&self) -> &[VaultRecord] {
        &self.records
    }

    /// `(index, label)` for every record whose label decrypts to UTF-8.
    ///
    /// Credentials are never touched. Records whose label fails to open, or
    /// opens to something other than UTF-8, are skipped with a warning so one
    /// damaged entry cannot hide the rest. If not a single label authenticates
    /// the password is taken to be wrong.
    pub fn list(&self) -> Result<Vec<(usize, String)>> {
        let password = self.password.access()?;
        let mut out = Vec::with_capacity(self.records.len());
        let mut authenticated = 0;

        for (index, record) in self.records.iter().enumerate() {
            match record.open_label(&password) {
                Ok(label) => {
                    authenticated += 1;
                    match std::str::from_utf8(label.as_bytes()) {
                        Ok(text) => out.push((index, text.to_owned())),
                        Err(_) => tracing::warn!(index, "label is not UTF-8, skipping record"),
                    }
                }
                Err(CoreError::Authentication) => {
                    tracing::warn!(index, "label failed authentication, skipping record");
                }
                Err(e) => return Err(e),
            }
        }

        if authenticated == 0 && !self.records.is_empty() {
            return Err(CoreError::Authentication);
        }
        Ok(out)
    }

    /// Case-insensitive substring match against labels only
    pub fn search(&self, query: &str) -> Result<Vec<(usize, String)>> {
        let needle = query.to_lowercase();
        Ok(self
            .list()?
            .into_iter()
            .filter(|(_, label)| label.to_lowercase().contains(&needle))
            .collect())
    }

    /// Decrypt exactly one credential. Keep the returned buffer short-lived.
    pub fn reveal(&self, index: usize) -> Result<SecureBytes> {
        let record = self.record(index)?;
        let password = self.password.access()?;
        record.open_credential(&password)
    }

    /// Replace the credential of the record labelled exactly `label`, or append
    /// a new record. Returns the record's index.
    ///
    /// Only the affected packets are re-encrypted; everything else is written
    /// back byte for byte. On any error the handle is left as it was.
    pub fn upsert(&mut self, label: &str, credential: &[u8]) -> Result<usize> {
        let existing = self
            .list()?
            .into_iter()
            .find_map(|(index, l)| (l == label).then_some(index));

        let mut records = self.records.clone();
        let index = {
            let password = self.password.access()?;
            match existing {
                Some(index) => {
                    records[index].reseal_credential(credential, &password)?;
                    index
                }
                None => {
                    records.push(VaultRecord::seal(label.as_bytes(), credential, &password)?);
                    records.len() - 1
                }
            }
        };

        self.commit(records)?;
        Ok(index)
    }

    /// Overwrite both fields of the record at `index`.
    ///
    /// The old credential has to open with this handle's password, or, if that
    /// record is damaged, some other record's label has to.
    pub fn update(&mut self, index: usize, label: &str, credential: &[u8]) -> Result<()> {
        let current = self.reveal(index);
        self.authorize(index, current)?;

        let mut records = self.records.clone();
        records[index] = {
            let password = self.password.access()?;
            VaultRecord::seal(label.as_bytes(), credential, &password)?
        };
        self.commit(records)
    }

    /// Delete the record at `index`; later indices shift down by one.
    ///
    /// The record's label has to open with this handle's password, or, if that
    /// record is damaged, some other record's label has to.
    pub fn remove(&mut self, index: usize) -> Result<()> {
        let current = {
            let record = self.record(index)?;
            let password = self.password.access()?;
            record.open_label(&password)
        };
        self.authorize(index, current)?;

        let mut records = self.records.clone();
        records.remove(index);
        self.commit(records)
    }

    fn record(&self, index: usize) -> Result<&VaultRecord> {
        self.records.get(index).ok_or(CoreError::RecordNotFound(index))
    }

    /// Accept a write to `index` when `target` (an attempt to open that record)
    /// succeeded, or when it failed authentication but another record still
    /// opens, which proves the password and marks the target as damaged.
    fn authorize(&self, index: usize, target: Result<SecureBytes>) -> Result<()> {
        match target {
            Ok(_) => Ok(()),
            Err(CoreError::Authentication) => {
                let password = self.password.access()?;
                let proven = self
                    .records
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != index)
                    .any(|(_, record)| record.open_label(&password).is_ok());
                if !proven {
                    return Err(CoreError::Authentication);
                }
                tracing::warn!(index, "record is damaged, writing over it");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Persist `records`, and only then adopt them as this handle's view
    fn commit(&mut self, records: Vec<VaultRecord>) -> Result<()> {
        let bytes = format::encode(&records)?;
        write_atomic(&self.path, &bytes)?;
        tracing::info!(path = %self.path.display(), records = records.len(), "vault saved");
        self.records = records;
        Ok(())
    }
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("path", &self.path)
            .field("records", &self.records.len())
            .finish_non_exhaustive()
    }
}

/// First configured search directory that contains the vault file
pub fn locate_vault() -> Option<PathBuf> {
    let conf = config::load();
    locate_in(&conf.vault_search_dirs(), &conf.vault.file_name)
}

fn locate_in(dirs: &[PathBuf], file_name: &str) -> Option<PathBuf> {
    dirs.iter()
        .map(|dir| dir.join(file_name))
        .find(|candidate| candidate.is_file())
}
