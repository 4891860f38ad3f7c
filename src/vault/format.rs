// src/vault/format.rs
//! On-disk framing: a JSON document with a format marker, a version and one
//! `{label, credential}` pair of hex packets per record.
//!
//! ```json
//! { "format": "sealed-vault", "version": 1,
//!   "records": [ { "label": "9f0c…", "credential": "41aa…" } ] }
//! ```
//!
//! Decoding needs no password.

use serde::{Deserialize, Serialize};

use crate::consts::{VAULT_FORMAT, VAULT_VERSION};
use crate::error::{CoreError, Result};

use super::record::VaultRecord;

#[derive(Serialize, Deserialize)]
struct VaultFile {
    format: String,
    version: u32,
    records: Vec<StoredRecord>,
}

#[derive(Serialize, Deserialize)]
struct StoredRecord {
    label: String,
    credential: String,
}

pub(crate) fn decode(bytes: &[u8]) -> Result<Vec<VaultRecord>> {
    let file: VaultFile = serde_json::from_slice(bytes)
        .map_err(|e| CoreError::format(format!("vault framing: {e}")))?;

    if file.format != VAULT_FORMAT {
        return Err(CoreError::format(format!("unknown vault format {:?}", file.format)));
    }
    if file.version != VAULT_VERSION {
        return Err(CoreError::format(format!(
            "unsupported vault version {} (expected {VAULT_VERSION})",
            file.version
        )));
    }

    file.records
        .into_iter()
        .enumerate()
        .map(|(i, rec)| {
            let label = hex::decode(&rec.label)
                .map_err(|e| CoreError::format(format!("record {i} label: {e}")))?;
            let credential = hex::decode(&rec.credential)
                .map_err(|e| CoreError::format(format!("record {i} credential: {e}")))?;
            VaultRecord::from_packets(label, credential)
        })
        .collect()
}

pub(crate) fn encode(records: &[VaultRecord]) -> Result<Vec<u8>> {
    let file = VaultFile {
        format: VAULT_FORMAT.to_string(),
        version: VAULT_VERSION,
        records: records
            .iter()
            .map(|r| StoredRecord {
                label: hex::encode(r.label_packet()),
                credential: hex::encode(r.credential_packet()),
            })
            .collect(),
    };
    serde_json::to_vec_pretty(&file).map_err(|e| CoreError::format(format!("vault framing: {e}")))
}
