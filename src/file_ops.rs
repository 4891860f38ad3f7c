// src/file_ops.rs
//! Whole-file encryption and decryption
//!
//! A file's entire content becomes one packet. Payloads go through
//! [`decrypt_to_vec`] rather than hardened memory since files can be far larger
//! than the lockable quota; plaintext copies are still zeroed on drop.

use std::io::Write;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zeroize::Zeroizing;

use crate::aliases::Password;
use crate::config;
use crate::crypto::{decrypt_to_vec, encrypt};
use crate::error::{CoreError, Result};

/// Outcome of a directory batch
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, CoreError)>,
    pub skipped: Vec<PathBuf>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Replace `path` with `bytes` through a temp file in the same directory, so
/// readers see either the old content or the new one.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new().prefix(".sealed-").tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| CoreError::Io(e.error))?;
    Ok(())
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CoreError::NotFound(path.to_path_buf()),
        _ => CoreError::Io(e),
    })
}

/// Encrypt `input_path` into `output_path`. Returns the plaintext size in bytes.
pub fn encrypt_file<P: AsRef<Path>>(
    input_path: P,
    output_path: P,
    password: &Password,
) -> Result<u64> {
    let plaintext = Zeroizing::new(read_input(input_path.as_ref())?);
    let packet = encrypt(&plaintext, password)?;
    write_atomic(output_path.as_ref(), &packet)?;
    Ok(plaintext.len() as u64)
}

/// Decrypt `input_path` into `output_path`. Returns the plaintext size in bytes.
///
/// Nothing is written unless the whole packet authenticates.
pub fn decrypt_file<P: AsRef<Path>>(
    input_path: P,
    output_path: P,
    password: &Password,
) -> Result<u64> {
    let packet = read_input(input_path.as_ref())?;
    let plaintext = decrypt_to_vec(&packet, password)?;
    write_atomic(output_path.as_ref(), &plaintext)?;
    Ok(plaintext.len() as u64)
}

pub fn encrypt_file_in_place(path: impl AsRef<Path>, password: &Password) -> Result<u64> {
    let path = path.as_ref();
    encrypt_file(path, path, password)
}

/// On failure the file is left exactly as it was.
pub fn decrypt_file_in_place(path: impl AsRef<Path>, password: &Password) -> Result<u64> {
    let path = path.as_ref();
    decrypt_file(path, path, password)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

fn with_appended_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// Toggle a single file: `*.sage` is decrypted and loses the extension,
/// anything else is encrypted and gains it. Returns the new path.
pub fn process_path(path: impl AsRef<Path>, password: &Password) -> Result<PathBuf> {
    process_with_extension(path.as_ref(), password, &config::load().files.extension)
}

fn process_with_extension(path: &Path, password: &Password, ext: &str) -> Result<PathBuf> {
    let target = if has_extension(path, ext) {
        let target = path.with_extension("");
        decrypt_file(path, target.as_path(), password)?;
        target
    } else {
        let target = with_appended_extension(path, ext);
        encrypt_file(path, target.as_path(), password)?;
        target
    };
    std::fs::remove_file(path)?;
    Ok(target)
}

fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CoreError::NotFound(dir.to_path_buf()));
    }
    // gathered up front: the batch renames files while it walks
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.map_err(|e| CoreError::Io(e.into()))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn run_batch(
    dir: &Path,
    password: &Password,
    ext: &str,
    wants: impl Fn(&Path) -> bool,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();
    for file in collect_files(dir)? {
        if !wants(&file) {
            report.skipped.push(file);
            continue;
        }
        match process_with_extension(&file, password, ext) {
            Ok(target) => report.succeeded.push(target),
            Err(err) => {
                tracing::warn!(path = %file.display(), "batch item failed: {err}");
                report.failed.push((file, err));
            }
        }
    }
    tracing::info!(
        dir = %dir.display(),
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        skipped = report.skipped.len(),
        "batch finished"
    );
    Ok(report)
}

/// Encrypt every regular file under `dir`, recursively. Files already carrying
/// the encrypted extension and configured executable types are skipped.
pub fn encrypt_directory(dir: impl AsRef<Path>, password: &Password) -> Result<BatchReport> {
    let files = &config::load().files;
    run_batch(dir.as_ref(), password, &files.extension, |p| {
        !has_extension(p, &files.extension)
            && !files.skip_extensions.iter().any(|skip| has_extension(p, skip))
    })
}

/// Decrypt every `*.sage` file under `dir`, recursively.
pub fn decrypt_directory(dir: impl AsRef<Path>, password: &Password) -> Result<BatchReport> {
    let ext = &config::load().files.extension;
    run_batch(dir.as_ref(), password, ext, |p| has_extension(p, ext))
}
