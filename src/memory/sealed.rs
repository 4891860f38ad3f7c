// src/memory/sealed.rs
//! Long-lived secrets kept unreadable between uses
//!
//! A [`SealedBytes`] sits at `PROT_NONE` except while at least one
//! [`SealedAccess`] is alive. Stray reads of an idle secret fault instead of
//! leaking it.

use std::ops::Deref;
use std::sync::{Mutex, PoisonError};

use crate::error::Result;

use super::SecureBytes;

pub struct SealedBytes {
    inner: SecureBytes,
    readers: Mutex<usize>,
}

impl SealedBytes {
    /// Copy `bytes` into hardened memory and seal it straight away
    pub fn new(bytes: &[u8]) -> Result<Self> {
        let inner = SecureBytes::from_slice(bytes)?;
        inner.region.protect_noaccess()?;
        Ok(SealedBytes {
            inner,
            readers: Mutex::new(0),
        })
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Open the pages for the lifetime of the returned guard. Guards nest; the
    /// pages are sealed again when the last one drops.
    pub fn access(&self) -> Result<SealedAccess<'_>> {
        let mut readers = self.readers.lock().unwrap_or_else(PoisonError::into_inner);
        if *readers == 0 {
            self.inner.region.protect_readwrite()?;
        }
        *readers += 1;
        Ok(SealedAccess { owner: self })
    }

    fn release(&self) {
        let mut readers = self.readers.lock().unwrap_or_else(PoisonError::into_inner);
        *readers -= 1;
        if *readers == 0 {
            if let Err(err) = self.inner.region.protect_noaccess() {
                tracing::warn!("secret left readable after use: {err}");
            }
        }
    }

    #[cfg(test)]
    fn open_readers(&self) -> usize {
        *self.readers.lock().unwrap()
    }
}

impl std::fmt::Debug for SealedBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SealedBytes")
            .field("len", &self.inner.len())
            .finish_non_exhaustive()
    }
}

/// Readable view of a [`SealedBytes`]; reseals on drop
pub struct SealedAccess<'a> {
    owner: &'a SealedBytes,
}

impl Deref for SealedAccess<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.owner.inner.as_bytes()
    }
}

impl Drop for SealedAccess<'_> {
    fn drop(&mut self) {
        self.owner.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::tests::{killed_by_fault, run_in_child};

    const SEALED_CHILD_ENV: &str = "SEALED_VAULT_SEALED_CHILD";

    #[test]
    fn access_reveals_contents() {
        let secret = SealedBytes::new(b"master").unwrap();
        assert_eq!(&*secret.access().unwrap(), b"master");
        assert_eq!(secret.len(), 6);
    }

    #[test]
    fn nested_access_reseals_after_last_guard() {
        let secret = SealedBytes::new(b"pw").unwrap();
        {
            let outer = secret.access().unwrap();
            let inner = secret.access().unwrap();
            assert_eq!(secret.open_readers(), 2);
            drop(inner);
            assert_eq!(&*outer, b"pw");
        }
        assert_eq!(secret.open_readers(), 0);
        assert_eq!(&*secret.access().unwrap(), b"pw");
    }

    #[test]
    fn dropping_while_sealed_still_wipes() {
        let secret = SealedBytes::new(&[0xAA; 100]).unwrap();
        drop(secret);
    }

    #[test]
    fn idle_secret_faults_on_direct_read() {
        if std::env::var_os(SEALED_CHILD_ENV).is_some() {
            let secret = SealedBytes::new(b"master").unwrap();
            // SAFETY: deliberately not safe; the pages are PROT_NONE right now.
            let byte = unsafe { std::ptr::read_volatile(secret.inner.region.data_ptr()) };
            println!("unreachable: {byte}");
            return;
        }

        let status = run_in_child(
            "memory::sealed::tests::idle_secret_faults_on_direct_read",
            SEALED_CHILD_ENV,
        );
        assert!(killed_by_fault(&status), "child exited with {status:?}");
    }

    #[test]
    fn shared_across_threads() {
        let secret = std::sync::Arc::new(SealedBytes::new(b"shared").unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let secret = secret.clone();
                std::thread::spawn(move || secret.access().unwrap().to_vec())
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), b"shared");
        }
        assert_eq!(secret.open_readers(), 0);
    }
}
