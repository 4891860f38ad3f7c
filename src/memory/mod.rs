// src/memory/mod.rs
//! Hardened byte buffers for passwords, derived keys and decrypted values
//!
//! Every [`SecureBytes`] lives in its own page mapping with inaccessible guard
//! pages on both sides, is locked against swap, carries a canary right after
//! its capacity and is zeroed before the pages go back to the OS.

use std::fmt;

use zeroize::Zeroize;

use crate::consts::CANARY_BYTE;
use crate::error::Result;

mod integrity;
mod region;
mod sealed;

use region::GuardedRegion;

pub use sealed::{SealedAccess, SealedBytes};

/// Owned, fixed-capacity secret bytes.
///
/// Indexing outside `[0, len)` panics. Dropping wipes the buffer on every exit
/// path, unwinding included.
pub struct SecureBytes {
    region: GuardedRegion,
    capacity: usize,
    len: usize,
}

// SAFETY: the mapping is exclusively owned and only reachable through `&self`
// / `&mut self`, so the usual borrow rules apply across threads.
unsafe impl Send for SecureBytes {}
unsafe impl Sync for SecureBytes {}

#[cfg(test)]
fn require_lock() -> bool {
    false
}

#[cfg(not(test))]
fn require_lock() -> bool {
    crate::config::load().memory.require_lock
}

impl SecureBytes {
    /// Empty buffer able to hold `capacity` bytes.
    ///
    /// Fails with [`CoreError::Resource`](crate::CoreError::Resource) when the
    /// pages cannot be mapped, or cannot be locked while locking is required.
    pub fn allocate(capacity: usize) -> Result<Self> {
        let region = GuardedRegion::map(capacity, require_lock())?;
        Ok(SecureBytes {
            region,
            capacity,
            len: 0,
        })
    }

    /// `len` zero bytes, full capacity in use
    pub fn zeroed(len: usize) -> Result<Self> {
        let mut buf = Self::allocate(len)?;
        buf.len = len;
        Ok(buf)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let mut buf = Self::allocate(bytes.len())?;
        buf.extend_from_slice(bytes);
        Ok(buf)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the pages are actually pinned in RAM
    pub fn is_locked(&self) -> bool {
        self.region.is_locked()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.verify_canary();
        // SAFETY: `len <= capacity` and the first `capacity` bytes after
        // `data_ptr` are mapped read/write for the lifetime of `self`.
        unsafe { std::slice::from_raw_parts(self.region.data_ptr(), self.len) }
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.verify_canary();
        // SAFETY: as in `as_bytes`, and `&mut self` guarantees exclusivity.
        unsafe { std::slice::from_raw_parts_mut(self.region.data_ptr(), self.len) }
    }

    /// `len` bytes starting at `offset`.
    ///
    /// # Panics
    /// If the range leaves `[0, self.len())`.
    pub fn read(&self, offset: usize, len: usize) -> &[u8] {
        let end = self.checked_end(offset, len);
        &self.as_bytes()[offset..end]
    }

    /// Overwrite bytes in place starting at `offset`.
    ///
    /// # Panics
    /// If the range leaves `[0, self.len())`.
    pub fn write(&mut self, offset: usize, bytes: &[u8]) {
        let end = self.checked_end(offset, bytes.len());
        self.as_bytes_mut()[offset..end].copy_from_slice(bytes);
    }

    /// Append at the end of the used region.
    ///
    /// # Panics
    /// If the result would exceed the fixed capacity.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        let new_len = self.len.checked_add(bytes.len());
        assert!(
            new_len.is_some_and(|n| n <= self.capacity),
            "SecureBytes overflow: {} + {} exceeds capacity {}",
            self.len,
            bytes.len(),
            self.capacity
        );
        let start = self.len;
        self.len += bytes.len();
        self.as_bytes_mut()[start..].copy_from_slice(bytes);
    }

    /// Shrink the used region, zeroing what falls off the end
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        self.as_bytes_mut()[len..].zeroize();
        self.len = len;
    }

    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Re-check the canary after the usable region.
    ///
    /// A mismatch means something already wrote past the end of this buffer;
    /// the process is aborted on the spot.
    pub fn verify_canary(&self) {
        if !self.canary_intact() {
            integrity::violation(self.capacity);
        }
    }

    pub(crate) fn canary_intact(&self) -> bool {
        self.region.canary().iter().all(|&b| b == CANARY_BYTE)
    }

    fn checked_end(&self, offset: usize, len: usize) -> usize {
        match offset.checked_add(len) {
            Some(end) if end <= self.len => end,
            _ => panic!(
                "SecureBytes access out of bounds: {offset}..{offset}+{len} with length {}",
                self.len
            ),
        }
    }
}

impl Drop for SecureBytes {
    fn drop(&mut self) {
        if let Err(err) = self.region.protect_readwrite() {
            tracing::error!("cannot reopen hardened buffer for wiping: {err}");
            return;
        }
        let intact = self.canary_intact();
        self.region.wipe();
        if !intact {
            integrity::violation(self.capacity);
        }
    }
}

impl fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureBytes")
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .field("locked", &self.is_locked())
            .finish_non_exhaustive()
    }
}
