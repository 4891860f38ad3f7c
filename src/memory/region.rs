// src/memory/region.rs
//! Guarded, locked page mapping
//!
//! Layout of one mapping:
//!
//! ```text
//! [ guard page | slack .. data[capacity] canary[CANARY_LEN] | guard page ]
//!   PROT_NONE    read/write, mlock'd, excluded from core dumps   PROT_NONE
//! ```
//!
//! The data is right-aligned so the canary ends exactly at the trailing guard
//! page: a linear overrun trips the canary first and faults `CANARY_LEN` bytes
//! later. An underrun walks through the slack and faults on the leading guard.

use std::io;
use std::ptr::NonNull;

use zeroize::Zeroize;

use crate::consts::{CANARY_BYTE, CANARY_LEN};
use crate::error::{CoreError, Result};

pub(crate) struct GuardedRegion {
    base: NonNull<u8>,
    map_len: usize,
    page: usize,
    inner_len: usize,
    data_offset: usize,
    accessible: bool,
    locked: bool,
}

fn page_size() -> usize {
    // SAFETY: sysconf has no memory-safety preconditions.
    let raw = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if raw > 0 {
        raw as usize
    } else {
        4096
    }
}

fn round_up(value: usize, align: usize) -> Option<usize> {
    value.checked_add(align - 1).map(|v| v / align * align)
}

fn os_error(what: &str) -> CoreError {
    CoreError::Resource(format!("{what}: {}", io::Error::last_os_error()))
}

impl GuardedRegion {
    pub(crate) fn map(capacity: usize, require_lock: bool) -> Result<Self> {
        let page = page_size();
        let inner_len = capacity
            .checked_add(CANARY_LEN)
            .and_then(|n| round_up(n, page))
            .ok_or_else(|| CoreError::Resource(format!("capacity {capacity} too large")))?;
        let map_len = inner_len
            .checked_add(2 * page)
            .ok_or_else(|| CoreError::Resource(format!("capacity {capacity} too large")))?;

        // SAFETY: anonymous private mapping, no existing memory is touched.
        let raw = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                map_len,
                libc::PROT_NONE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };
        if raw == libc::MAP_FAILED {
            return Err(os_error("mmap refused"));
        }
        let base = NonNull::new(raw.cast::<u8>()).ok_or_else(|| os_error("mmap returned null"))?;

        // From here on `region` owns the mapping, so every early return unmaps it.
        let mut region = GuardedRegion {
            base,
            map_len,
            page,
            inner_len,
            data_offset: inner_len - CANARY_LEN - capacity,
            accessible: false,
            locked: false,
        };

        let inner = region.inner_ptr().cast::<libc::c_void>();
        // SAFETY: `inner..inner + inner_len` lies inside the mapping created above.
        if unsafe { libc::mprotect(inner, inner_len, libc::PROT_READ | libc::PROT_WRITE) } != 0 {
            return Err(os_error("mprotect refused"));
        }
        region.accessible = true;

        // SAFETY: same span as above, now readable and writable.
        if unsafe { libc::mlock(inner, inner_len) } == 0 {
            region.locked = true;
        } else if require_lock {
            return Err(os_error("mlock refused (raise RLIMIT_MEMLOCK or grant CAP_IPC_LOCK)"));
        } else {
            tracing::warn!(
                bytes = inner_len,
                "mlock refused ({}); hardened buffer may be swapped",
                io::Error::last_os_error()
            );
        }

        #[cfg(any(target_os = "linux", target_os = "android"))]
        {
            // SAFETY: advisory call on our own span; failure only loses the hint.
            unsafe {
                libc::madvise(inner, inner_len, libc::MADV_DONTDUMP);
            }
        }

        region.canary_mut().fill(CANARY_BYTE);
        Ok(region)
    }

    fn inner_ptr(&self) -> *mut u8 {
        // SAFETY: the leading guard page is exactly `page` bytes long.
        unsafe { self.base.as_ptr().add(self.page) }
    }

    fn inner_mut(&mut self) -> &mut [u8] {
        // SAFETY: the inner span is mapped read/write for the lifetime of `self`.
        unsafe { std::slice::from_raw_parts_mut(self.inner_ptr(), self.inner_len) }
    }

    /// Pointer to the first usable byte
    pub(crate) fn data_ptr(&self) -> *mut u8 {
        // SAFETY: `data_offset < inner_len`, see `map`.
        unsafe { self.inner_ptr().add(self.data_offset) }
    }

    fn canary_offset(&self) -> usize {
        self.inner_len - CANARY_LEN
    }

    pub(crate) fn canary(&self) -> &[u8] {
        // SAFETY: the canary occupies the last CANARY_LEN bytes of the inner span.
        unsafe {
            std::slice::from_raw_parts(self.inner_ptr().add(self.canary_offset()), CANARY_LEN)
        }
    }

    fn canary_mut(&mut self) -> &mut [u8] {
        let offset = self.canary_offset();
        &mut self.inner_mut()[offset..]
    }

    pub(crate) fn is_locked(&self) -> bool {
        self.locked
    }

    /// Bytes between the end of the data and the trailing guard page
    #[cfg(test)]
    fn overrun_margin(&self) -> usize {
        self.inner_len - self.canary_offset()
    }

    fn set_protection(&self, prot: libc::c_int) -> Result<()> {
        // SAFETY: the inner span was mapped by `map` and is still owned by `self`.
        if unsafe { libc::mprotect(self.inner_ptr().cast(), self.inner_len, prot) } != 0 {
            return Err(os_error("mprotect refused"));
        }
        Ok(())
    }

    /// Make the whole inner span, canary included, fault on any access.
    /// Callers must not touch the data until [`Self::protect_readwrite`].
    pub(crate) fn protect_noaccess(&self) -> Result<()> {
        self.set_protection(libc::PROT_NONE)
    }

    pub(crate) fn protect_readwrite(&self) -> Result<()> {
        self.set_protection(libc::PROT_READ | libc::PROT_WRITE)
    }

    /// Overwrite the whole accessible span, canary included
    pub(crate) fn wipe(&mut self) {
        self.inner_mut().zeroize();
    }
}

impl Drop for GuardedRegion {
    fn drop(&mut self) {
        // a sealed span has to be reopened before it can be wiped
        if self.accessible && self.protect_readwrite().is_ok() {
            self.wipe();
        }
        let inner = self.inner_ptr().cast::<libc::c_void>();
        // SAFETY: unlocking and unmapping exactly what `map` locked and mapped;
        // nothing references the region after this point.
        unsafe {
            if self.locked {
                libc::munlock(inner, self.inner_len);
            }
            libc::munmap(self.base.as_ptr().cast(), self.map_len);
        }
    }
}
