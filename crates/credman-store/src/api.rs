// SPDX-FileCopyrightText: 2026 Credman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The seam over the native vault's four operations.
//!
//! Implementations report failures as raw native error codes; mapping them to
//! [`StoreError`](credman_core::StoreError) happens in the store.

use credman_core::StoreError;

use crate::ffi::RawCredential;

/// A NUL-terminated UTF-16 name for passing to the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideName {
    units: Vec<u16>,
}

impl WideName {
    /// Encode `value`, rejecting interior NULs that would silently truncate it.
    pub fn new(field: &'static str, value: &str) -> Result<Self, StoreError> {
        if value.contains('\0') {
            return Err(StoreError::InteriorNul { field });
        }
        let mut units: Vec<u16> = value.encode_utf16().collect();
        units.push(0);
        Ok(Self { units })
    }

    /// Pointer to the first unit; valid while `self` is alive.
    pub fn as_ptr(&self) -> *const u16 {
        self.units.as_ptr()
    }

    /// The encoded name without its terminator.
    pub fn units(&self) -> &[u16] {
        &self.units[..self.units.len() - 1]
    }
}

/// Native credential vault operations.
pub trait CredentialApi {
    /// Create or replace the record described by `credential`.
    ///
    /// # Safety
    ///
    /// Every non-null pointer in `credential` must be valid for reads for the
    /// duration of the call: name fields as NUL-terminated UTF-16, the blob
    /// for `credential_blob_size` bytes.
    unsafe fn write(&self, credential: &RawCredential) -> Result<(), u32>;

    /// Look up the record for `target_name`.
    ///
    /// On success the returned pointer refers to vault-owned memory that must
    /// be passed to [`free`](Self::free) exactly once.
    fn read(&self, target_name: &WideName, kind: u32) -> Result<*mut RawCredential, u32>;

    /// Release memory returned by [`read`](Self::read).
    ///
    /// # Safety
    ///
    /// `credential` must come from a successful `read` on this same API and
    /// must not have been released already.
    unsafe fn free(&self, credential: *mut RawCredential);

    /// Remove the record for `target_name`.
    fn delete(&self, target_name: &WideName, kind: u32) -> Result<(), u32>;
}

impl<T: CredentialApi + ?Sized> CredentialApi for &T {
    unsafe fn write(&self, credential: &RawCredential) -> Result<(), u32> {
        // SAFETY: forwarded caller contract.
        unsafe { (**self).write(credential) }
    }

    fn read(&self, target_name: &WideName, kind: u32) -> Result<*mut RawCredential, u32> {
        (**self).read(target_name, kind)
    }

    unsafe fn free(&self, credential: *mut RawCredential) {
        // SAFETY: forwarded caller contract.
        unsafe { (**self).free(credential) }
    }

    fn delete(&self, target_name: &WideName, kind: u32) -> Result<(), u32> {
        (**self).delete(target_name, kind)
    }
}

/// The Windows credential manager, via advapi32.
#[cfg(windows)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Advapi32;

#[cfg(windows)]
fn last_error() -> u32 {
    std::io::Error::last_os_error()
        .raw_os_error()
        .map_or(0, |code| code as u32)
}

#[cfg(windows)]
impl CredentialApi for Advapi32 {
    unsafe fn write(&self, credential: &RawCredential) -> Result<(), u32> {
        // SAFETY: pointer validity is the caller's contract.
        let ok = unsafe { crate::ffi::CredWriteW(credential, 0) };
        if ok != 0 { Ok(()) } else { Err(last_error()) }
    }

    fn read(&self, target_name: &WideName, kind: u32) -> Result<*mut RawCredential, u32> {
        let mut credential = std::ptr::null_mut();
        // SAFETY: `target_name` is NUL-terminated and outlives the call; the
        // out-pointer is a valid local.
        let ok = unsafe { crate::ffi::CredReadW(target_name.as_ptr(), kind, 0, &mut credential) };
        if ok != 0 { Ok(credential) } else { Err(last_error()) }
    }

    unsafe fn free(&self, credential: *mut RawCredential) {
        // SAFETY: the caller guarantees `credential` came from CredReadW and
        // is released once.
        unsafe { crate::ffi::CredFree(credential.cast::<std::ffi::c_void>()) }
    }

    fn delete(&self, target_name: &WideName, kind: u32) -> Result<(), u32> {
        // SAFETY: `target_name` is NUL-terminated and outlives the call.
        let ok = unsafe { crate::ffi::CredDeleteW(target_name.as_ptr(), kind, 0) };
        if ok != 0 { Ok(()) } else { Err(last_error()) }
    }
}

/// Placeholder API for platforms without a native vault. Uninhabited.
#[cfg(not(windows))]
#[derive(Debug)]
pub enum Unavailable {}

#[cfg(not(windows))]
impl CredentialApi for Unavailable {
    unsafe fn write(&self, _credential: &RawCredential) -> Result<(), u32> {
        match *self {}
    }

    fn read(&self, _target_name: &WideName, _kind: u32) -> Result<*mut RawCredential, u32> {
        match *self {}
    }

    unsafe fn free(&self, _credential: *mut RawCredential) {
        match *self {}
    }

    fn delete(&self, _target_name: &WideName, _kind: u32) -> Result<(), u32> {
        match *self {}
    }
}
