// SPDX-FileCopyrightText: 2026 Credman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generic credential storage in the native per-user credential vault.
//!
//! The store writes, reads and deletes one record per target name. Records
//! are generic credentials persisted per user on the local machine; the
//! secret blob is the UTF-16LE encoding of the stored text and may not exceed
//! [`MAX_SECRET_BYTES`](credman_core::MAX_SECRET_BYTES).
//!
//! Layering, from the native boundary inwards:
//!
//! - [`ffi`] reproduces the native record layout and declares the entry points.
//! - [`api::CredentialApi`] is the seam over the four native operations.
//! - `handle` owns vault-allocated memory returned by a read and frees it once.
//! - `marshal` is the only place that dereferences vault memory.
//! - [`CredentialStore`] composes them into safe, owned-value operations.

pub mod api;
pub mod ffi;
mod handle;
mod marshal;
#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod store;

#[cfg(windows)]
pub use api::Advapi32;
pub use api::CredentialApi;
pub use store::CredentialStore;

/// Open a store backed by the platform vault.
#[cfg(windows)]
pub fn open_native() -> Result<CredentialStore<Advapi32>, credman_core::StoreError> {
    Ok(CredentialStore::new(Advapi32))
}

/// Open a store backed by the platform vault.
///
/// Always fails: no native vault is bound on this platform.
#[cfg(not(windows))]
pub fn open_native() -> Result<CredentialStore<api::Unavailable>, credman_core::StoreError> {
    Err(credman_core::StoreError::Unsupported)
}
