// SPDX-FileCopyrightText: 2026 Credman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scoped ownership of a vault-allocated credential record.

use std::marker::PhantomData;
use std::ptr::NonNull;

use tracing::trace;

use crate::api::CredentialApi;
use crate::ffi::RawCredential;

/// Sole owner of one record returned by [`CredentialApi::read`].
///
/// Built only from a successful read, it frees the record exactly once when
/// dropped, on every exit path. The record is only lent out for the guard's own
/// lifetime; callers copy fields out before the guard goes away. Neither
/// `Clone` nor `Send`.
pub(crate) struct CredentialHandle<'a, A: CredentialApi + ?Sized> {
    api: &'a A,
    credential: NonNull<RawCredential>,
    _not_send: PhantomData<*mut RawCredential>,
}

impl<'a, A: CredentialApi + ?Sized> CredentialHandle<'a, A> {
    /// Take ownership of `raw`.
    ///
    /// Returns `None`, and frees nothing, for the null and all-ones sentinel
    /// values.
    ///
    /// # Safety
    ///
    /// `raw` must come from a successful `api.read` and must not be owned by
    /// anything else.
    pub(crate) unsafe fn acquire(api: &'a A, raw: *mut RawCredential) -> Option<Self> {
        if raw as usize == usize::MAX {
            return None;
        }
        let credential = NonNull::new(raw)?;
        trace!("acquired vault record");
        Some(Self {
            api,
            credential,
            _not_send: PhantomData,
        })
    }

    /// The record, borrowed for no longer than the guard lives.
    pub(crate) fn credential(&self) -> &RawCredential {
        // SAFETY: `acquire` rejected the sentinels and the vault keeps the
        // record alive until `free` runs in `drop`.
        unsafe { self.credential.as_ref() }
    }
}

impl<A: CredentialApi + ?Sized> Drop for CredentialHandle<'_, A> {
    fn drop(&mut self) {
        // SAFETY: this guard is the only owner and `drop` runs once.
        unsafe { self.api.free(self.credential.as_ptr()) };
        trace!("released vault record");
    }
}
