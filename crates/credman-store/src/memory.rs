// SPDX-FileCopyrightText: 2026 Credman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process vault double.
//!
//! Hands out heap-allocated records shaped exactly like native ones, tracks
//! every record it has lent out, and can be told to fail the next call. Used
//! by tests on every platform.

use std::collections::{HashMap, HashSet};
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::api::{CredentialApi, WideName};
use crate::ffi::{
    CRED_MAX_GENERIC_TARGET_NAME_LENGTH, CRED_MAX_USERNAME_LENGTH, CRED_TYPE_GENERIC,
    ERROR_NOT_FOUND, RawCredential,
};
use crate::marshal::read_wide_str;

/// Reported for malformed write requests.
pub const ERROR_INVALID_PARAMETER: u32 = 87;

/// A stored entry, kept as the raw units and bytes the vault was given.
#[derive(Debug, Clone)]
struct Entry {
    kind: u32,
    user: Vec<u16>,
    blob: Vec<u8>,
    persist: u32,
}

/// Heap block handed out by `read`. The record must stay the first field so
/// the block pointer doubles as the record pointer.
#[repr(C)]
struct Allocation {
    raw: RawCredential,
    target: Vec<u16>,
    user: Vec<u16>,
    blob: Vec<u8>,
}

#[derive(Debug, Default)]
struct State {
    entries: HashMap<Vec<u16>, Entry>,
    outstanding: HashSet<usize>,
    fail_next: Option<u32>,
    invalid_handle_next: bool,
}

/// Thread-safe in-memory credential vault.
#[derive(Debug, Default)]
pub struct MemoryVault {
    state: Mutex<State>,
    native_calls: AtomicUsize,
    write_calls: AtomicUsize,
    acquired: AtomicUsize,
    released: AtomicUsize,
    invalid_frees: AtomicUsize,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count a native call and consume any injected failure.
    fn enter(&self, state: &mut State) -> Result<(), u32> {
        self.native_calls.fetch_add(1, Ordering::SeqCst);
        match state.fail_next.take() {
            Some(code) => Err(code),
            None => Ok(()),
        }
    }

    /// Store an entry bypassing all encoding, for planting malformed data.
    pub fn insert_raw(&self, target_name: &str, user_name: &str, blob: Vec<u8>) {
        let entry = Entry {
            kind: CRED_TYPE_GENERIC,
            user: user_name.encode_utf16().collect(),
            blob,
            persist: 0,
        };
        self.state()
            .entries
            .insert(target_name.encode_utf16().collect(), entry);
    }

    /// Fail the next write, read or delete with `code`.
    pub fn fail_next_call(&self, code: u32) {
        self.state().fail_next = Some(code);
    }

    /// Make the next successful read return a null record pointer.
    pub fn return_invalid_handle_once(&self) {
        self.state().invalid_handle_next = true;
    }

    /// Whether a record exists for `target_name`.
    pub fn contains(&self, target_name: &str) -> bool {
        let key: Vec<u16> = target_name.encode_utf16().collect();
        self.state().entries.contains_key(&key)
    }

    /// Persistence scope recorded for `target_name`.
    pub fn persist_of(&self, target_name: &str) -> Option<u32> {
        let key: Vec<u16> = target_name.encode_utf16().collect();
        self.state().entries.get(&key).map(|entry| entry.persist)
    }

    /// Raw secret bytes stored for `target_name`.
    pub fn blob_of(&self, target_name: &str) -> Option<Vec<u8>> {
        let key: Vec<u16> = target_name.encode_utf16().collect();
        self.state().entries.get(&key).map(|entry| entry.blob.clone())
    }

    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls that reached the vault, of any kind.
    pub fn native_calls(&self) -> usize {
        self.native_calls.load(Ordering::SeqCst)
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    /// Records handed out by successful reads.
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Records handed out and not yet released.
    pub fn outstanding(&self) -> usize {
        self.state().outstanding.len()
    }

    /// `free` calls with a pointer this vault does not have outstanding.
    pub fn invalid_frees(&self) -> usize {
        self.invalid_frees.load(Ordering::SeqCst)
    }
}

impl CredentialApi for MemoryVault {
    unsafe fn write(&self, credential: &RawCredential) -> Result<(), u32> {
        let mut state = self.state();
        self.enter(&mut state)?;
        self.write_calls.fetch_add(1, Ordering::SeqCst);

        if credential.kind != CRED_TYPE_GENERIC {
            return Err(ERROR_INVALID_PARAMETER);
        }
        // SAFETY: the caller guarantees the name pointers are readable.
        let (target, user) = unsafe {
            (
                read_wide_str(credential.target_name, CRED_MAX_GENERIC_TARGET_NAME_LENGTH),
                read_wide_str(credential.user_name, CRED_MAX_USERNAME_LENGTH),
            )
        };
        let target = target.ok_or(ERROR_INVALID_PARAMETER)?.to_vec();
        let user = user.map(<[u16]>::to_vec).unwrap_or_default();

        let size = credential.credential_blob_size as usize;
        let blob = if size == 0 {
            Vec::new()
        } else if credential.credential_blob.is_null() {
            return Err(ERROR_INVALID_PARAMETER);
        } else {
            // SAFETY: the caller guarantees the blob is readable for `size` bytes.
            unsafe { std::slice::from_raw_parts(credential.credential_blob, size) }.to_vec()
        };

        state.entries.insert(
            target,
            Entry {
                kind: credential.kind,
                user,
                blob,
                persist: credential.persist,
            },
        );
        Ok(())
    }

    fn read(&self, target_name: &WideName, kind: u32) -> Result<*mut RawCredential, u32> {
        let mut state = self.state();
        self.enter(&mut state)?;

        let entry = match state.entries.get(target_name.units()) {
            Some(entry) if entry.kind == kind => entry.clone(),
            _ => return Err(ERROR_NOT_FOUND),
        };
        if std::mem::take(&mut state.invalid_handle_next) {
            return Ok(ptr::null_mut());
        }

        let mut target = target_name.units().to_vec();
        target.push(0);
        let mut user = entry.user;
        user.push(0);

        let mut block = Box::new(Allocation {
            raw: RawCredential::empty(),
            target,
            user,
            blob: entry.blob,
        });
        block.raw.kind = entry.kind;
        block.raw.persist = entry.persist;
        block.raw.target_name = block.target.as_mut_ptr();
        block.raw.user_name = block.user.as_mut_ptr();
        block.raw.credential_blob_size = block.blob.len() as u32;
        block.raw.credential_blob = if block.blob.is_empty() {
            ptr::null_mut()
        } else {
            block.blob.as_mut_ptr()
        };

        let raw = Box::into_raw(block).cast::<RawCredential>();
        state.outstanding.insert(raw as usize);
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(raw)
    }

    unsafe fn free(&self, credential: *mut RawCredential) {
        if !self.state().outstanding.remove(&(credential as usize)) {
            self.invalid_frees.fetch_add(1, Ordering::SeqCst);
            return;
        }
        // SAFETY: the pointer was produced by `Box::into_raw` in `read` and was
        // still outstanding, so this is its only release.
        drop(unsafe { Box::from_raw(credential.cast::<Allocation>()) });
        self.released.fetch_add(1, Ordering::SeqCst);
    }

    fn delete(&self, target_name: &WideName, kind: u32) -> Result<(), u32> {
        let mut state = self.state();
        self.enter(&mut state)?;

        let present = state
            .entries
            .get(target_name.units())
            .is_some_and(|entry| entry.kind == kind);
        if !present {
            return Err(ERROR_NOT_FOUND);
        }
        state.entries.remove(target_name.units());
        Ok(())
    }
}

impl Drop for MemoryVault {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        for raw in state.outstanding.drain() {
            // SAFETY: leaked records were produced by `Box::into_raw` in `read`
            // and never released.
            drop(unsafe { Box::from_raw(raw as *mut Allocation) });
        }
    }
}
