// SPDX-FileCopyrightText: 2026 Credman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translation between owned Rust values and native record memory.
//!
//! [`decode_record`] is the single place that reads through the pointers of a
//! vault-allocated record. Every read is bounded: names by the native length
//! limits, the blob by its declared size and the generic secret ceiling.

use std::slice;

use credman_core::{CredentialKind, CredentialRecord, MAX_SECRET_BYTES, StoreError};
use secrecy::SecretString;
use zeroize::Zeroizing;

use crate::ffi::{CRED_MAX_GENERIC_TARGET_NAME_LENGTH, CRED_MAX_USERNAME_LENGTH, RawCredential};

/// UTF-16LE bytes of `secret`, wiped on drop.
pub(crate) fn encode_secret(secret: &str) -> Zeroizing<Vec<u8>> {
    Zeroizing::new(secret.encode_utf16().flat_map(u16::to_le_bytes).collect())
}

/// Copy every field of `raw` into owned values.
///
/// # Safety
///
/// `raw.target_name` and `raw.user_name` must each be null or point to a
/// readable NUL-terminated UTF-16 string, and `raw.credential_blob` must be
/// null or readable for `raw.credential_blob_size` bytes, for the duration of
/// the call.
pub(crate) unsafe fn decode_record(raw: &RawCredential) -> Result<CredentialRecord, StoreError> {
    let kind = CredentialKind::from_code(raw.kind)
        .ok_or_else(|| corrupt(format!("unsupported credential type {}", raw.kind)))?;

    // SAFETY: forwarded caller contract.
    let target_name = unsafe {
        decode_name("target name", raw.target_name, CRED_MAX_GENERIC_TARGET_NAME_LENGTH)
    }?;
    // SAFETY: forwarded caller contract.
    let user_name = unsafe { decode_name("user name", raw.user_name, CRED_MAX_USERNAME_LENGTH) }?;
    // SAFETY: forwarded caller contract.
    let units = unsafe { read_blob(raw.credential_blob, raw.credential_blob_size) }?;

    let secret = String::from_utf16(&units)
        .map_err(|_| corrupt("secret is not valid UTF-16".to_string()))?;

    Ok(CredentialRecord {
        kind,
        target_name,
        user_name,
        secret: SecretString::from(secret),
    })
}

/// Borrow the NUL-terminated string at `ptr`, scanning at most `max_len`
/// units before the terminator.
///
/// Returns `None` for null or misaligned pointers and for strings with no
/// terminator within the bound.
///
/// # Safety
///
/// A non-null `ptr` must be readable up to its terminator or `max_len + 1`
/// units, whichever comes first, for the lifetime `'a`.
pub(crate) unsafe fn read_wide_str<'a>(ptr: *const u16, max_len: usize) -> Option<&'a [u16]> {
    if ptr.is_null() || !ptr.is_aligned() {
        return None;
    }
    // SAFETY: each index is read only after every earlier one was non-NUL and
    // within the bound.
    let len = (0..=max_len).find(|&i| unsafe { *ptr.add(i) } == 0)?;
    // SAFETY: the first `len` units were just read.
    Some(unsafe { slice::from_raw_parts(ptr, len) })
}

/// # Safety
///
/// See [`read_wide_str`].
unsafe fn decode_name(field: &str, ptr: *const u16, max_len: usize) -> Result<String, StoreError> {
    // SAFETY: forwarded caller contract.
    let units = unsafe { read_wide_str(ptr, max_len) }
        .ok_or_else(|| corrupt(format!("{field} is missing or unterminated")))?;
    String::from_utf16(units).map_err(|_| corrupt(format!("{field} is not valid UTF-16")))
}

/// Copy the secret blob into wiped-on-drop UTF-16 units.
///
/// # Safety
///
/// A non-null `ptr` must be readable for `size` bytes.
unsafe fn read_blob(ptr: *const u8, size: u32) -> Result<Zeroizing<Vec<u16>>, StoreError> {
    let size = size as usize;
    if size > MAX_SECRET_BYTES {
        return Err(corrupt(format!(
            "secret blob is {size} bytes, above the {MAX_SECRET_BYTES} byte limit"
        )));
    }
    if size % 2 != 0 {
        return Err(corrupt(format!("secret blob has odd length {size}, not UTF-16")));
    }
    if size == 0 {
        return Ok(Zeroizing::new(Vec::new()));
    }
    if ptr.is_null() {
        return Err(corrupt(format!("secret blob is null but declares {size} bytes")));
    }

    // SAFETY: non-null and readable for `size` bytes per the caller contract.
    let bytes = unsafe { slice::from_raw_parts(ptr, size) };
    Ok(Zeroizing::new(
        bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect(),
    ))
}

fn corrupt(detail: String) -> StoreError {
    StoreError::CorruptRecord(detail)
}
