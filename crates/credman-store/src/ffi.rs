// SPDX-FileCopyrightText: 2026 Credman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Native credential record layout and entry points.
//!
//! [`RawCredential`] mirrors the wide-character credential structure
//! field for field. Pointer fields reference memory owned by whoever built the
//! record: the caller for writes, the vault for reads.

use std::ffi::c_void;
use std::ptr;

/// Native type code for generic credentials.
pub const CRED_TYPE_GENERIC: u32 = 1;

/// Persist across logon sessions on this machine; never roams.
pub const CRED_PERSIST_LOCAL_MACHINE: u32 = 2;

/// Error code reported when no credential matches the target name.
pub const ERROR_NOT_FOUND: u32 = 1168;

/// Longest generic target name, in UTF-16 units, excluding the terminator.
pub const CRED_MAX_GENERIC_TARGET_NAME_LENGTH: usize = 32767;

/// Longest user name, in UTF-16 units, excluding the terminator.
pub const CRED_MAX_USERNAME_LENGTH: usize = 513;

/// 100-nanosecond intervals since 1601-01-01 UTC, split in two halves.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileTime {
    pub low_date_time: u32,
    pub high_date_time: u32,
}

/// The native credential record.
#[repr(C)]
#[derive(Debug)]
pub struct RawCredential {
    pub flags: u32,
    pub kind: u32,
    pub target_name: *mut u16,
    pub comment: *mut u16,
    pub last_written: FileTime,
    pub credential_blob_size: u32,
    pub credential_blob: *mut u8,
    pub persist: u32,
    pub attribute_count: u32,
    pub attributes: *mut c_void,
    pub target_alias: *mut u16,
    pub user_name: *mut u16,
}

impl RawCredential {
    /// An all-empty record with null pointers.
    pub const fn empty() -> Self {
        Self {
            flags: 0,
            kind: 0,
            target_name: ptr::null_mut(),
            comment: ptr::null_mut(),
            last_written: FileTime {
                low_date_time: 0,
                high_date_time: 0,
            },
            credential_blob_size: 0,
            credential_blob: ptr::null_mut(),
            persist: 0,
            attribute_count: 0,
            attributes: ptr::null_mut(),
            target_alias: ptr::null_mut(),
            user_name: ptr::null_mut(),
        }
    }
}

#[cfg(target_pointer_width = "64")]
const _: () = assert!(std::mem::size_of::<RawCredential>() == 80);
#[cfg(target_pointer_width = "64")]
const _: () = assert!(std::mem::offset_of!(RawCredential, credential_blob) == 40);
#[cfg(target_pointer_width = "64")]
const _: () = assert!(std::mem::offset_of!(RawCredential, user_name) == 72);

#[cfg(target_pointer_width = "32")]
const _: () = assert!(std::mem::size_of::<RawCredential>() == 52);

#[cfg(windows)]
#[link(name = "advapi32")]
unsafe extern "system" {
    pub fn CredWriteW(credential: *const RawCredential, flags: u32) -> i32;

    pub fn CredReadW(
        target_name: *const u16,
        kind: u32,
        flags: u32,
        credential: *mut *mut RawCredential,
    ) -> i32;

    pub fn CredDeleteW(target_name: *const u16, kind: u32, flags: u32) -> i32;

    pub fn CredFree(buffer: *const c_void);
}
