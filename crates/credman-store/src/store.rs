// SPDX-FileCopyrightText: 2026 Credman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Safe credential operations over a [`CredentialApi`].

use std::ptr;

use credman_core::{CredentialRecord, MAX_SECRET_BYTES, StoreError};
use tracing::{debug, info, warn};

use crate::api::{CredentialApi, WideName};
use crate::ffi::{CRED_PERSIST_LOCAL_MACHINE, CRED_TYPE_GENERIC, ERROR_NOT_FOUND, RawCredential};
use crate::handle::CredentialHandle;
use crate::marshal;

/// Generic credential store keyed by target name.
///
/// Every value it returns is owned; no vault memory outlives a call. Secrets
/// never appear in log output.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore<A> {
    api: A,
}

impl<A: CredentialApi> CredentialStore<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// The underlying vault API.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Create or replace the record for `target_name`.
    ///
    /// The secret is stored as UTF-16LE, persisted per user on this machine.
    /// Oversized secrets and names containing NUL are rejected before the
    /// vault is called.
    pub fn write(
        &self,
        target_name: &str,
        user_name: &str,
        secret: &str,
    ) -> Result<(), StoreError> {
        let blob = marshal::encode_secret(secret);
        if blob.len() > MAX_SECRET_BYTES {
            warn!(
                target_name,
                size = blob.len(),
                max = MAX_SECRET_BYTES,
                "secret too large, not written"
            );
            return Err(StoreError::SecretTooLarge {
                size: blob.len(),
                max: MAX_SECRET_BYTES,
            });
        }
        let target = WideName::new("target_name", target_name)?;
        let user = WideName::new("user_name", user_name)?;

        let credential = RawCredential {
            kind: CRED_TYPE_GENERIC,
            target_name: target.as_ptr().cast_mut(),
            user_name: user.as_ptr().cast_mut(),
            credential_blob_size: blob.len() as u32,
            credential_blob: if blob.is_empty() {
                ptr::null_mut()
            } else {
                blob.as_ptr().cast_mut()
            },
            persist: CRED_PERSIST_LOCAL_MACHINE,
            ..RawCredential::empty()
        };

        // SAFETY: the pointers borrow from `target`, `user` and `blob`, all of
        // which outlive the call.
        unsafe { self.api.write(&credential) }.map_err(|code| native("CredWriteW", code))?;

        info!(target_name, user_name, bytes = blob.len(), "credential written");
        Ok(())
    }

    /// Fetch the record for `target_name`, or `None` if there is none.
    pub fn read(&self, target_name: &str) -> Result<Option<CredentialRecord>, StoreError> {
        let target = WideName::new("target_name", target_name)?;

        let raw = match self.api.read(&target, CRED_TYPE_GENERIC) {
            Ok(raw) => raw,
            Err(ERROR_NOT_FOUND) => {
                debug!(target_name, "no credential found");
                return Ok(None);
            }
            Err(code) => return Err(native("CredReadW", code)),
        };

        // SAFETY: `raw` was just returned by a successful read and nothing
        // else owns it.
        let handle = unsafe { CredentialHandle::acquire(&self.api, raw) }.ok_or_else(|| {
            StoreError::CorruptRecord("vault returned an invalid record handle".to_string())
        })?;
        // SAFETY: the handle keeps the vault record alive for this call.
        let record = unsafe { marshal::decode_record(handle.credential()) }?;
        drop(handle);

        debug!(
            target_name,
            user_name = %record.user_name,
            kind = %record.kind,
            "credential read"
        );
        Ok(Some(record))
    }

    /// Remove the record for `target_name`.
    ///
    /// A missing record is a failure carrying the native not-found code.
    pub fn delete(&self, target_name: &str) -> Result<(), StoreError> {
        let target = WideName::new("target_name", target_name)?;
        self.api
            .delete(&target, CRED_TYPE_GENERIC)
            .map_err(|code| native("CredDeleteW", code))?;
        info!(target_name, "credential deleted");
        Ok(())
    }

    /// Whether a record exists for `target_name`.
    pub fn exists(&self, target_name: &str) -> Result<bool, StoreError> {
        Ok(self.read(target_name)?.is_some())
    }
}

fn native(operation: &'static str, code: u32) -> StoreError {
    warn!(operation, code, "native credential call failed");
    StoreError::NativeFailure { operation, code }
}

#[cfg(test)]
mod tests {
    use credman_core::CredentialKind;
    use secrecy::ExposeSecret;
    use tracing_test::traced_test;

    use super::*;
    use crate::memory::MemoryVault;

    fn store() -> CredentialStore<MemoryVault> {
        CredentialStore::new(MemoryVault::new())
    }

    fn assert_no_leaks(vault: &MemoryVault) {
        assert_eq!(vault.outstanding(), 0);
        assert_eq!(vault.acquired(), vault.released());
        assert_eq!(vault.invalid_frees(), 0);
    }

    #[test]
    fn write_then_read_returns_all_fields() {
        let store = store();
        store.write("testApp", "testUser", "testConfig").unwrap();

        let record = store.read("testApp").unwrap().expect("record exists");
        assert_eq!(record.kind, CredentialKind::Generic);
        assert_eq!(record.target_name, "testApp");
        assert_eq!(record.user_name, "testUser");
        assert_eq!(record.secret.expose_secret(), "testConfig");
        assert_no_leaks(store.api());
    }

    #[test]
    fn write_uses_local_machine_persistence_and_utf16_blob() {
        let store = store();
        store.write("app", "user", "Ab").unwrap();
        assert_eq!(store.api().persist_of("app"), Some(CRED_PERSIST_LOCAL_MACHINE));
        assert_eq!(store.api().blob_of("app").unwrap(), vec![0x41, 0, 0x62, 0]);
    }

    #[test]
    fn second_write_replaces_first() {
        let store = store();
        store.write("app", "first", "one").unwrap();
        store.write("app", "second", "two").unwrap();

        let record = store.read("app").unwrap().unwrap();
        assert_eq!(record.user_name, "second");
        assert_eq!(record.secret.expose_secret(), "two");
        assert_eq!(store.api().len(), 1);
    }

    #[test]
    fn missing_record_reads_as_none() {
        let store = store();
        assert!(store.read("never-written").unwrap().is_none());
        assert!(!store.exists("never-written").unwrap());
        assert_eq!(store.api().acquired(), 0);
    }

    #[test]
    fn delete_removes_record() {
        let store = store();
        store.write("app", "user", "secret").unwrap();
        assert!(store.exists("app").unwrap());

        store.delete("app").unwrap();
        assert!(store.read("app").unwrap().is_none());
        assert!(store.api().is_empty());
    }

    #[test]
    fn deleting_absent_record_reports_not_found_code() {
        let err = store().delete("absent").unwrap_err();
        assert!(matches!(
            err,
            StoreError::NativeFailure {
                operation: "CredDeleteW",
                code: ERROR_NOT_FOUND
            }
        ));
    }

    #[test]
    fn secret_at_limit_is_accepted() {
        let store = store();
        let secret = "a".repeat(MAX_SECRET_BYTES / 2);
        store.write("app", "user", &secret).unwrap();
        let record = store.read("app").unwrap().unwrap();
        assert_eq!(record.secret.expose_secret(), secret);
    }

    #[test]
    fn secret_over_limit_never_reaches_vault() {
        let store = store();
        let secret = "a".repeat(MAX_SECRET_BYTES / 2 + 1);
        let err = store.write("app", "user", &secret).unwrap_err();
        assert!(matches!(
            err,
            StoreError::SecretTooLarge {
                size: 2562,
                max: 2560
            }
        ));
        assert_eq!(store.api().write_calls(), 0);
        assert_eq!(store.api().native_calls(), 0);
    }

    #[test]
    fn limit_counts_utf16_units_not_chars() {
        // Each U+1F511 takes two UTF-16 units, four bytes.
        let store = store();
        let fits = "\u{1F511}".repeat(MAX_SECRET_BYTES / 4);
        store.write("app", "user", &fits).unwrap();

        let over = format!("{fits}a");
        assert!(matches!(
            store.write("app", "user", &over),
            Err(StoreError::SecretTooLarge { .. })
        ));
    }

    #[test]
    fn non_bmp_text_round_trips() {
        let store = store();
        store.write("app-\u{1F511}", "us\u{e9}r", "s\u{1F600}cret").unwrap();
        let record = store.read("app-\u{1F511}").unwrap().unwrap();
        assert_eq!(record.user_name, "us\u{e9}r");
        assert_eq!(record.secret.expose_secret(), "s\u{1F600}cret");
    }

    #[test]
    fn empty_secret_round_trips() {
        let store = store();
        store.write("app", "user", "").unwrap();
        let record = store.read("app").unwrap().unwrap();
        assert_eq!(record.secret.expose_secret(), "");
        assert_no_leaks(store.api());
    }

    #[test]
    fn interior_nul_is_rejected_before_vault() {
        let store = store();
        let err = store.write("a\0b", "user", "x").unwrap_err();
        assert!(matches!(err, StoreError::InteriorNul { field: "target_name" }));
        let err = store.write("app", "us\0er", "x").unwrap_err();
        assert!(matches!(err, StoreError::InteriorNul { field: "user_name" }));
        assert_eq!(store.api().native_calls(), 0);
    }

    #[test]
    fn native_failures_carry_operation_and_code() {
        let store = store();
        store.api().fail_next_call(5);
        let err = store.write("app", "user", "x").unwrap_err();
        assert!(matches!(
            err,
            StoreError::NativeFailure {
                operation: "CredWriteW",
                code: 5
            }
        ));

        store.api().fail_next_call(1312);
        let err = store.read("app").unwrap_err();
        assert!(matches!(
            err,
            StoreError::NativeFailure {
                operation: "CredReadW",
                code: 1312
            }
        ));
    }

    #[test]
    fn corrupt_secret_still_releases_record() {
        let store = store();
        store
            .api()
            .insert_raw("app", "user", 0xDC00u16.to_le_bytes().to_vec());

        let err = store.read("app").unwrap_err();
        assert!(matches!(err, StoreError::CorruptRecord(_)));
        assert_eq!(store.api().acquired(), 1);
        assert_no_leaks(store.api());
    }

    #[test]
    fn oversized_stored_blob_is_corrupt_and_released() {
        let store = store();
        store
            .api()
            .insert_raw("app", "user", vec![b'a'; MAX_SECRET_BYTES + 2]);

        assert!(matches!(
            store.read("app"),
            Err(StoreError::CorruptRecord(_))
        ));
        assert_no_leaks(store.api());
    }

    #[test]
    fn invalid_handle_is_corrupt_without_release() {
        let store = store();
        store.write("app", "user", "x").unwrap();
        store.api().return_invalid_handle_once();

        let err = store.read("app").unwrap_err();
        assert!(matches!(err, StoreError::CorruptRecord(ref m) if m.contains("handle")));
        assert_eq!(store.api().released(), 0);
        assert_eq!(store.api().invalid_frees(), 0);
    }

    #[test]
    fn concurrent_reads_release_every_record() {
        let vault = MemoryVault::new();
        CredentialStore::new(&vault)
            .write("good", "user", "payload")
            .unwrap();
        vault.insert_raw("bad", "user", vec![0x00, 0xD8]);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    let store = CredentialStore::new(&vault);
                    for _ in 0..200 {
                        let record = store.read("good").unwrap().unwrap();
                        assert_eq!(record.secret.expose_secret(), "payload");
                        assert!(store.read("bad").is_err());
                        assert!(store.read("missing").unwrap().is_none());
                    }
                });
            }
        });

        assert_eq!(vault.acquired(), 8 * 200 * 2);
        assert_no_leaks(&vault);
    }

    #[test]
    #[traced_test]
    fn secrets_never_reach_logs() {
        let store = store();
        store.write("testApp", "testUser", "hunter2-secret").unwrap();
        let _ = store.read("testApp").unwrap();
        store.delete("testApp").unwrap();

        assert!(logs_contain("credential written"));
        assert!(logs_contain("credential read"));
        assert!(logs_contain("testApp"));
        assert!(!logs_contain("hunter2-secret"));
    }

    #[test]
    #[traced_test]
    fn native_failure_is_logged_once_as_warning() {
        let store = store();
        assert!(store.delete("missing").is_err());

        logs_assert(|lines: &[&str]| {
            let failures = lines
                .iter()
                .filter(|line| line.contains("native credential call failed"))
                .count();
            match failures {
                1 if lines.iter().all(|line| !line.contains("ERROR")) => Ok(()),
                1 => Err("failure was logged at error level".to_string()),
                n => Err(format!("expected one failure line, got {n}")),
            }
        });
        assert!(logs_contain("WARN"));
    }
}
