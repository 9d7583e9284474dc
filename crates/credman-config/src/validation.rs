// SPDX-FileCopyrightText: 2026 Credman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for settings values.

use crate::diagnostic::SettingsError;
use crate::model::CredmanConfig;

/// Accepted values for `logging.level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate settings, collecting every error instead of stopping at the first.
pub fn validate_config(config: &CredmanConfig) -> Result<(), Vec<SettingsError>> {
    let mut errors = Vec::new();

    let level = config.logging.level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(SettingsError::Invalid {
            key: "logging.level",
            message: format!(
                "`{}` is not one of: {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if let Some(user) = &config.credential.user_name {
        if user.trim().is_empty() {
            errors.push(SettingsError::Invalid {
                key: "credential.user_name",
                message: "must not be empty when set".to_string(),
            });
        }
        if user.contains('\0') {
            errors.push(SettingsError::Invalid {
                key: "credential.user_name",
                message: "must not contain NUL characters".to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
