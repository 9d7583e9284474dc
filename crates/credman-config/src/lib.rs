// SPDX-FileCopyrightText: 2026 Credman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Input normalization and settings for credman.
//!
//! [`normalize`] turns whatever the user passed on the command line (a path
//! to a JSON file, inline JSON, or Base64) into the canonical Base64 text
//! that is stored in the vault. The remaining modules load the tool's own
//! TOML settings with environment overrides and render diagnostics.
//!
//! # Usage
//!
//! ```no_run
//! use secrecy::ExposeSecret;
//!
//! let canonical = credman_config::normalize::parse(r#"{"hostname":"keepersecurity.com"}"#)
//!     .expect("valid JSON");
//! println!("{}", canonical.expose_secret());
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod validation;

use std::path::Path;

pub use diagnostic::{SettingsError, SettingsSource, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::CredmanConfig;
pub use normalize::{CanonicalConfig, ParsedInput, parse};

/// Load settings from the standard hierarchy and validate them.
pub fn load_and_validate() -> Result<CredmanConfig, Vec<SettingsError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Load settings from one explicit file (plus env overrides) and validate them.
pub fn load_and_validate_path(path: &Path) -> Result<CredmanConfig, Vec<SettingsError>> {
    finish(loader::load_config_from_path(path), || {
        read_source(path).into_iter().collect()
    })
}

/// Load settings from a TOML string and validate them.
pub fn load_and_validate_str(toml_content: &str) -> Result<CredmanConfig, Vec<SettingsError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![SettingsSource {
            name: diagnostic::INLINE_SOURCE.to_string(),
            text: toml_content.to_string(),
        }]
    })
}

fn finish(
    loaded: Result<CredmanConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<SettingsSource>,
) -> Result<CredmanConfig, Vec<SettingsError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::from_figment(err, &sources())),
    }
}

/// Read the hierarchy's TOML files so diagnostics can point into them.
fn collect_toml_sources() -> Vec<SettingsSource> {
    loader::search_paths()
        .iter()
        .filter_map(|path| read_source(path))
        .collect()
}

fn read_source(path: &Path) -> Option<SettingsSource> {
    let text = std::fs::read_to_string(path).ok()?;
    Some(SettingsSource {
        name: path.display().to_string(),
        text,
    })
}
