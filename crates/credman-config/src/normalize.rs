// SPDX-FileCopyrightText: 2026 Credman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reduce user config input to the canonical Base64 form stored in the vault.
//!
//! Input is classified in a fixed order, first match wins:
//!
//! 1. An existing filesystem path. The file must contain a JSON document; its
//!    raw text is Base64-encoded.
//! 2. Inline JSON (any value a standard JSON parser accepts). The input text
//!    is Base64-encoded verbatim, never re-serialized.
//! 3. Standard Base64 (strict alphabet and padding, trailing bits ignored).
//!    Returned unchanged; the decoded bytes are not inspected.
//!
//! The existence check in step 1 and the subsequent read are two separate
//! filesystem observations. A path that disappears in between is reported as
//! [`InvalidConfig::FilePath`].

use std::path::Path;

use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD as BASE64};
use credman_core::InvalidConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::de::IgnoredAny;
use tracing::debug;

/// Standard alphabet with required padding. Non-zero trailing bits in the
/// last symbol are accepted; only alphabet and padding are checked.
const BASE64_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Classified config input, before canonicalization.
#[derive(Debug)]
pub enum ParsedInput<'a> {
    /// A JSON file on disk, with its full text already read.
    FilePath { path: &'a Path, contents: String },
    /// A JSON document passed inline.
    InlineJson(&'a str),
    /// Text that already decodes as standard Base64.
    Base64(&'a str),
}

impl ParsedInput<'_> {
    /// Short label for logs. Never includes input content.
    pub fn kind(&self) -> &'static str {
        match self {
            ParsedInput::FilePath { .. } => "file_path",
            ParsedInput::InlineJson(_) => "inline_json",
            ParsedInput::Base64(_) => "base64",
        }
    }

    /// Produce the canonical Base64 text for this input.
    pub fn into_canonical(self) -> CanonicalConfig {
        let encoded = match self {
            ParsedInput::FilePath { contents, .. } => BASE64.encode(contents.as_bytes()),
            ParsedInput::InlineJson(json) => BASE64.encode(json.as_bytes()),
            ParsedInput::Base64(text) => text.to_string(),
        };
        CanonicalConfig(SecretString::from(encoded))
    }
}

/// Canonical Base64 config text, ready to hand to the credential store.
///
/// Wrapped as a secret so it never shows up in `Debug` output.
#[derive(Debug)]
pub struct CanonicalConfig(SecretString);

impl CanonicalConfig {
    pub fn into_secret(self) -> SecretString {
        self.0
    }
}

impl ExposeSecret<str> for CanonicalConfig {
    fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Classify and canonicalize `input`.
pub fn parse(input: &str) -> Result<CanonicalConfig, InvalidConfig> {
    let parsed = classify(input)?;
    debug!(kind = parsed.kind(), "config input classified");
    Ok(parsed.into_canonical())
}

/// Classify `input` without encoding it.
pub fn classify(input: &str) -> Result<ParsedInput<'_>, InvalidConfig> {
    let path = Path::new(input);
    if path.exists() {
        let contents = read_json_file(path)?;
        return Ok(ParsedInput::FilePath { path, contents });
    }

    if is_json(input) {
        return Ok(ParsedInput::InlineJson(input));
    }

    match BASE64_LENIENT.decode(input) {
        Ok(_) => Ok(ParsedInput::Base64(input)),
        Err(_) => Err(InvalidConfig::ConfigString),
    }
}

fn read_json_file(path: &Path) -> Result<String, InvalidConfig> {
    let bytes = std::fs::read(path).map_err(|source| InvalidConfig::FilePath {
        path: path.to_path_buf(),
        source,
    })?;

    let contents = String::from_utf8(bytes).map_err(|e| InvalidConfig::JsonFileContents {
        path: path.to_path_buf(),
        detail: format!("file is not valid UTF-8: {e}"),
    })?;

    if let Err(e) = serde_json::from_str::<IgnoredAny>(&contents) {
        return Err(InvalidConfig::JsonFileContents {
            path: path.to_path_buf(),
            detail: e.to_string(),
        });
    }

    debug!(path = %path.display(), bytes = contents.len(), "read config file");
    Ok(contents)
}

fn is_json(text: &str) -> bool {
    serde_json::from_str::<IgnoredAny>(text).is_ok()
}
