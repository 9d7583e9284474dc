// SPDX-FileCopyrightText: 2026 Credman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the credman workspace.

use std::path::PathBuf;

use thiserror::Error;

/// Rejection reasons for user-supplied config input.
///
/// Always recoverable: the caller reports it and exits, nothing is written.
#[derive(Debug, Error)]
pub enum InvalidConfig {
    /// The input named an existing file whose contents are not a JSON document.
    #[error("invalid JSON file contents: {path}: {detail}")]
    JsonFileContents { path: PathBuf, detail: String },

    /// The input named an existing path that could not be opened or read.
    #[error("invalid config file path: {path}")]
    FilePath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input is neither a file path, a JSON document, nor standard Base64.
    #[error("invalid config string")]
    ConfigString,
}

/// Failures reported by the credential store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The UTF-16 encoded secret exceeds the generic secret ceiling.
    /// Raised before any native call.
    #[error("secret is {size} bytes as UTF-16, which exceeds the {max} byte limit")]
    SecretTooLarge { size: usize, max: usize },

    /// The native vault rejected the call.
    #[error("{operation} failed with error code {code}")]
    NativeFailure { operation: &'static str, code: u32 },

    /// The vault returned a record whose fields could not be decoded.
    #[error("corrupt credential record: {0}")]
    CorruptRecord(String),

    /// A name field contains U+0000 and cannot be passed as a wide C string.
    #[error("{field} must not contain NUL characters")]
    InteriorNul { field: &'static str },

    /// No native vault exists on this platform.
    #[error("the native credential vault is not available on this platform")]
    Unsupported,
}

/// Top-level error for the command surface.
#[derive(Debug, Error)]
pub enum CredmanError {
    #[error(transparent)]
    InvalidConfig(#[from] InvalidConfig),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// No user identity could be resolved for a write.
    #[error("could not determine the current user name; pass --user")]
    UnknownUser,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
