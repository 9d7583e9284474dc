// SPDX-FileCopyrightText: 2026 Credman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the credman credential tool.
//!
//! Holds the record types shared between the config normalizer and the
//! credential store, and the error taxonomy every crate in the workspace
//! reports through.

pub mod error;
pub mod types;

pub use error::{CredmanError, InvalidConfig, StoreError};
pub use types::{CredentialKind, CredentialRecord, MAX_SECRET_BYTES};
