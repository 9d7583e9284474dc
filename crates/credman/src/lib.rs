// SPDX-FileCopyrightText: 2026 Credman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command flow for the `credman` binary.
//!
//! Kept as a library so the commands can run against any
//! [`CredentialApi`](credman_store::CredentialApi), including the in-process
//! vault used by tests.

pub mod commands;
pub mod identity;

pub use commands::{NOT_FOUND_MESSAGE, Outcome, run_delete, run_get, run_set};
pub use identity::resolve_user;
