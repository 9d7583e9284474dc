// SPDX-FileCopyrightText: 2026 Credman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings errors as miette diagnostics.
//!
//! Figment reports every problem it finds; each becomes one
//! [`SettingsError`]. Unknown keys carry the closest valid key and, when the
//! settings text is at hand, a label pointing at the offending key.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use std::io::Write;

use figment::error::Kind;
use miette::{Diagnostic, GraphicalReportHandler, NamedSource, SourceSpan};
use thiserror::Error;

/// Jaro-Winkler score a valid key must beat to be suggested.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Name given to settings parsed from a string rather than a file.
pub const INLINE_SOURCE: &str = "<inline>";

/// Settings text kept around so diagnostics can point into it.
#[derive(Debug, Clone)]
pub struct SettingsSource {
    /// File path, or [`INLINE_SOURCE`].
    pub name: String,
    pub text: String,
}

/// A problem with the tool's own settings.
#[derive(Debug, Error, Diagnostic)]
pub enum SettingsError {
    #[error("unknown settings key `{key}`")]
    #[diagnostic(
        code(credman::config::unknown_key),
        help("{}", key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        valid_keys: String,
        #[label("not a credman setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type: found {found}")]
    #[diagnostic(code(credman::config::wrong_type), help("expected {expected}"))]
    WrongType {
        key: String,
        found: String,
        expected: String,
    },

    #[error("invalid value for `{key}`: {message}")]
    #[diagnostic(code(credman::config::invalid_value))]
    Invalid { key: &'static str, message: String },

    #[error("settings error: {0}")]
    #[diagnostic(code(credman::config::other))]
    Other(String),
}

fn key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(key) => format!("did you mean `{key}`? Valid keys here: {valid_keys}"),
        None => format!("valid keys here: {valid_keys}"),
    }
}

/// Turn a figment error, and every error chained to it, into diagnostics.
pub fn from_figment(err: figment::Error, sources: &[SettingsSource]) -> Vec<SettingsError> {
    err.into_iter()
        .map(|error| {
            let path: Vec<String> = error.path.clone();
            match &error.kind {
                Kind::UnknownField(key, expected) => {
                    let source = source_for(&error, sources);
                    let section = path.first().map(String::as_str);
                    let located = source.and_then(|source| {
                        locate_key(&source.text, section, key).map(|offset| {
                            (
                                SourceSpan::new(offset.into(), key.len()),
                                NamedSource::new(&source.name, source.text.clone()),
                            )
                        })
                    });
                    let (span, src) = located.unzip();
                    SettingsError::UnknownKey {
                        key: key.clone(),
                        suggestion: suggest_key(key, expected),
                        valid_keys: expected.join(", "),
                        span,
                        src,
                    }
                }
                Kind::InvalidType(found, expected) => SettingsError::WrongType {
                    key: path.join("."),
                    found: found.to_string(),
                    expected: expected.clone(),
                },
                _ => SettingsError::Other(error.to_string()),
            }
        })
        .collect()
}

/// The source an error came from: its file when figment recorded one,
/// otherwise the inline text.
fn source_for<'a>(
    error: &figment::Error,
    sources: &'a [SettingsSource],
) -> Option<&'a SettingsSource> {
    let file = error
        .metadata
        .as_ref()
        .and_then(|metadata| metadata.source.as_ref())
        .and_then(|source| match source {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });
    let wanted = file.as_deref().unwrap_or(INLINE_SOURCE);
    sources.iter().find(|source| source.name == wanted)
}

/// Byte offset of `key` in TOML `text`.
///
/// With a `section`, only lines under that table header are searched. Without
/// one, top-level keys and table headers named `key` both match.
pub fn locate_key(text: &str, section: Option<&str>, key: &str) -> Option<usize> {
    let mut in_scope = section.is_none();
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let body = line.trim_start();
        let indent = line.len() - body.len();

        if let Some(header) = table_header(body) {
            if section.is_none() && header == key {
                let name_start = body.find(key).unwrap_or(1);
                return Some(offset + indent + name_start);
            }
            in_scope = section == Some(header);
        } else if in_scope {
            if let Some(rest) = body.strip_prefix(key) {
                if rest.trim_start().starts_with('=') {
                    return Some(offset + indent);
                }
            }
        }

        offset += line.len();
    }

    None
}

fn table_header(line: &str) -> Option<&str> {
    let inner = line.trim_end().strip_prefix('[')?.strip_suffix(']')?;
    Some(inner.trim())
}

/// The valid key most similar to `unknown`, if any is similar enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    let (score, key) = valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .max_by(|a, b| a.0.total_cmp(&b.0))?;
    (score > SUGGESTION_THRESHOLD).then(|| key.to_string())
}

/// Print each error to stderr with miette's graphical handler.
pub fn render_errors(errors: &[SettingsError]) {
    let handler = GraphicalReportHandler::new();
    let mut stderr = std::io::stderr().lock();
    for error in errors {
        let mut rendered = String::new();
        let _ = match handler.render_report(&mut rendered, error) {
            Ok(()) => write!(stderr, "{rendered}"),
            Err(_) => writeln!(stderr, "error: {error}"),
        };
    }
}
