//! Error types for the configuration store.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read or write the backing file
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The raw bytes do not decode as the dispatched schema generation
    #[error("invalid configuration document at line {line}, column {column}: {detail}")]
    Format {
        line: usize,
        column: usize,
        detail: String,
    },

    /// A migration step rejected the document
    #[error("cannot upgrade configuration from v{from} to v{to}: {detail}")]
    Upgrade { from: u64, to: u64, detail: String },

    /// The document failed validation
    #[error("configuration data has errors after validation: {detail}")]
    Validation { detail: String },
}

impl StoreError {
    /// Create an I/O error bound to the path it occurred on
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Annotate a `serde_json` decode failure with the offending line of the
    /// raw input, so a user can locate the problem in the file.
    pub(crate) fn format(raw: &[u8], err: serde_json::Error) -> Self {
        let line = err.line();
        let column = err.column();

        let snippet = raw
            .split(|&b| b == b'\n')
            .nth(line.saturating_sub(1))
            .map(|l| String::from_utf8_lossy(l).trim().to_string())
            .filter(|s| !s.is_empty());

        let detail = match snippet {
            Some(s) => format!("{err} (near '{s}')"),
            None => err.to_string(),
        };

        Self::Format {
            line,
            column,
            detail,
        }
    }

    /// Create an upgrade error for the given migration step
    pub(crate) fn upgrade(from: u64, to: u64, detail: impl Into<String>) -> Self {
        Self::Upgrade {
            from,
            to,
            detail: detail.into(),
        }
    }

    /// Create a validation error summarizing the recorded findings
    pub(crate) fn validation(findings: &[String]) -> Self {
        Self::Validation {
            detail: findings.join("; "),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
