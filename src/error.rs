//! Error types for document loading, dialect detection and pattern compilation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while reading an API description document.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            LoadError::InvalidJson { .. } => 2,
        }
    }
}

/// Errors while detecting which API description format a document follows.
#[derive(Debug, Error)]
pub enum DialectError {
    #[error("unrecognized API description format: missing top-level \"swagger\" or \"openapi\" key")]
    UnrecognizedFormat,

    #[error("unsupported {key} version: {version}")]
    UnsupportedVersion { key: &'static str, version: String },
}

impl DialectError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Errors while compiling the configured field name patterns.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid pattern \"{pattern}\": {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl PatternError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Any condition that aborts a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Dialect(#[from] DialectError),

    #[error(transparent)]
    Pattern(#[from] PatternError),
}

impl ScanError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ScanError::Load(e) => e.exit_code(),
            ScanError::Dialect(e) => e.exit_code(),
            ScanError::Pattern(e) => e.exit_code(),
        }
    }
}
