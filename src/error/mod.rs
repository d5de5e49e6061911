//! Error types and handling for `rotsit`.
//!
//! # Design
//!
//! - Uses `thiserror` for derive-based error types
//! - Module errors (`CodecError`, `QueryError`, ...) convert via `#[from]`
//! - Provides recovery hints for user-facing errors
//! - Maps onto stable codes and exit codes through [`StructuredError`]

mod structured;

pub use structured::{ErrorCode, StructuredError, find_similar_ids};

use crate::query::{QueryError, TokenizeError};
use crate::storage::codec::CodecError;
use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for `rotsit` operations.
#[derive(Error, Debug)]
pub enum RotsitError {
    // === Storage Errors ===
    /// Issue database not found at the specified path.
    #[error("Issue database not found at '{path}'")]
    StoreNotFound { path: PathBuf },

    /// Already initialized.
    #[error("Issue database already exists at '{path}'")]
    AlreadyInitialized { path: PathBuf },

    /// Issue database could not be decoded.
    #[error("Corrupt issue database: {0}")]
    Codec(#[from] CodecError),

    // === Issue Errors ===
    /// Issue with the specified ID was not found. `similar` holds close
    /// GUIDs for a "did you mean" hint.
    #[error("Issue not found: {id}")]
    IssueNotFound { id: String, similar: Vec<String> },

    /// Partial ID matches multiple issues.
    #[error("Ambiguous ID '{partial}': matches {matches:?}")]
    AmbiguousId {
        partial: String,
        matches: Vec<String>,
    },

    /// Invalid status value.
    #[error("Invalid status: {status}")]
    InvalidStatus { status: String },

    /// The issue is not in a state that allows the change.
    #[error("Cannot {action} {id}: issue is {status}")]
    InvalidTransition {
        id: String,
        action: &'static str,
        status: String,
    },

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    // === Query Errors ===
    /// Query could not be run.
    #[error(transparent)]
    Query(#[from] QueryError),

    // === Configuration Errors ===
    /// Configuration file could not be read as YAML.
    #[error("Configuration error in '{path}': {reason}")]
    Config { path: PathBuf, reason: String },

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Wrapped anyhow error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RotsitError {
    /// Human-friendly suggestion for fixing this error.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::StoreNotFound { .. } => Some("Check --db or run: rotsit init"),
            Self::AlreadyInitialized { .. } => Some("Use --force to reinitialize"),
            Self::AmbiguousId { .. } => Some("Provide more characters of the ID"),
            Self::InvalidStatus { .. } => Some("Valid statuses: open, closed, duplicate"),
            Self::Query(QueryError::Tokenize {
                source: TokenizeError::UnexpectedCharacter { .. },
                ..
            }) => Some("Comparisons are written '==' and '!='"),
            Self::Query(QueryError::Syntax { .. }) => {
                Some("Separate operands with operators and balance parentheses")
            }
            Self::Query(QueryError::NoRecords) => Some("Add an issue with: rotsit add"),
            Self::Config { .. } => Some("Fix or remove the file; keys are plain 'name: value' pairs"),
            _ => None,
        }
    }

    /// Create a validation error for a specific field.
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type using `RotsitError`.
pub type Result<T> = std::result::Result<T, RotsitError>;
