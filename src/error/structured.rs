//! Structured error output.
//!
//! Provides machine-parseable error information with:
//! - Error codes for categorization
//! - Hints for self-correction
//! - Retryability flags
//! - Context for debugging

use crate::error::RotsitError;
use crate::query::{QueryError, TokenizeError};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Machine-readable error codes.
///
/// These codes are stable and can be used for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // === Storage Errors (exit code 2) ===
    /// Issue database not found
    StoreNotFound,
    /// Already initialized
    AlreadyInitialized,
    /// Issue database could not be decoded
    CorruptStore,

    // === Issue Errors (exit code 3) ===
    /// Issue with specified ID not found
    IssueNotFound,
    /// Partial ID matches multiple issues
    AmbiguousId,
    /// Lifecycle change not allowed from the current status
    InvalidTransition,

    // === Validation Errors (exit code 4) ===
    /// Field validation failed
    ValidationFailed,
    /// Invalid status value
    InvalidStatus,

    // === Query Errors (exit code 5) ===
    /// Blank query expression
    EmptyQuery,
    /// Nothing to query
    NoRecords,
    /// Malformed query expression
    QuerySyntax,
    /// A query operation failed
    EvaluationFailed,

    // === Config Errors (exit code 6) ===
    /// Configuration error
    ConfigError,

    // === I/O Errors (exit code 7) ===
    /// File I/O error
    IoError,
    /// JSON serialization error
    JsonError,

    // === Internal Errors (exit code 1) ===
    /// Unexpected internal error
    InternalError,
}

impl ErrorCode {
    /// Get the string representation for JSON output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            // Storage
            Self::StoreNotFound => "STORE_NOT_FOUND",
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
            Self::CorruptStore => "CORRUPT_STORE",
            // Issue
            Self::IssueNotFound => "ISSUE_NOT_FOUND",
            Self::AmbiguousId => "AMBIGUOUS_ID",
            Self::InvalidTransition => "INVALID_TRANSITION",
            // Validation
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::InvalidStatus => "INVALID_STATUS",
            // Query
            Self::EmptyQuery => "EMPTY_QUERY",
            Self::NoRecords => "NO_RECORDS",
            Self::QuerySyntax => "QUERY_SYNTAX",
            Self::EvaluationFailed => "EVALUATION_FAILED",
            // Config
            Self::ConfigError => "CONFIG_ERROR",
            // I/O
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            // Internal
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Whether this error is potentially retryable after fixing the input.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ValidationFailed
                | Self::InvalidStatus
                | Self::AmbiguousId
                | Self::EmptyQuery
                | Self::QuerySyntax
        )
    }

    /// Get the exit code for this error category.
    ///
    /// Exit codes are grouped by error category:
    /// - 1: Internal/unknown errors
    /// - 2: Storage errors
    /// - 3: Issue errors
    /// - 4: Validation errors
    /// - 5: Query errors
    /// - 6: Config errors
    /// - 7: I/O errors
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::StoreNotFound | Self::AlreadyInitialized | Self::CorruptStore => 2,
            Self::IssueNotFound | Self::AmbiguousId | Self::InvalidTransition => 3,
            Self::ValidationFailed | Self::InvalidStatus => 4,
            Self::EmptyQuery
            | Self::NoRecords
            | Self::QuerySyntax
            | Self::EvaluationFailed => 5,
            Self::ConfigError => 6,
            Self::IoError | Self::JsonError => 7,
            Self::InternalError => 1,
        }
    }
}

/// Structured error for machine-parseable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional hint for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether the operation can be retried
    pub retryable: bool,
    /// Additional context data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl StructuredError {
    /// Create a new structured error from a `RotsitError`.
    #[must_use]
    pub fn from_error(err: &RotsitError) -> Self {
        let (code, context) = Self::extract_code_and_context(err);
        let hint = Self::generate_hint(err);

        Self {
            code,
            message: err.to_string(),
            hint,
            retryable: code.is_retryable(),
            context,
        }
    }

    /// Serialize to JSON value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "code": self.code.as_str(),
                "message": self.message,
                "hint": self.hint,
                "retryable": self.retryable,
                "context": self.context,
            }
        })
    }

    /// Format for human-readable output.
    #[must_use]
    pub fn to_human(&self, color: bool) -> String {
        let mut output = String::new();

        if color {
            output.push_str("\x1b[31mError:\x1b[0m ");
        } else {
            output.push_str("Error: ");
        }

        output.push_str(&self.message);

        if let Some(hint) = &self.hint {
            output.push('\n');
            if color {
                output.push_str("\x1b[33mHint:\x1b[0m ");
            } else {
                output.push_str("Hint: ");
            }
            output.push_str(hint);
        }

        output
    }

    fn query_code(err: &QueryError) -> (ErrorCode, Option<Value>) {
        match err {
            QueryError::EmptyExpression => (ErrorCode::EmptyQuery, None),
            QueryError::NoRecords => (ErrorCode::NoRecords, None),
            QueryError::Tokenize { expr, source } => {
                let offset = match source {
                    TokenizeError::UnexpectedCharacter { offset, .. }
                    | TokenizeError::UnterminatedQuote { offset } => offset,
                };
                (
                    ErrorCode::QuerySyntax,
                    Some(json!({"expression": expr, "offset": offset})),
                )
            }
            QueryError::Syntax { expr, source } => (
                ErrorCode::QuerySyntax,
                Some(json!({"expression": expr, "reason": source.to_string()})),
            ),
            QueryError::Evaluation { expr, source } => (
                ErrorCode::EvaluationFailed,
                Some(json!({"expression": expr, "reason": source.to_string()})),
            ),
        }
    }

    /// Extract error code and context from a `RotsitError`.
    fn extract_code_and_context(err: &RotsitError) -> (ErrorCode, Option<Value>) {
        match err {
            RotsitError::StoreNotFound { path } => (
                ErrorCode::StoreNotFound,
                Some(json!({"path": path.display().to_string()})),
            ),
            RotsitError::AlreadyInitialized { path } => (
                ErrorCode::AlreadyInitialized,
                Some(json!({"path": path.display().to_string()})),
            ),
            RotsitError::Codec(_) => (ErrorCode::CorruptStore, None),
            RotsitError::IssueNotFound { id, similar } => (
                ErrorCode::IssueNotFound,
                Some(json!({"searched_id": id, "similar_ids": similar})),
            ),
            RotsitError::AmbiguousId { partial, matches } => (
                ErrorCode::AmbiguousId,
                Some(json!({"partial_id": partial, "matches": matches})),
            ),
            RotsitError::InvalidTransition { id, action, status } => (
                ErrorCode::InvalidTransition,
                Some(json!({"id": id, "action": action, "status": status})),
            ),
            RotsitError::Validation { field, reason } => (
                ErrorCode::ValidationFailed,
                Some(json!({"field": field, "reason": reason})),
            ),
            RotsitError::InvalidStatus { status } => (
                ErrorCode::InvalidStatus,
                Some(json!({
                    "status": status,
                    "valid_values": VALID_STATUSES,
                })),
            ),
            RotsitError::Query(query) => Self::query_code(query),
            RotsitError::Config { path, .. } => (
                ErrorCode::ConfigError,
                Some(json!({"path": path.display().to_string()})),
            ),
            RotsitError::Io(_) => (ErrorCode::IoError, None),
            RotsitError::Json(_) => (ErrorCode::JsonError, None),
            RotsitError::Other(_) => (ErrorCode::InternalError, None),
        }
    }

    /// Generate context-aware hint from error.
    fn generate_hint(err: &RotsitError) -> Option<String> {
        if let RotsitError::InvalidStatus { status } = err {
            if let Some(detected) = detect_status_intent(status) {
                return Some(format!("Did you mean '{detected}'?"));
            }
        }

        if let Some(suggestion) = err.suggestion() {
            return Some(suggestion.to_string());
        }

        match err {
            RotsitError::IssueNotFound { similar, .. } => Some(match similar.as_slice() {
                [] => "Run 'rotsit list' to see available issues.".to_string(),
                [only] => format!("Did you mean '{only}'?"),
                many => format!("Did you mean one of: {}?", many.join(", ")),
            }),
            RotsitError::InvalidTransition { action, .. } if *action == "close" => {
                Some("Reopen the issue first with: rotsit reopen".to_string())
            }
            RotsitError::Codec(_) => {
                Some("Check that the file was written by rotsit and not edited by hand.".to_string())
            }
            _ => None,
        }
    }
}

// === Precomputed Valid Values ===

/// Valid status values.
const VALID_STATUSES: [&str; 3] = ["open", "closed", "duplicate"];

/// Status synonyms for intent detection.
static STATUS_SYNONYMS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("done", "closed"),
        ("fixed", "closed"),
        ("resolved", "closed"),
        ("wontfix", "closed"),
        ("new", "open"),
        ("todo", "open"),
        ("reopened", "open"),
        ("dup", "duplicate"),
        ("dupe", "duplicate"),
    ]
    .into_iter()
    .collect()
});

// === Intent Detection ===

/// Detect what status the user likely meant.
fn detect_status_intent(input: &str) -> Option<&'static str> {
    let lower = input.to_lowercase();

    if let Some(status) = VALID_STATUSES.iter().find(|s| **s == lower) {
        return Some(*status);
    }

    if let Some(&canonical) = STATUS_SYNONYMS.get(lower.as_str()) {
        return Some(canonical);
    }

    if lower.is_empty() {
        return None;
    }
    VALID_STATUSES
        .iter()
        .find(|status| status.starts_with(&lower))
        .copied()
}

// === Levenshtein Distance ===

/// Calculate the Levenshtein distance between two strings.
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}

/// Find IDs similar to the searched ID using Levenshtein distance.
///
/// Returns up to `max_suggestions` IDs with distance <= 3.
#[must_use]
pub fn find_similar_ids(searched: &str, existing: &[&str], max_suggestions: usize) -> Vec<String> {
    let mut candidates: Vec<(usize, &str)> = existing
        .iter()
        .map(|id| (levenshtein_distance(searched, id), *id))
        .filter(|(dist, _)| *dist <= 3)
        .collect();

    candidates.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    candidates
        .into_iter()
        .take(max_suggestions)
        .map(|(_, id)| id.to_string())
        .collect()
}
