//! Error types for Harvest operations.
//!
//! This module defines the main error type [`HarvestError`] which represents
//! all possible errors that can occur while validating rules, fetching pages,
//! and extracting fields.
//!
//! # Example
//!
//! ```rust
//! use harvest_core::{HarvestError, Result};
//!
//! fn require_selector(field: &str, query: &str) -> Result<()> {
//!     if query.trim().is_empty() {
//!         return Err(HarvestError::InvalidRule {
//!             field: field.to_string(),
//!             reason: "selector must not be empty".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! # assert!(require_selector("title", "").is_err());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for rule validation, fetching and extraction.
///
/// Variants fall into three classes, see [`HarvestError::is_client_error`]
/// and [`HarvestError::is_fetch_error`]:
///
/// - rule errors, raised before any I/O happens
/// - fetch errors, raised before any extraction happens
/// - extraction errors, scoped to a single field
#[derive(Error, Debug)]
pub enum HarvestError {
    /// A rule definition is contradictory or incomplete.
    ///
    /// Raised when both `all` and `order` are given, when the selector is
    /// empty, or when `order` is negative.
    #[error("Invalid rule for field '{field}': {reason}")]
    InvalidRule { field: String, reason: String },

    /// The selector of a rule is not valid CSS.
    #[error("Invalid selector '{selector}' for field '{field}': {reason}")]
    InvalidSelector { field: String, selector: String, reason: String },

    /// Invalid URL provided.
    ///
    /// Returned when a URL cannot be parsed or uses a scheme other than http(s).
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and other HTTP-related problems.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    ///
    /// Returned when an HTTP request exceeds the configured timeout duration.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// The page answered with a non-success status.
    #[error("Fetching {url} returned HTTP status {status}")]
    Status { status: u16, url: String },

    /// An `order` rule asked for a match the selector did not produce.
    ///
    /// This is distinct from a field with no matches at all, which yields
    /// [`FieldValue::Null`](crate::FieldValue::Null).
    #[error("Field '{field}' requested match #{index} but the selector matched {matched} element(s)")]
    IndexOutOfRange { field: String, index: usize, matched: usize },

    /// File not found.
    ///
    /// Returned when attempting to read a file that doesn't exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O errors while reading input or rule files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A rule set file could not be decoded.
    #[error("Failed to load rules from {path}: {reason}")]
    RuleFile { path: PathBuf, reason: String },
}

impl HarvestError {
    /// Stable, machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            HarvestError::InvalidRule { .. } => "invalid_rule",
            HarvestError::InvalidSelector { .. } => "invalid_selector",
            HarvestError::InvalidUrl(_) => "invalid_url",
            #[cfg(feature = "fetch")]
            HarvestError::HttpError(_) => "fetch_failed",
            HarvestError::Timeout { .. } => "timeout",
            HarvestError::Status { .. } => "upstream_status",
            HarvestError::IndexOutOfRange { .. } => "index_out_of_range",
            HarvestError::FileNotFound(_) => "file_not_found",
            HarvestError::Io(_) => "io",
            HarvestError::RuleFile { .. } => "rule_file",
        }
    }

    /// Whether the caller supplied something unusable (rules or URL).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            HarvestError::InvalidRule { .. } | HarvestError::InvalidSelector { .. } | HarvestError::InvalidUrl(_)
        )
    }

    /// Whether acquiring the page failed.
    pub fn is_fetch_error(&self) -> bool {
        match self {
            #[cfg(feature = "fetch")]
            HarvestError::HttpError(_) => true,
            HarvestError::Timeout { .. } | HarvestError::Status { .. } => true,
            _ => false,
        }
    }

    /// The field this error is attached to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            HarvestError::InvalidRule { field, .. }
            | HarvestError::InvalidSelector { field, .. }
            | HarvestError::IndexOutOfRange { field, .. } => Some(field.as_str()),
            _ => None,
        }
    }
}

/// Result type alias for HarvestError.
///
/// This is a convenience alias for `std::result::Result<T, HarvestError>`.
pub type Result<T> = std::result::Result<T, HarvestError>;
