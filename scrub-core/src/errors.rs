//! errors.rs - Custom error types for the scrub-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `scrub-core` library.
///
/// Every variant is fatal to the invocation that produced it: rule problems are
/// raised while the rule set is being built, before any text is touched, and
/// encoding problems are raised before the engine sees the input.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScrubError {
    #[error("Invalid pattern for rule '{rule}': {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("Rule '{0}': pattern can match an empty string, which cannot be redacted")]
    EmptyMatch(String),

    #[error("Rule '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("Invalid rule '{0}': {1}")]
    InvalidRule(String, String),

    #[error("Input from '{source_id}' is not valid {encoding} text (first invalid byte at offset {offset})")]
    Encoding {
        source_id: String,
        encoding: &'static str,
        offset: usize,
    },

    #[error("Unknown input encoding '{0}'")]
    UnknownEncoding(String),
}
