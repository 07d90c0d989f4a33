// scrub-core/src/lib.rs
//! # Scrub Core Library
//!
//! `scrub-core` provides the platform-independent logic for redacting
//! personally identifiable information from text. It defines declarative
//! redaction rules, compiles them into an ordered `RuleSet`, and applies them
//! through the `SanitizationEngine` trait.
//!
//! The library is pure and stateless: it performs no I/O of its own, and the
//! built-in catalog is an ordinary value passed explicitly to the engine.
//!
//! ## Modules
//!
//! * `config`: Declarative `RuleConfig`s, the embedded default catalog, merging and filtering.
//! * `policy`: The closed set of replacement policies (`Literal`, `Mask`, `Tag`).
//! * `sanitizers`: Compiles rules into a `RuleSet`, rejecting bad patterns up front.
//! * `validators`: Post-match checks that reduce false positives.
//! * `redaction_match`: The `MatchReport` audit trail and PII-safe debug logging.
//! * `engine`: The `SanitizationEngine` trait.
//! * `engines`: Concrete engine implementations.
//! * `headless`: Input decoding (strict UTF-8, fixed encodings, or detection) and one-shot helpers.
//!
//! ## Usage Example
//!
//! ```rust
//! use scrub_core::{RedactionConfig, RegexEngine, SanitizationEngine};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = RedactionConfig::load_default_rules()?;
//!     let engine = RegexEngine::new(&config)?;
//!
//!     let (output, report) = engine.sanitize("Contact: jane@example.com");
//!     assert_eq!(output, "Contact: [REDACTED:EMAIL]");
//!     assert_eq!(report.matches[0].original_string, "jane@example.com");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Rule construction and input decoding return [`ScrubError`]. Loading rule
//! files returns `anyhow::Error` with the file path attached as context.
//!
//! License: MIT OR Apache-2.0

pub mod config;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod headless;
pub mod policy;
pub mod redaction_match;
pub mod sanitizers;
pub mod validators;

/// Re-exports the public configuration types and functions for managing redaction rules.
pub use config::{merge_rules, RedactionConfig, RuleConfig, CUSTOM_LABEL, MAX_PATTERN_LENGTH};

/// Re-exports the custom error type for clear error reporting.
pub use errors::ScrubError;

pub use policy::{ReplacementPolicy, DEFAULT_MASK_CHAR};

pub use engine::SanitizationEngine;
pub use engines::regex_engine::{apply, RegexEngine};

pub use redaction_match::{redact_sensitive, MatchReport, RedactionMatch, RedactionSummaryItem};

pub use headless::{decode_input, decode_input_as, headless_scrub_bytes, InputEncoding};

pub use sanitizers::compiler::{compile_rule, compile_rules, CompiledRule, RuleSet};
