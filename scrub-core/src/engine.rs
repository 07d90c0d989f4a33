// scrub-core/src/engine.rs
//! Defines the core SanitizationEngine trait.
//!
//! The trait decouples callers (the CLI, the headless helper) from the way
//! matches are found and replaced.
//!
//! License: MIT OR APACHE 2.0

use crate::redaction_match::MatchReport;
use crate::sanitizers::compiler::RuleSet;

/// A trait that defines the core functionality of a sanitization engine.
///
/// Implementations hold only immutable, compiled rules, so a single engine can
/// be shared and reused across any number of calls.
pub trait SanitizationEngine: Send + Sync {
    /// Performs full sanitization on the provided content.
    ///
    /// Returns the redacted text together with a report of every substitution,
    /// in the order the substitutions were made.
    fn sanitize(&self, content: &str) -> (String, MatchReport);

    /// Reports what `sanitize` would redact without handing back any text.
    ///
    /// Because later rules see the output of earlier ones, the report can only
    /// be produced by running the full pass.
    fn scan(&self, content: &str) -> MatchReport {
        self.sanitize(content).1
    }

    /// Returns the compiled rules, in application order.
    fn rules(&self) -> &RuleSet;
}
