// scrub-core/src/redaction_match.rs
//! Provides core data structures for reporting redaction matches, and the
//! debug-logging helpers that keep PII out of logs unless explicitly allowed.

use log::debug;
use serde::{Deserialize, Serialize};

use lazy_static::lazy_static;
use sha2::{Digest, Sha256};

lazy_static! {
    /// A static boolean that is initialized once to determine if PII is allowed in debug logs.
    static ref PII_DEBUG_ALLOWED: bool = {
        std::env::var("SCRUB_ALLOW_DEBUG_PII")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// A single substitution performed during an apply pass.
///
/// `start` and `end` are byte offsets into the text as the rule saw it, which
/// already includes the substitutions of every earlier rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionMatch {
    pub rule_index: usize,
    pub rule_name: String,
    pub start: usize,
    pub end: usize,
    pub original_string: String,
    pub sanitized_string: String,
}

impl RedactionMatch {
    /// Stable digest of the rule and the normalized original value.
    pub fn sample_hash(&self) -> String {
        canonical_sample_hash(&self.rule_name, &self.original_string)
    }
}

/// Audit trail of one apply pass, in the order substitutions were made:
/// by rule, then by position within that rule's pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    pub matches: Vec<RedactionMatch>,
}

/// Represents a single item in the redaction summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactionSummaryItem {
    pub rule_name: String,
    pub occurrences: usize,
    pub original_texts: Vec<String>,
}

/// One line of the exported JSON report.
#[derive(Debug, Serialize)]
struct ReportEntry<'a> {
    rule_index: usize,
    rule_name: &'a str,
    start: usize,
    end: usize,
    replacement: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    original: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sample_hash: Option<String>,
}

impl MatchReport {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn push(&mut self, m: RedactionMatch) {
        self.matches.push(m);
    }

    pub fn iter(&self) -> impl Iterator<Item = &RedactionMatch> {
        self.matches.iter()
    }

    /// Groups matches per rule, keeping rule order.
    pub fn summary(&self) -> Vec<RedactionSummaryItem> {
        let mut summary: Vec<(usize, RedactionSummaryItem)> = Vec::new();
        for m in &self.matches {
            match summary.iter_mut().find(|(idx, _)| *idx == m.rule_index) {
                Some((_, item)) => {
                    item.occurrences += 1;
                    item.original_texts.push(m.original_string.clone());
                }
                None => summary.push((
                    m.rule_index,
                    RedactionSummaryItem {
                        rule_name: m.rule_name.clone(),
                        occurrences: 1,
                        original_texts: vec![m.original_string.clone()],
                    },
                )),
            }
        }
        summary.sort_by_key(|(idx, _)| *idx);
        summary.into_iter().map(|(_, item)| item).collect()
    }

    /// Serializes the report as pretty JSON.
    ///
    /// Original values are only included when `reveal` is set; otherwise each
    /// entry carries its sample hash instead.
    pub fn to_json(&self, reveal: bool) -> serde_json::Result<String> {
        let entries: Vec<ReportEntry<'_>> = self
            .matches
            .iter()
            .map(|m| ReportEntry {
                rule_index: m.rule_index,
                rule_name: &m.rule_name,
                start: m.start,
                end: m.end,
                replacement: &m.sanitized_string,
                original: reveal.then_some(m.original_string.as_str()),
                sample_hash: (!reveal).then(|| m.sample_hash()),
            })
            .collect();
        serde_json::to_string_pretty(&entries)
    }
}

pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.len() <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", s.len())
    }
}

fn get_loggable_content(sensitive_content: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        redact_sensitive(sensitive_content)
    }
}

pub fn log_redaction_action_debug(
    module_path: &str,
    rule_name: &str,
    original_sensitive_content: &str,
    sanitized_replacement: &str,
) {
    debug!(
        "{} Redaction action: Original='{}', Redacted='{}' for rule '{}'",
        module_path,
        get_loggable_content(original_sensitive_content),
        sanitized_replacement,
        rule_name
    );
}

pub fn log_rejected_match_debug(module_path: &str, rule_name: &str, original_sensitive_content: &str) {
    debug!(
        "{} Validator rejected match for rule '{}': '{}'",
        module_path,
        rule_name,
        get_loggable_content(original_sensitive_content)
    );
}

pub fn canonical_sample_hash(rule_id: &str, snippet: &str) -> String {
    let normalized = snippet
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let mut hasher = Sha256::new();
    hasher.update(rule_id.as_bytes());
    hasher.update(b":");
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}
