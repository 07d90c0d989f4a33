// scrub-core/src/engines/regex_engine.rs
//! A `SanitizationEngine` implementation that uses regular expressions
//! to identify and redact sensitive data.
//!
//! Rules run one after another. Each rule scans the text produced by the rules
//! before it, replaces its non-overlapping matches left to right, and records
//! one report entry per replacement.
//!
//! License: MIT OR APACHE 2.0

use log::debug;

use crate::config::RedactionConfig;
use crate::engine::SanitizationEngine;
use crate::errors::ScrubError;
use crate::redaction_match::{
    log_redaction_action_debug, log_rejected_match_debug, MatchReport, RedactionMatch,
};
use crate::sanitizers::compiler::{compile_rules, CompiledRule, RuleSet};

/// Applies `rules` to `text` in order.
///
/// An empty rule set returns `text` unchanged with an empty report.
pub fn apply(text: &str, rules: &RuleSet) -> (String, MatchReport) {
    let mut report = MatchReport::default();
    let mut current = text.to_string();

    for (rule_index, rule) in rules.iter().enumerate() {
        if let Some(next) = apply_rule(rule_index, rule, &current, &mut report) {
            current = next;
        }
    }

    debug!(
        "Apply pass finished: {} rules, {} substitutions.",
        rules.len(),
        report.len()
    );
    (current, report)
}

/// Runs one rule over `input`. Returns `None` when nothing was replaced.
fn apply_rule(
    rule_index: usize,
    rule: &CompiledRule,
    input: &str,
    report: &mut MatchReport,
) -> Option<String> {
    let mut output = String::with_capacity(input.len());
    let mut last_end = 0usize;
    let mut replaced = false;

    for m in rule.regex.find_iter(input) {
        if m.is_empty() {
            continue;
        }
        if !rule.accepts(m.as_str()) {
            log_rejected_match_debug(module_path!(), &rule.name, m.as_str());
            continue;
        }

        let replacement = rule.policy.render(m.as_str());
        log_redaction_action_debug(module_path!(), &rule.name, m.as_str(), &replacement);

        output.push_str(&input[last_end..m.start()]);
        output.push_str(&replacement);
        last_end = m.end();
        replaced = true;

        report.push(RedactionMatch {
            rule_index,
            rule_name: rule.name.clone(),
            start: m.start(),
            end: m.end(),
            original_string: m.as_str().to_string(),
            sanitized_string: replacement.into_owned(),
        });
    }

    if !replaced {
        return None;
    }
    output.push_str(&input[last_end..]);
    Some(output)
}

#[derive(Debug, Clone, Default)]
pub struct RegexEngine {
    rules: RuleSet,
}

impl RegexEngine {
    /// Compiles `config` into an engine. Any invalid rule fails the whole call.
    pub fn new(config: &RedactionConfig) -> Result<Self, ScrubError> {
        Ok(Self { rules: compile_rules(config)? })
    }

    pub fn from_rules(rules: RuleSet) -> Self {
        Self { rules }
    }
}

impl SanitizationEngine for RegexEngine {
    fn sanitize(&self, content: &str) -> (String, MatchReport) {
        apply(content, &self.rules)
    }

    fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::ReplacementPolicy;

    fn rule(name: &str, pattern: &str, policy: ReplacementPolicy) -> CompiledRule {
        CompiledRule::new(name, pattern, policy).unwrap()
    }

    #[test]
    fn empty_rule_set_is_identity() {
        let (out, report) = apply("anything at all", &RuleSet::default());
        assert_eq!(out, "anything at all");
        assert!(report.is_empty());
    }

    #[test]
    fn non_overlapping_left_to_right() {
        let rules = RuleSet::new(vec![rule("aa", "aa", ReplacementPolicy::literal("X"))]);
        let (out, report) = apply("aaaaa", &rules);
        assert_eq!(out, "XXa");
        let starts: Vec<usize> = report.iter().map(|m| m.start).collect();
        assert_eq!(starts, vec![0, 2]);
    }

    #[test]
    fn later_rules_see_earlier_output() {
        let rules = RuleSet::new(vec![
            rule("first", "secret", ReplacementPolicy::literal("token-123")),
            rule("second", r"\d+", ReplacementPolicy::mask('#', false)),
        ]);
        let (out, report) = apply("my secret", &rules);
        assert_eq!(out, "my token-#");
        assert_eq!(report.matches[1].rule_index, 1);
        assert_eq!(report.matches[1].original_string, "123");
        assert_eq!((report.matches[1].start, report.matches[1].end), (9, 12));
    }

    #[test]
    fn offsets_refer_to_text_seen_by_the_rule() {
        let rules = RuleSet::new(vec![
            rule("shrink", "long-value", ReplacementPolicy::literal("v")),
            rule("digits", r"\d+", ReplacementPolicy::tag("N")),
        ]);
        let (out, report) = apply("long-value 42", &rules);
        assert_eq!(out, "v [REDACTED:N]");
        assert_eq!((report.matches[1].start, report.matches[1].end), (2, 4));
    }

    #[test]
    fn validator_rejections_are_left_in_place() {
        let date = CompiledRule {
            validator: Some(crate::validators::is_valid_date_programmatically),
            ..rule("date", r"\d{2}/\d{2}/\d{4}", ReplacementPolicy::tag("DATE"))
        };
        let (out, report) = apply("99/99/2024 and 01/02/2024", &RuleSet::new(vec![date]));
        assert_eq!(out, "99/99/2024 and [REDACTED:DATE]");
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn engine_scan_matches_sanitize_report() {
        let engine = RegexEngine::from_rules(RuleSet::new(vec![rule(
            "word",
            "foo",
            ReplacementPolicy::tag("FOO"),
        )]));
        let (_, report) = engine.sanitize("foo bar foo");
        assert_eq!(engine.scan("foo bar foo"), report);
        assert_eq!(engine.rules().len(), 1);
    }
}
