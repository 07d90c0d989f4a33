//! compiler.rs - Turns declarative rules into an ordered, compiled `RuleSet`.
//!
//! Every rule problem is detected here, before any text is processed: patterns
//! that fail to compile, exceed the length limit, or can match an empty string
//! are all rejected at construction time.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use regex::{Regex, RegexBuilder};

use crate::config::{RedactionConfig, RuleConfig, MAX_PATTERN_LENGTH};
use crate::errors::ScrubError;
use crate::policy::ReplacementPolicy;
use crate::validators::{validator_for, Validator};

/// Inputs used to detect patterns that can produce zero-length matches.
///
/// This is a heuristic: a pattern is rejected if it matches empty on any probe.
/// The non-ASCII probes cover empty branches reached only next to Unicode
/// word characters. The apply loop still skips any empty match it meets.
const EMPTY_MATCH_PROBES: [&str; 6] = ["", " ", "a", "Aa b_1-2.\n", "\u{e9} \u{fc}", "\u{65e5}\u{672c}\u{3002}"];

/// Represents a single compiled redaction rule.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    /// The unique name of the redaction rule.
    pub name: String,
    /// The compiled regular expression used for matching.
    pub regex: Regex,
    /// How matches of this rule are rewritten.
    pub policy: ReplacementPolicy,
    /// Post-match check; matches it rejects are left in place.
    pub validator: Option<Validator>,
}

impl CompiledRule {
    /// Compiles a bare pattern with default flags and no validator.
    pub fn new(name: impl Into<String>, pattern: &str, policy: ReplacementPolicy) -> Result<Self, ScrubError> {
        compile_rule(RuleConfig {
            name: name.into(),
            pattern: Some(pattern.to_string()),
            policy: Some(policy),
            ..Default::default()
        })
    }

    /// Runs the validator, if any.
    pub fn accepts(&self, matched: &str) -> bool {
        self.validator.map_or(true, |validate| validate(matched))
    }
}

/// An ordered collection of compiled rules. Position is precedence.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub rules: Vec<CompiledRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<CompiledRule>) -> Self {
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CompiledRule> {
        self.rules.iter()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a CompiledRule;
    type IntoIter = std::slice::Iter<'a, CompiledRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

fn can_match_empty(regex: &Regex) -> bool {
    EMPTY_MATCH_PROBES
        .iter()
        .any(|probe| regex.find_iter(probe).any(|m| m.is_empty()))
}

/// Compiles a single rule, validating it fully.
pub fn compile_rule(rule: RuleConfig) -> Result<CompiledRule, ScrubError> {
    if rule.name.is_empty() {
        return Err(ScrubError::InvalidRule(rule.name, "rule name is empty".to_string()));
    }

    let Some(pattern) = rule.pattern.as_deref() else {
        return Err(ScrubError::InvalidRule(rule.name, "missing `pattern`".to_string()));
    };

    debug!("Attempting to compile rule: '{}' with pattern '{:?}'", &rule.name, pattern);

    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(ScrubError::PatternLengthExceeded(rule.name, pattern.len(), MAX_PATTERN_LENGTH));
    }

    let regex = RegexBuilder::new(pattern)
        .case_insensitive(rule.case_insensitive)
        .multi_line(rule.multiline)
        .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
        .build()
        .map_err(|source| ScrubError::InvalidPattern { rule: rule.name.clone(), source })?;

    if can_match_empty(&regex) {
        return Err(ScrubError::EmptyMatch(rule.name));
    }

    let validator = if rule.programmatic_validation {
        let validator = validator_for(&rule.name).ok_or_else(|| {
            ScrubError::InvalidRule(
                rule.name.clone(),
                "`programmatic_validation` is set but no validator exists for this rule name".to_string(),
            )
        })?;
        Some(validator)
    } else {
        None
    };

    let policy = rule.effective_policy();
    log::debug!(
        target: "scrub_core::sanitizer",
        "Rule '{}' compiled successfully with policy {}.",
        &rule.name,
        policy
    );

    Ok(CompiledRule { name: rule.name, regex, policy, validator })
}

/// Compiles every rule of `config`, preserving order, and rejects duplicate names.
///
/// The first invalid rule aborts compilation; no partially built set is returned.
pub fn compile_rules(config: &RedactionConfig) -> Result<RuleSet, ScrubError> {
    debug!("Starting compilation of {} rules.", config.rules.len());

    let mut compiled: Vec<CompiledRule> = Vec::with_capacity(config.rules.len());
    for rule in &config.rules {
        if compiled.iter().any(|c| c.name == rule.name) {
            return Err(ScrubError::InvalidRule(rule.name.clone(), "duplicate rule name".to_string()));
        }
        compiled.push(compile_rule(rule.clone())?);
    }

    debug!("Finished compiling rules. Total compiled: {}.", compiled.len());
    Ok(RuleSet::new(compiled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = CompiledRule::new("broken", "(unclosed", ReplacementPolicy::tag("X")).unwrap_err();
        assert!(matches!(err, ScrubError::InvalidPattern { ref rule, .. } if rule == "broken"));
    }

    #[test]
    fn zero_length_patterns_are_rejected() {
        for pattern in ["", "a*", "^", r"\b", "(?m)$", "x?", r"[\x00-\x7F]+|\b"] {
            let err = CompiledRule::new("empty", pattern, ReplacementPolicy::tag("X")).unwrap_err();
            assert!(matches!(err, ScrubError::EmptyMatch(_)), "pattern {:?} was accepted", pattern);
        }
    }

    #[test]
    fn overlong_pattern_is_rejected() {
        let pattern = "a".repeat(MAX_PATTERN_LENGTH + 1);
        let err = CompiledRule::new("long", &pattern, ReplacementPolicy::tag("X")).unwrap_err();
        assert!(matches!(err, ScrubError::PatternLengthExceeded(_, _, MAX_PATTERN_LENGTH)));
    }

    #[test]
    fn validator_requires_known_rule_name() {
        let rule = RuleConfig {
            name: "zip".to_string(),
            pattern: Some(r"\d{5}".to_string()),
            programmatic_validation: true,
            ..Default::default()
        };
        assert!(matches!(compile_rule(rule), Err(ScrubError::InvalidRule(..))));
    }

    #[test]
    fn compile_preserves_order_and_rejects_duplicates() {
        let config = RedactionConfig {
            rules: vec![
                RuleConfig { name: "b".into(), pattern: Some("b".into()), ..Default::default() },
                RuleConfig { name: "a".into(), pattern: Some("a".into()), ..Default::default() },
            ],
        };
        let set = compile_rules(&config).unwrap();
        let names: Vec<&str> = set.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);

        let mut dup = config.clone();
        dup.rules.push(dup.rules[0].clone());
        assert!(matches!(compile_rules(&dup), Err(ScrubError::InvalidRule(..))));
    }

    #[test]
    fn case_insensitive_flag_is_honored() {
        let rule = RuleConfig {
            name: "secret".into(),
            pattern: Some("secret".into()),
            case_insensitive: true,
            ..Default::default()
        };
        assert!(compile_rule(rule).unwrap().regex.is_match("SECRET"));
    }
}
