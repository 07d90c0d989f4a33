//! Configuration management for `scrub-core`.
//!
//! This module defines the declarative form of redaction rules. It handles
//! deserialization of YAML rule files, the embedded default catalog, and
//! utilities for merging and filtering rule lists. Order is preserved
//! everywhere because rule order is application precedence.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::policy::ReplacementPolicy;

/// Maximum allowed length for a regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Label used for tag placeholders of rules supplied on the command line.
pub const CUSTOM_LABEL: &str = "CUSTOM";

/// Represents a single declarative redaction rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RuleConfig {
    /// Unique identifier for the rule (e.g., "email").
    pub name: String,
    /// Human-readable description of what the rule targets.
    pub description: Option<String>,
    /// The regex pattern string.
    pub pattern: Option<String>,
    /// How matches are rewritten. Defaults to a tag named after the rule.
    pub policy: Option<ReplacementPolicy>,
    /// Compile the pattern case-insensitively.
    pub case_insensitive: bool,
    /// If true, `^` and `$` match at line boundaries.
    pub multiline: bool,
    /// If true, the rule is disabled unless explicitly enabled.
    pub opt_in: bool,
    /// If true, matches must also pass the validator registered for this rule name.
    pub programmatic_validation: bool,
    /// Explicit override for enabling/disabling the rule.
    pub enabled: Option<bool>,
}

impl RuleConfig {
    /// Builds the rule for the `index`-th (0-based) pattern given on the command line.
    pub fn custom(index: usize, pattern: impl Into<String>, policy: ReplacementPolicy) -> Self {
        Self {
            name: format!("custom_{}", index + 1),
            description: Some("Pattern supplied on the command line".to_string()),
            pattern: Some(pattern.into()),
            policy: Some(policy),
            ..Default::default()
        }
    }

    /// The policy in force: the configured one, or `Tag(NAME)`.
    pub fn effective_policy(&self) -> ReplacementPolicy {
        self.policy
            .clone()
            .unwrap_or_else(|| ReplacementPolicy::tag(self.name.to_uppercase()))
    }
}

/// Represents the top-level rule file structure.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct RedactionConfig {
    /// Rules in application order.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

impl RedactionConfig {
    /// Loads redaction rules from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading custom rules from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: RedactionConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_rules(&config.rules)
            .with_context(|| format!("Invalid rules in {}", path.display()))?;
        info!("Loaded {} rules from file {}.", config.rules.len(), path.display());

        Ok(config)
    }

    /// Loads the built-in rule catalog embedded in the binary.
    pub fn load_default_rules() -> Result<Self> {
        debug!("Loading default rules from embedded string...");
        let default_yaml = include_str!("../config/default_rules.yaml");
        let config: RedactionConfig = serde_yml::from_str(default_yaml)
            .context("Failed to parse default rules")?;

        debug!("Loaded {} default rules.", config.rules.len());
        Ok(config)
    }

    /// Filters active rules based on enable/disable lists.
    ///
    /// A rule survives when it is not disabled, is not switched off with
    /// `enabled: false`, and is either not opt-in or explicitly enabled.
    pub fn set_active_rules(&mut self, enable_rules: &[String], disable_rules: &[String]) {
        let enable_set: HashSet<&str> = enable_rules.iter().map(String::as_str).collect();
        let disable_set: HashSet<&str> = disable_rules.iter().map(String::as_str).collect();

        debug!("Initial rules count before filtering: {}", self.rules.len());

        let all_rule_names: HashSet<&str> = self.rules.iter().map(|r| r.name.as_str()).collect();

        for rule_name in enable_set.difference(&all_rule_names) {
            warn!("Rule '{}' in `enable` list does not exist.", rule_name);
        }

        for rule_name in disable_set.difference(&all_rule_names) {
            warn!("Rule '{}' in `disable` list does not exist.", rule_name);
        }

        self.rules.retain(|rule| {
            let name = rule.name.as_str();
            if disable_set.contains(name) {
                return false;
            }
            if enable_set.contains(name) {
                return true;
            }
            rule.enabled.unwrap_or(!rule.opt_in)
        });

        debug!("Final active rules count after filtering: {}", self.rules.len());
    }

    /// Replaces every rule's policy.
    pub fn override_policies(&mut self, policy: &ReplacementPolicy) {
        for rule in &mut self.rules {
            rule.policy = Some(policy.clone());
        }
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }
}

/// Merges user-defined rules over the defaults.
///
/// A user rule with the same name as a default replaces it in place; other
/// user rules are appended in file order.
pub fn merge_rules(default_config: RedactionConfig, user_config: Option<RedactionConfig>) -> RedactionConfig {
    debug!("merge_rules called. Initial default rules count: {}", default_config.rules.len());

    let mut final_rules = default_config.rules;

    if let Some(user_cfg) = user_config {
        debug!("User config provided. Merging {} user rules.", user_cfg.rules.len());
        for user_rule in user_cfg.rules {
            match final_rules.iter_mut().find(|r| r.name == user_rule.name) {
                Some(existing) => {
                    debug!("User rule '{}' overrides the default.", user_rule.name);
                    *existing = user_rule;
                }
                None => final_rules.push(user_rule),
            }
        }
    }

    debug!("Final total rules after merge: {}", final_rules.len());
    RedactionConfig { rules: final_rules }
}

/// Validates rule integrity (names and pattern compilation) and reports all problems at once.
fn validate_rules(rules: &[RuleConfig]) -> Result<()> {
    let mut rule_names = HashSet::new();
    let mut errors = Vec::new();

    for rule in rules {
        if rule.name.is_empty() {
            errors.push("A rule has an empty `name` field.".to_string());
        } else if !rule_names.insert(rule.name.as_str()) {
            errors.push(format!("Duplicate rule name found: '{}'.", rule.name));
        }

        let Some(pattern) = &rule.pattern else {
            errors.push(format!("Rule '{}' is missing the `pattern` field.", rule.name));
            continue;
        };

        if pattern.is_empty() {
            errors.push(format!("Rule '{}' has an empty `pattern` field.", rule.name));
            continue;
        }

        if let Err(e) = Regex::new(pattern) {
            errors.push(format!("Rule '{}' has an invalid regex pattern: {}", rule.name, e));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(anyhow!("Rule validation failed:\n{}", errors.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str, pattern: &str) -> RuleConfig {
        RuleConfig {
            name: name.to_string(),
            pattern: Some(pattern.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn effective_policy_defaults_to_uppercase_tag() {
        assert_eq!(rule("ip_address", r"\d+").effective_policy(), ReplacementPolicy::tag("IP_ADDRESS"));
    }

    #[test]
    fn custom_rules_are_numbered_from_one() {
        let r = RuleConfig::custom(0, "secret", ReplacementPolicy::literal(""));
        assert_eq!(r.name, "custom_1");
        assert_eq!(r.effective_policy(), ReplacementPolicy::literal(""));
    }

    #[test]
    fn validate_collects_every_problem() {
        let rules = vec![rule("a", "("), rule("a", "ok"), rule("", "x")];
        let err = validate_rules(&rules).unwrap_err().to_string();
        assert!(err.contains("invalid regex"));
        assert!(err.contains("Duplicate rule name"));
        assert!(err.contains("empty `name`"));
    }

    #[test]
    fn enabled_false_drops_rule_unless_enabled_by_name() {
        let mut off = rule("off", "x");
        off.enabled = Some(false);
        let mut config = RedactionConfig { rules: vec![off.clone(), rule("on", "y")] };
        config.set_active_rules(&[], &[]);
        assert_eq!(config.rule_names(), vec!["on"]);

        let mut config = RedactionConfig { rules: vec![off] };
        config.set_active_rules(&["off".to_string()], &[]);
        assert_eq!(config.rule_names(), vec!["off"]);
    }
}
