// scrub-core/src/policy.rs
//! Replacement policies applied to matched spans.
//!
//! A policy is a closed set of variants so that every rule's replacement can be
//! matched exhaustively. Policies are part of the serde rule configuration and
//! are written in YAML as, for example:
//!
//! ```yaml
//! policy: { kind: tag, label: EMAIL }
//! policy: { kind: mask, character: '#', preserve_length: false }
//! policy: { kind: literal, text: "[X]" }
//! ```
//!
//! License: MIT OR APACHE 2.0

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Default filler used by [`ReplacementPolicy::Mask`].
pub const DEFAULT_MASK_CHAR: char = '*';

/// How a matched span is rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplacementPolicy {
    /// Substitute a fixed string verbatim.
    Literal { text: String },
    /// Replace the span with a repeated mask character.
    Mask {
        #[serde(default = "default_mask_char")]
        character: char,
        #[serde(default = "default_preserve_length")]
        preserve_length: bool,
    },
    /// Substitute a `[REDACTED:<label>]` placeholder.
    Tag { label: String },
}

fn default_mask_char() -> char {
    DEFAULT_MASK_CHAR
}

fn default_preserve_length() -> bool {
    true
}

impl ReplacementPolicy {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal { text: text.into() }
    }

    pub fn mask(character: char, preserve_length: bool) -> Self {
        Self::Mask { character, preserve_length }
    }

    pub fn tag(label: impl Into<String>) -> Self {
        Self::Tag { label: label.into() }
    }

    /// Produces the replacement for `matched`.
    ///
    /// Mask length is counted in chars, so a multi-byte match yields as many
    /// mask characters as it has visible scalar values.
    pub fn render<'a>(&'a self, matched: &str) -> Cow<'a, str> {
        match self {
            Self::Literal { text } => Cow::Borrowed(text.as_str()),
            Self::Mask { character, preserve_length: true } => {
                Cow::Owned(std::iter::repeat(*character).take(matched.chars().count()).collect())
            }
            Self::Mask { character, preserve_length: false } => Cow::Owned(character.to_string()),
            Self::Tag { label } => Cow::Owned(format_tag(label)),
        }
    }

    /// Short kind name, as used on the command line and in YAML.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Literal { .. } => "literal",
            Self::Mask { .. } => "mask",
            Self::Tag { .. } => "tag",
        }
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Literal { text } => write!(f, "literal({:?})", text),
            Self::Mask { character, preserve_length } => {
                write!(f, "mask({:?}, preserve_length={})", character, preserve_length)
            }
            Self::Tag { label } => write!(f, "tag({})", label),
        }
    }
}

/// Formats the placeholder used by the tag policy.
pub fn format_tag(label: &str) -> String {
    format!("[REDACTED:{}]", label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_is_verbatim() {
        let p = ReplacementPolicy::literal("[X]");
        assert_eq!(p.render("jane@example.com"), "[X]");
    }

    #[test]
    fn mask_preserves_char_length() {
        let p = ReplacementPolicy::mask('*', true);
        assert_eq!(p.render("555-123-4567"), "************");
        assert_eq!(p.render("żółw"), "****");
    }

    #[test]
    fn mask_collapses_without_preserve_length() {
        let p = ReplacementPolicy::mask('#', false);
        assert_eq!(p.render("555-123-4567"), "#");
    }

    #[test]
    fn tag_embeds_label() {
        assert_eq!(ReplacementPolicy::tag("EMAIL").render("a@b.io"), "[REDACTED:EMAIL]");
    }

    #[test]
    fn kind_names_match_yaml_tags() {
        assert_eq!(ReplacementPolicy::literal("").kind(), "literal");
        assert_eq!(ReplacementPolicy::mask('*', true).kind(), "mask");
        assert_eq!(ReplacementPolicy::tag("X").kind(), "tag");
    }

    #[test]
    fn yaml_mask_defaults() {
        let p: ReplacementPolicy = serde_yml::from_str("kind: mask").unwrap();
        assert_eq!(p, ReplacementPolicy::mask('*', true));
    }

    #[test]
    fn yaml_rejects_unknown_kind() {
        let parsed: Result<ReplacementPolicy, _> = serde_yml::from_str("kind: fake");
        assert!(parsed.is_err());
    }
}
