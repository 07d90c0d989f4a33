// scrub/src/cli.rs
//! This file defines the command-line interface (CLI) for the scrub application.
//! License: MIT OR Apache-2.0

use anyhow::{bail, Result};
use clap::{ArgAction, Parser, ValueEnum};
use log::{warn, LevelFilter};
use std::path::PathBuf;

use scrub_core::{InputEncoding, ReplacementPolicy, CUSTOM_LABEL, DEFAULT_MASK_CHAR};

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "scrub",
    version = env!("CARGO_PKG_VERSION"),
    about = "Scrub personally identifiable information from text",
    long_about = "Scrub reads text from a file or stdin, replaces personally identifiable information (emails, phone numbers, dates, and any patterns you add) according to an ordered rule set, and writes the result to a file or stdout. Rules given with -p run first, followed by rules from --config and the built-in catalog."
)]
pub struct Cli {
    /// Input file, or `-` for stdin.
    #[arg(short = 'i', long = "input", value_name = "PATH|-", help = "Read input from PATH, or from stdin when PATH is '-' or omitted.")]
    pub input: Option<String>,

    /// Output file, or `-` for stdout.
    #[arg(short = 'o', long = "output", value_name = "PATH|-", help = "Write output to PATH, or to stdout when PATH is '-' or omitted.")]
    pub output: Option<String>,

    /// Additional regex patterns to redact.
    #[arg(short = 'p', long = "pattern", value_name = "REGEX", action = ArgAction::Append, help = "Add a custom regex rule (repeatable). Custom rules run before all others.")]
    pub patterns: Vec<String>,

    /// Replacement policy kind for custom patterns.
    #[arg(short = 'r', long = "replacement", value_enum, value_name = "KIND", help = "Replacement policy for custom rules: literal, mask, tag, or remove.")]
    pub replacement: Option<ReplacementKind>,

    /// Input text encoding.
    #[arg(long = "encoding", value_name = "LABEL", default_value = "utf-8", value_parser = parse_encoding, help = "Input encoding: 'utf-8' (strict), 'auto' (byte-order mark, then UTF-8, then windows-1252), or any WHATWG label such as 'latin1' or 'utf-16le'.")]
    pub encoding: InputEncoding,

    /// Literal replacement text.
    #[arg(short = 'c', long = "custom-replacement", value_name = "TEXT", help = "Replacement text for the literal policy; implies '-r literal' when -r is omitted.")]
    pub custom_replacement: Option<String>,

    #[arg(long = "mask-char", value_name = "CHAR", default_value_t = DEFAULT_MASK_CHAR, help = "Character used by the mask policy.")]
    pub mask_char: char,

    #[arg(long = "no-preserve-length", help = "With the mask policy, replace each match with a single mask character.")]
    pub no_preserve_length: bool,

    #[arg(long = "all-rules", help = "Apply the -r/-c policy to built-in and config rules as well.")]
    pub all_rules: bool,

    /// Path to a custom redaction configuration file (YAML).
    #[arg(long = "config", value_name = "FILE", env = "SCRUB_CONFIG", help = "Merge rules from a YAML file over the built-in catalog.")]
    pub config: Option<PathBuf>,

    #[arg(long = "no-defaults", help = "Do not load the built-in rule catalog.")]
    pub no_defaults: bool,

    /// Explicitly enable these rule names (comma-separated).
    #[arg(short = 'e', long = "enable", value_delimiter = ',', value_name = "RULES", help = "Enable these rules, including opt-in ones (comma-separated).")]
    pub enable: Vec<String>,

    /// Explicitly disable these rule names (comma-separated).
    #[arg(short = 'x', long = "disable", value_delimiter = ',', value_name = "RULES", help = "Disable these rules (comma-separated).")]
    pub disable: Vec<String>,

    #[arg(long = "dry-run", help = "Report what would be redacted without writing any redacted text.")]
    pub dry_run: bool,

    #[arg(long = "summary", help = "Print a per-rule redaction summary to stderr.")]
    pub summary: bool,

    #[arg(long = "json-report", value_name = "FILE|-", help = "Write the match report as JSON to FILE, or stdout for '-'.")]
    pub json_report: Option<String>,

    #[arg(long = "reveal", help = "Include original matched values in reports instead of hashes.")]
    pub reveal: bool,

    /// Disable informational messages
    #[arg(long, short = 'q', conflicts_with = "debug", help = "Suppress all log output.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', help = "Enable debug logging.")]
    pub debug: bool,
}

/// Policy kinds selectable with `-r`.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ReplacementKind {
    /// Replace with the text given by -c.
    Literal,
    /// Replace with the mask character.
    Mask,
    /// Replace with a [REDACTED:CUSTOM] placeholder.
    Tag,
    /// Delete the match.
    Remove,
}

fn parse_encoding(label: &str) -> Result<InputEncoding, String> {
    InputEncoding::from_label(label).map_err(|e| e.to_string())
}

impl Cli {
    /// Log level implied by `-q`/`-d`; `None` defers to `RUST_LOG`.
    pub fn log_level(&self) -> Option<LevelFilter> {
        if self.quiet {
            Some(LevelFilter::Off)
        } else if self.debug {
            Some(LevelFilter::Debug)
        } else {
            None
        }
    }

    /// Resolves `-r`, `-c`, `--mask-char` and `--no-preserve-length` into one policy.
    ///
    /// The same policy applies to every `-p` pattern.
    pub fn custom_policy(&self) -> Result<ReplacementPolicy> {
        let kind = match (self.replacement, &self.custom_replacement) {
            (Some(kind), _) => kind,
            (None, Some(_)) => ReplacementKind::Literal,
            (None, None) => ReplacementKind::Tag,
        };

        if kind != ReplacementKind::Literal && self.custom_replacement.is_some() {
            warn!("-c/--custom-replacement is ignored unless the literal policy is selected.");
        }

        Ok(match kind {
            ReplacementKind::Literal => match &self.custom_replacement {
                Some(text) => ReplacementPolicy::literal(text.clone()),
                None => bail!("The literal policy requires replacement text: pass -c/--custom-replacement."),
            },
            ReplacementKind::Mask => ReplacementPolicy::mask(self.mask_char, !self.no_preserve_length),
            ReplacementKind::Tag => ReplacementPolicy::tag(CUSTOM_LABEL),
            ReplacementKind::Remove => ReplacementPolicy::literal(""),
        })
    }

    /// Whether `-r`/`-c` were given at all.
    pub fn has_policy_override(&self) -> bool {
        self.replacement.is_some() || self.custom_replacement.is_some()
    }
}
