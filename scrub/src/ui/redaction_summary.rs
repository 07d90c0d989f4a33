// scrub/src/ui/redaction_summary.rs
//! Per-rule summary table printed after a run.

use comfy_table::{presets::UTF8_FULL, Table};
use owo_colors::OwoColorize;
use std::collections::BTreeSet;
use std::io::{self, Write};

use scrub_core::{redact_sensitive, RedactionSummaryItem};

const SUMMARY_HEADER: &str = "--- Redaction Summary ---";

/// Prints one row per rule that matched. Original values are masked with
/// `redact_sensitive` unless `reveal` is set.
pub fn print_summary<W: Write>(
    summary: &[RedactionSummaryItem],
    writer: &mut W,
    supports_color: bool,
    reveal: bool,
) -> io::Result<()> {
    if supports_color {
        writeln!(writer, "{}", SUMMARY_HEADER.bold())?;
    } else {
        writeln!(writer, "{}", SUMMARY_HEADER)?;
    }

    if summary.is_empty() {
        return writeln!(writer, "No sensitive data found.");
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Rule", "Occurrences", "Values"]);

    for item in summary {
        let values: BTreeSet<String> = item
            .original_texts
            .iter()
            .map(|text| if reveal { text.clone() } else { redact_sensitive(text) })
            .collect();
        table.add_row(vec![
            item.rule_name.clone(),
            item.occurrences.to_string(),
            values.into_iter().collect::<Vec<_>>().join(", "),
        ]);
    }

    writeln!(writer, "{table}")?;
    let total: usize = summary.iter().map(|item| item.occurrences).sum();
    writeln!(writer, "Total: {} redactions across {} rules.", total, summary.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> RedactionSummaryItem {
        RedactionSummaryItem {
            rule_name: "email".to_string(),
            occurrences: 2,
            original_texts: vec!["jane@example.com".to_string(), "jane@example.com".to_string()],
        }
    }

    #[test]
    fn hides_values_by_default() {
        let mut buf = Vec::new();
        print_summary(&[item()], &mut buf, false, false).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains(SUMMARY_HEADER));
        assert!(out.contains("email"));
        assert!(out.contains("[REDACTED: 16 chars]"));
        assert!(!out.contains("jane@example.com"));
        assert!(out.contains("Total: 2 redactions across 1 rules."));
    }

    #[test]
    fn reveal_shows_unique_values() {
        let mut buf = Vec::new();
        print_summary(&[item()], &mut buf, false, true).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out.matches("jane@example.com").count(), 1);
    }

    #[test]
    fn empty_summary() {
        let mut buf = Vec::new();
        print_summary(&[], &mut buf, false, false).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("No sensitive data found."));
    }
}
