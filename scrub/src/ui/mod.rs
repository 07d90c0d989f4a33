// scrub/src/ui/mod.rs
//! Terminal presentation: status messages and the redaction summary table.

pub mod output_format;
pub mod redaction_summary;
