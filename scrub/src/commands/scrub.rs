// scrub/src/commands/scrub.rs
//! The scrub command: build the rule set, read the input, redact, and emit
//! the output and reports.

use anyhow::{bail, Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info, warn};
use std::io;

use scrub_core::{
    decode_input_as, merge_rules, InputEncoding, MatchReport, RedactionConfig, RegexEngine,
    RuleConfig, SanitizationEngine,
};

use crate::cli::Cli;
use crate::ui::{output_format, redaction_summary};
use crate::utils::io::{commit_all, InputSource, OutputSink};

/// Options for the `run_scrub_opts` runner, resolved from the command line.
#[derive(Debug)]
pub struct ScrubOptions {
    pub source: InputSource,
    pub encoding: InputEncoding,
    pub sink: OutputSink,
    pub dry_run: bool,
    pub summary: bool,
    pub json_report: Option<OutputSink>,
    pub reveal: bool,
    pub quiet: bool,
}

impl ScrubOptions {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let sink = OutputSink::from_arg(cli.output.as_deref());
        let json_report = cli.json_report.as_deref().map(|arg| OutputSink::from_arg(Some(arg)));

        if !cli.dry_run && sink == OutputSink::Stdout && json_report == Some(OutputSink::Stdout) {
            bail!("--json-report - would share stdout with the redacted text; use -o <PATH> or --dry-run.");
        }

        Ok(Self {
            source: InputSource::from_arg(cli.input.as_deref()),
            encoding: cli.encoding,
            sink,
            dry_run: cli.dry_run,
            summary: cli.summary,
            json_report,
            reveal: cli.reveal,
            quiet: cli.quiet,
        })
    }
}

/// Helper for printing info messages to stderr.
pub fn info_msg(msg: impl AsRef<str>) {
    let supports_color = io::stderr().is_terminal();
    let _ = output_format::print_info_message(&mut io::stderr(), msg.as_ref(), supports_color);
}

/// Helper for printing warning messages to stderr.
pub fn warn_msg(msg: impl AsRef<str>) {
    let supports_color = io::stderr().is_terminal();
    let _ = output_format::print_warn_message(&mut io::stderr(), msg.as_ref(), supports_color);
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>) {
    let supports_color = io::stderr().is_terminal();
    let _ = output_format::print_error_message(&mut io::stderr(), msg.as_ref(), supports_color);
}

/// Assembles the rule configuration in application order:
/// `-p` patterns, then the catalog merged with `--config`, filtered by `-e`/`-x`.
pub fn build_config(cli: &Cli) -> Result<RedactionConfig> {
    let policy = cli.custom_policy()?;

    let defaults = if cli.no_defaults {
        debug!("Built-in rules disabled with --no-defaults.");
        RedactionConfig::default()
    } else {
        RedactionConfig::load_default_rules()?
    };

    let user_config = cli
        .config
        .as_ref()
        .map(RedactionConfig::load_from_file)
        .transpose()?;

    let catalog = merge_rules(defaults, user_config);

    let mut rules: Vec<RuleConfig> = cli
        .patterns
        .iter()
        .enumerate()
        .map(|(index, pattern)| RuleConfig::custom(index, pattern.as_str(), policy.clone()))
        .collect();
    rules.extend(catalog.rules);

    let mut config = RedactionConfig { rules };
    config.set_active_rules(&cli.enable, &cli.disable);

    if cli.all_rules {
        if cli.has_policy_override() {
            config.override_policies(&policy);
        } else {
            warn!("--all-rules has no effect without -r or -c.");
        }
    }

    if config.rules.is_empty() {
        warn!("No rules are active; input will be passed through unchanged.");
    }
    let active: Vec<String> = config
        .rules
        .iter()
        .map(|rule| format!("{} ({})", rule.name, rule.effective_policy().kind()))
        .collect();
    info!("Active rules: {}", active.join(", "));
    Ok(config)
}

/// Entry point used by `main`.
pub fn run_scrub(cli: &Cli) -> Result<()> {
    let opts = ScrubOptions::from_cli(cli)?;
    let config = build_config(cli)?;
    // Compile before reading input so bad patterns fail fast.
    let engine = RegexEngine::new(&config).context("Failed to build the rule set")?;
    run_scrub_opts(&engine, opts)
}

/// Reads, redacts and writes. Nothing is published unless every output of
/// the run was prepared successfully.
pub fn run_scrub_opts(engine: &dyn SanitizationEngine, opts: ScrubOptions) -> Result<()> {
    info!("Starting scrub operation with {} rules.", engine.rules().len());

    let bytes = opts.source.read()?;
    let text = decode_input_as(bytes, &opts.source.id(), opts.encoding)?;

    let (redacted, report) = engine.sanitize(&text);
    debug!(
        "Content redacted. Original length: {}, redacted length: {}",
        text.len(),
        redacted.len()
    );

    let mut staged = Vec::new();
    if opts.dry_run {
        info!("Dry run: redacted text is not written.");
    } else {
        staged.push(opts.sink.stage(redacted)?);
    }

    if let Some(sink) = &opts.json_report {
        let json = report.to_json(opts.reveal).context("Failed to serialize match report")?;
        staged.push(sink.stage(format!("{}\n", json)).context("Failed to write JSON report")?);
    }

    commit_all(staged)?;
    handle_reports(&report, &opts)?;

    info!("Scrub operation completed.");
    Ok(())
}

fn handle_reports(report: &MatchReport, opts: &ScrubOptions) -> Result<()> {
    let show_summary = opts.summary || (opts.dry_run && opts.json_report.is_none());
    if show_summary && !opts.quiet {
        let supports_color = io::stderr().is_terminal();
        redaction_summary::print_summary(&report.summary(), &mut io::stderr(), supports_color, opts.reveal)
            .context("Failed to print redaction summary")?;
    }

    if opts.reveal && opts.json_report.is_none() && !show_summary {
        warn_msg("--reveal has no effect without --summary, --dry-run or --json-report.");
    }
    if let OutputSink::File(path) = &opts.sink {
        if !opts.dry_run && !opts.quiet {
            info_msg(format!("Wrote {} redactions to {}", report.len(), path.display()));
        }
    }
    Ok(())
}
