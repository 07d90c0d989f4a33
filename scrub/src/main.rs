// scrub/src/main.rs
//! scrub entry point.
//!
//! Parses the command line, initializes logging, and runs a single redaction
//! pass. Any failure prints a message to stderr and exits with status 1.

use clap::Parser;
use log::info;

use scrub::cli::Cli;
use scrub::commands::scrub::{error_msg, run_scrub};
use scrub::logger;

fn main() {
    let cli = Cli::parse();
    logger::init_logger(cli.log_level());
    info!("scrub started. Version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_scrub(&cli) {
        error_msg(format!("{:#}", e));
        std::process::exit(1);
    }
}
