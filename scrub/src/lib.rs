// scrub/src/lib.rs
//! # scrub CLI
//!
//! Command-line glue around `scrub-core`: argument parsing, input and output
//! handling, logging, and human-readable reporting.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
pub mod utils;

pub use commands::scrub::{run_scrub, run_scrub_opts, ScrubOptions};
