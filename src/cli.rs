//! Command-line interface for newsbrief.

use std::path::PathBuf;

use clap::Parser;

/// Run the news digest pipeline once: extract, summarize, render, deliver.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "newsbrief.toml")]
    pub config: PathBuf,

    /// Process sources one at a time instead of using the worker pool
    #[arg(long)]
    pub sequential: bool,

    /// Override the configured worker-pool width
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Abort in-flight work after this many seconds; completed items are kept
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Print the rendered digest to stdout instead of delivering it
    #[arg(long)]
    pub no_deliver: bool,
}
