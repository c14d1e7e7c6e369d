//! CLI argument definitions for the cyclemerge binary.

use std::path::PathBuf;

use clap::Parser;

/// Deep-merge JSON documents into one
#[derive(Parser, Debug)]
#[command(name = "cyclemerge")]
#[command(about = "Deeply merge JSON documents, later documents winning")]
#[command(version)]
pub struct Cli {
    /// JSON files to merge, in order. Reads a single document from stdin
    /// when no files are given.
    pub files: Vec<PathBuf>,

    /// Pretty-print the merged output
    #[arg(short, long, env = "CYCLEMERGE_PRETTY")]
    pub pretty: bool,
}
