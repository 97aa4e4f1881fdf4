//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `compose-harvest`.
#[derive(Debug, Parser)]
#[command(name = "compose-harvest", version, about = "Extract compose apps into a catalog tree")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one full catalog sync against the source site.
    Sync {
        /// Source configuration as an inline JSON document
        /// (keys: `repo_url`, `channel`).
        #[arg(long)]
        source_config_json: String,
        /// Directory the catalog tree is written to.
        #[arg(long)]
        out_dir: PathBuf,
        /// File the detected build identifier is written to.
        #[arg(long)]
        commit_file: PathBuf,
    },
}
