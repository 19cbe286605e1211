//! CLI commands and argument parsing

use crate::types::{Operation, Platform, Resource};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// WebinarJam / EverWebinar API client
#[derive(Parser, Debug)]
#[command(name = "webinarjam")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Extra routing table (YAML) merged over the built-in ones
    #[arg(short, long, global = true)]
    pub table: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Test the API key against a platform
    Check {
        /// Platform to test (webinarJam or everWebinar)
        #[arg(long, default_value = "webinarJam")]
        platform: Platform,
    },

    /// List available operations
    Operations,

    /// Show one operation's descriptor
    Describe {
        /// Resource (general, webinarJam, everWebinar)
        #[arg(long)]
        resource: Resource,

        /// Operation (e.g. getRegistrants)
        #[arg(long)]
        operation: Operation,
    },

    /// Validate the routing tables and report duplicate body keys
    Validate,

    /// Run an operation and print its records
    Run {
        /// Resource (general, webinarJam, everWebinar)
        #[arg(long)]
        resource: Resource,

        /// Operation (e.g. getRegistrants)
        #[arg(long)]
        operation: Operation,

        /// Inline parameters JSON (e.g. '{"webinarId": 1}')
        #[arg(long, conflicts_with = "params_file")]
        params: Option<String>,

        /// Parameters JSON file
        #[arg(long)]
        params_file: Option<PathBuf>,

        /// Fetch every page
        #[arg(long)]
        return_all: bool,

        /// Highest page number to fetch
        #[arg(long, default_value = "1")]
        limit: u32,

        /// Print the first request instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
