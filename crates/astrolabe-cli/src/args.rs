//! Command-line argument definitions for the Astrolabe CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments choose between ad-hoc selection and view
//! composition, and control output, configuration and logging.

use clap::Parser;

use astrolabe::expand::IncludeFlag;

/// Command-line arguments for the Astrolabe model query tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input JSON document with `sources` and `views`
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Selection criteria as JSON, e.g. '{"el": "system"}'. Skips views.
    #[arg(short, long)]
    pub select: Option<String>,

    /// Expansion applied to the selection, in order (relations, related)
    #[arg(short, long)]
    pub include: Vec<IncludeFlag>,

    /// Compose only this view instead of every view in the document
    #[arg(long)]
    pub view: Option<String>,

    /// Path to the output JSON file, stdout when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
