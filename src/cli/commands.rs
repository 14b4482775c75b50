//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - (none): interactive terminal animation
//! - play: headless paced playback
//! - order: instant elimination order and summary

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Josephus - animated counting-out elimination
#[derive(Parser, Debug)]
#[command(name = "josephus")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Participant count and step size; unset values fall back to the config.
#[derive(Args, Debug, Clone, Default)]
pub struct ParamArgs {
    /// Number of participants in the circle
    #[arg(short = 'n', long, value_parser = positive)]
    pub participants: Option<usize>,

    /// Eliminate every k-th participant counted
    #[arg(short = 'k', long, value_parser = positive)]
    pub step: Option<usize>,
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play the elimination one event per tick on stdout
    Play {
        #[command(flatten)]
        params: ParamArgs,

        /// Tick interval in milliseconds (defaults to the configured cadence)
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: Option<u64>,

        /// Emit JSON lines instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the elimination order without animation
    Order {
        #[command(flatten)]
        params: ParamArgs,

        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn positive(value: &str) -> Result<usize, String> {
    let parsed: usize = value.parse().map_err(|_| format!("`{}` is not a whole number", value))?;
    if parsed == 0 {
        return Err("value must be at least 1".to_string());
    }
    Ok(parsed)
}
