//! CLI module for josephus - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for headless playback and
//! instant summaries; without a subcommand the TUI is launched.

pub mod commands;

pub use commands::{Cli, Commands, ParamArgs};
