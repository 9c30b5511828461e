//! Command-line interface for bplog.
//!
//! This module provides the CLI structure for the `bplog` binary. The
//! handlers live in the binary itself.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{
    AddCommand, ChartCommand, ConfigCommand, DeleteCommand, HistoryCommand, OutputFormat,
    StatusCommand,
};

/// bplog - Keep a personal blood-pressure log
///
/// Records readings with an optional pulse, note and photo of the monitor,
/// lists them by period and draws them as a chart.
#[derive(Debug, Parser)]
#[command(name = "bplog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a new reading
    Add(AddCommand),

    /// List readings, newest first
    History(HistoryCommand),

    /// Draw readings as an SVG chart
    Chart(ChartCommand),

    /// Delete a reading
    Delete(DeleteCommand),

    /// Show a summary of stored readings
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}
