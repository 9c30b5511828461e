//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::period::Period;
use crate::reading::ReadingId;

/// Add command arguments.
///
/// Values are taken as text and checked by the entry form, so bad input is
/// reported the same way however it arrives.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Systolic pressure (mmHg)
    #[arg(short, long)]
    pub systolic: String,

    /// Diastolic pressure (mmHg)
    #[arg(short, long)]
    pub diastolic: String,

    /// Pulse (beats per minute)
    #[arg(short, long)]
    pub pulse: Option<String>,

    /// Measurement time as YYYY-MM-DDTHH:MM (defaults to now)
    #[arg(long, value_name = "DATETIME")]
    pub at: Option<String>,

    /// Free-text note
    #[arg(short, long)]
    pub note: Option<String>,

    /// Attach a photo of the monitor from an image file
    #[arg(long, value_name = "FILE")]
    pub photo: Option<PathBuf>,
}

/// History command arguments.
#[derive(Debug, Args)]
pub struct HistoryCommand {
    /// Only show the last N days (all, 7, 30 or 90)
    #[arg(short, long)]
    pub period: Option<Period>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Chart command arguments.
#[derive(Debug, Args)]
pub struct ChartCommand {
    /// Only chart the last N days (all, 7, 30 or 90)
    #[arg(short, long)]
    pub period: Option<Period>,

    /// Write the SVG here instead of standard output
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Chart width in CSS pixels
    #[arg(long)]
    pub width: Option<f64>,

    /// Chart height in CSS pixels
    #[arg(long)]
    pub height: Option<f64>,

    /// Device pixels per CSS pixel
    #[arg(long)]
    pub pixel_ratio: Option<f64>,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Id of the reading to delete
    pub id: ReadingId,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_status_command_debug() {
        let cmd = StatusCommand { json: true };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("json"));
    }

    #[test]
    fn test_delete_command_debug() {
        let cmd = DeleteCommand { id: 42, yes: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("42"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
