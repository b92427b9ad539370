//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Branch, year and section selecting a class.
#[derive(Debug, Clone, Args)]
pub struct ClassArgs {
    /// Branch short name (e.g. EEE, CSE)
    #[arg(short, long)]
    pub branch: String,

    /// Year of study
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=4))]
    pub year: u8,

    /// Section (defaults to the configured section)
    #[arg(short, long)]
    pub section: Option<String>,
}

/// Decode command arguments.
#[derive(Debug, Args)]
pub struct DecodeCommand {
    /// Registration numbers to decode
    #[arg(required = true)]
    pub reg_nos: Vec<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Faculty command arguments.
#[derive(Debug, Args)]
pub struct FacultyCommand {
    /// Faculty or employee identifier (FAC-CSE-001, ALIET-26-05)
    pub id: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Roster command arguments.
#[derive(Debug, Args)]
pub struct RosterCommand {
    #[command(flatten)]
    pub class: ClassArgs,

    /// Roster file (defaults to the configured roster)
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Mark command arguments.
#[derive(Debug, Args)]
pub struct MarkCommand {
    #[command(flatten)]
    pub class: ClassArgs,

    /// Session date as YYYY-MM-DD (defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Topic covered in the session
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Registration numbers to mark absent; everyone else is present
    #[arg(short, long, value_delimiter = ',')]
    pub absent: Vec<String>,

    /// Roster file (defaults to the configured roster)
    #[arg(short, long, value_name = "FILE")]
    pub roster: Option<PathBuf>,
}

/// Sessions command arguments.
#[derive(Debug, Args)]
pub struct SessionsCommand {
    #[command(flatten)]
    pub class: ClassArgs,

    /// First date to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Last date to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Report command arguments.
#[derive(Debug, Args)]
pub struct ReportCommand {
    #[command(flatten)]
    pub class: ClassArgs,

    /// First date to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Last date to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Report format
    #[arg(long, value_enum, default_value = "table")]
    pub format: ReportFormat,

    /// Write the report to a file instead of stdout; a directory gets the
    /// default report file name
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Roster file (defaults to the configured roster)
    #[arg(short, long, value_name = "FILE")]
    pub roster: Option<PathBuf>,
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

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Plain,
    /// Formatted table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Aligned text table with summary
    #[default]
    Table,
    /// Comma-separated values
    Csv,
    /// JSON document
    Json,
}

impl ReportFormat {
    /// File extension for reports in this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Table => "txt",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
        assert_eq!(ReportFormat::default(), ReportFormat::Table);
    }

    #[test]
    fn test_report_format_extension() {
        assert_eq!(ReportFormat::Csv.extension(), "csv");
        assert_eq!(ReportFormat::Json.extension(), "json");
        assert_eq!(ReportFormat::Table.extension(), "txt");
    }

    #[test]
    fn test_decode_command_debug() {
        let cmd = DecodeCommand {
            reg_nos: vec!["24HP1A0205".to_string()],
            json: true,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("24HP1A0205"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
