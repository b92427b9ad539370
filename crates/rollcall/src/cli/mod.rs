//! Command-line interface for rollcall.
//!
//! This module provides the CLI structure for the `rollcall` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ClassArgs, ConfigCommand, DecodeCommand, FacultyCommand, MarkCommand, OutputFormat,
    ReportCommand, ReportFormat, RosterCommand, SessionsCommand,
};

use crate::logging::Verbosity;

/// rollcall - College attendance bookkeeping
///
/// Decodes registration numbers into branch, entry type and year of study,
/// records class attendance, and reports attendance percentages.
#[derive(Debug, Parser)]
#[command(name = "rollcall")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
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
    /// Decode registration numbers
    Decode(DecodeCommand),

    /// Decode a faculty or employee identifier
    Faculty(FacultyCommand),

    /// List the students of a class
    Roster(RosterCommand),

    /// Record attendance for a class session
    Mark(MarkCommand),

    /// List recorded sessions of a class
    Sessions(SessionsCommand),

    /// Produce an attendance report
    Report(ReportCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
