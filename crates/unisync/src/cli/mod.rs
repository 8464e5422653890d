//! Command-line interface for unisync.
//!
//! This module provides the CLI structure for the `unisync` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, PortalArg, PriorityArg, StatusArg, StatusCommand, SyncCommand, SyncTarget,
    TicketsCommand,
};

use crate::logging::Verbosity;

/// unisync - Shared data layer for the university portal
///
/// Initialises the portal collections, keeps the student and faculty views
/// of assignments and submissions in step, and manages support tickets.
#[derive(Debug, Parser)]
#[command(name = "unisync")]
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
    /// Create empty shared collections where none exist
    Init,

    /// Copy new assignments and submissions between portals
    Sync(SyncCommand),

    /// Show store location and collection sizes
    Status(StatusCommand),

    /// Inspect and manage support tickets
    #[command(subcommand)]
    Tickets(TicketsCommand),

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
