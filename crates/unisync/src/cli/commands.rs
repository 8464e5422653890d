//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::model::{Portal, Priority, TicketFilter, TicketStatus};

/// Sync command arguments.
#[derive(Debug, Args)]
pub struct SyncCommand {
    /// Which connector to run
    #[arg(value_enum, default_value = "all")]
    pub target: SyncTarget,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Skip the automatic sync before reporting
    #[arg(long)]
    pub no_sync: bool,
}

/// Ticket commands.
#[derive(Debug, Subcommand)]
pub enum TicketsCommand {
    /// List tickets, newest first
    List {
        /// Only tickets raised from this portal
        #[arg(short, long, value_enum)]
        portal: Option<PortalArg>,

        /// Only tickets in this state
        #[arg(short, long, value_enum)]
        status: Option<StatusArg>,

        /// Only tickets with this priority
        #[arg(long, value_enum)]
        priority: Option<PriorityArg>,

        /// Text to find in title, description or category
        #[arg(long)]
        query: Option<String>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Raise a new ticket
    Create {
        /// Short summary
        title: String,

        /// Full description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Who is raising the ticket
        #[arg(long, default_value = "cli")]
        created_by: String,

        /// Portal the ticket is raised from
        #[arg(short, long, value_enum, default_value = "student")]
        portal: PortalArg,

        /// Urgency
        #[arg(long, value_enum, default_value = "medium")]
        priority: PriorityArg,

        /// Free-form category
        #[arg(long, default_value = "general")]
        category: String,
    },

    /// Move a ticket to another state
    SetStatus {
        /// Ticket identifier
        id: String,

        /// New state
        #[arg(value_enum)]
        status: StatusArg,
    },

    /// Hand a ticket to someone
    Assign {
        /// Ticket identifier
        id: String,

        /// Who will handle it
        assignee: String,
    },

    /// Reply to a ticket
    Respond {
        /// Ticket identifier
        id: String,

        /// Reply text
        content: String,

        /// Display name of the responder
        #[arg(long, default_value = "Administrator")]
        name: String,

        /// Identifier of the responder
        #[arg(long, default_value = "admin")]
        responder_id: String,

        /// Portal the reply comes from
        #[arg(long, value_enum, default_value = "admin")]
        role: PortalArg,
    },

    /// Delete a ticket
    Delete {
        /// Ticket identifier
        id: String,
    },
}

impl TicketsCommand {
    /// Build the filter for `tickets list`, or `None` for other commands.
    #[must_use]
    pub fn filter(&self) -> Option<TicketFilter> {
        match self {
            Self::List {
                portal,
                status,
                priority,
                query,
                ..
            } => Some(TicketFilter {
                portal: portal.map(Into::into),
                status: status.map(Into::into),
                priority: priority.map(Into::into),
                query: query.clone(),
            }),
            _ => None,
        }
    }
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

/// Connector selection for `sync`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SyncTarget {
    /// Faculty assignments to the student portal
    Assignments,
    /// Student submissions to the faculty portal
    Submissions,
    /// Both connectors
    #[default]
    All,
}

/// Portal argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PortalArg {
    /// Student portal
    Student,
    /// Faculty portal
    Faculty,
    /// Admin portal
    Admin,
}

impl From<PortalArg> for Portal {
    fn from(arg: PortalArg) -> Self {
        match arg {
            PortalArg::Student => Self::Student,
            PortalArg::Faculty => Self::Faculty,
            PortalArg::Admin => Self::Admin,
        }
    }
}

/// Ticket status argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// Newly raised
    Open,
    /// Being worked on
    InProgress,
    /// Fixed
    Resolved,
    /// Closed without further action
    Closed,
}

impl From<StatusArg> for TicketStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Open => Self::Open,
            StatusArg::InProgress => Self::InProgress,
            StatusArg::Resolved => Self::Resolved,
            StatusArg::Closed => Self::Closed,
        }
    }
}

/// Ticket priority argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PriorityArg {
    /// Low urgency
    Low,
    /// Normal urgency
    Medium,
    /// Needs attention soon
    High,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Low => Self::Low,
            PriorityArg::Medium => Self::Medium,
            PriorityArg::High => Self::High,
        }
    }
}
