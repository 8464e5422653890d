//! `unisync` - CLI for the portal data layer
//!
//! This binary initialises the shared collections, runs the cross-portal
//! sync, reports store status and manages support tickets.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{bail, Context};
use clap::Parser;

use unisync::cli::{
    Cli, Command, ConfigCommand, StatusCommand, SyncCommand, SyncTarget, TicketsCommand,
};
use unisync::model::{Ticket, TicketResponse};
use unisync::{
    init_logging, sync_assignments, sync_submissions, AppContext, AutoSyncReport, Config,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Init => handle_init(&config),
        Command::Sync(cmd) => handle_sync(&config, &cmd),
        Command::Status(cmd) => handle_status(&config, &cmd),
        Command::Tickets(cmd) => handle_tickets(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open(config: &Config) -> anyhow::Result<AppContext> {
    AppContext::open(config).context("failed to open portal store")
}

fn handle_init(config: &Config) -> anyhow::Result<()> {
    let mut config = config.clone();
    config.connector.initialize_on_open = false;
    let ctx = open(&config)?;

    let initialized = ctx.connector().initialize_if_empty()?;
    if initialized.is_empty() {
        println!("All shared collections already exist.");
    } else {
        for data_type in &initialized {
            println!("Initialized {data_type}");
        }
    }
    Ok(())
}

fn handle_sync(config: &Config, cmd: &SyncCommand) -> anyhow::Result<()> {
    let ctx = open(config)?;
    let options = ctx.sync_options();

    let mut report = AutoSyncReport::default();
    if matches!(cmd.target, SyncTarget::Assignments | SyncTarget::All) {
        report.assignments = sync_assignments(ctx.faculty(), ctx.student(), options)?;
    }
    if matches!(cmd.target, SyncTarget::Submissions | SyncTarget::All) {
        report.submissions = sync_submissions(ctx.student(), ctx.faculty(), options)?;
    }

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Assignments synced:  {} ({} notifications)",
            report.assignments.synced(),
            report.assignments.notifications
        );
        println!(
            "Submissions synced:  {} ({} notifications)",
            report.submissions.synced(),
            report.submissions.notifications
        );
    }
    Ok(())
}

fn handle_status(config: &Config, cmd: &StatusCommand) -> anyhow::Result<()> {
    let ctx = open(config)?;

    let synced = if config.sync.auto_sync && !cmd.no_sync {
        Some(ctx.auto_sync()?)
    } else {
        None
    };
    let counts = ctx.connector().collection_counts()?;
    let portal_counts = ctx.portal_counts()?;
    let active_tickets = ctx.connector().active_ticket_count()?;
    let stats = ctx.stats()?;
    let available = ctx.store().is_available();

    if cmd.json {
        let collections: serde_json::Map<String, serde_json::Value> = counts
            .iter()
            .map(|(data_type, count)| (data_type.to_string(), (*count).into()))
            .collect();
        let portals: serde_json::Map<String, serde_json::Value> = portal_counts
            .iter()
            .map(|(key, count)| ((*key).to_string(), (*count).into()))
            .collect();
        let status = serde_json::json!({
            "backend": config.storage.backend.to_string(),
            "available": available,
            "database_path": stats.as_ref().map(|_| config.database_path()),
            "key_prefix": ctx.store().prefix(),
            "collections": collections,
            "portal_collections": portals,
            "active_tickets": active_tickets,
            "total_keys": stats.as_ref().map(|s| s.total_keys),
            "payload_bytes": stats.as_ref().map(|s| s.payload_bytes),
            "db_size_bytes": stats.as_ref().map(|s| s.db_size_bytes),
            "last_write": stats.as_ref().and_then(|s| s.last_write),
            "synced": synced,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("unisync status");
    println!("--------------");
    println!("Backend:       {}", config.storage.backend);
    println!("Available:     {}", if available { "yes" } else { "no" });
    if let Some(stats) = &stats {
        println!("Database:      {}", config.database_path().display());
        println!("Keys:          {}", stats.total_keys);
        println!("Payload:       {} bytes", stats.payload_bytes);
        println!("File size:     {} bytes", stats.db_size_bytes);
        if let Some(last) = stats.last_write {
            println!("Last write:    {}", last.to_rfc3339());
        }
    }
    if !ctx.store().prefix().is_empty() {
        println!("Key prefix:    {}", ctx.store().prefix());
    }
    if let Some(report) = &synced {
        println!(
            "Auto-sync:     {} assignments, {} submissions",
            report.assignments.synced(),
            report.submissions.synced()
        );
    }
    println!("Active tickets: {active_tickets}");
    println!();
    println!("Collections");
    for (data_type, count) in counts {
        println!("  {:<14}{count}", data_type.to_string());
    }
    println!();
    println!("Portal collections");
    for (key, count) in portal_counts {
        println!("  {key:<22}{count}");
    }
    Ok(())
}

fn handle_tickets(config: &Config, cmd: &TicketsCommand) -> anyhow::Result<()> {
    let ctx = open(config)?;
    let connector = ctx.connector();

    match cmd {
        TicketsCommand::List { json, .. } => {
            let filter = cmd.filter().unwrap_or_default();
            let tickets = connector.search_tickets(&filter)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&tickets)?);
            } else if tickets.is_empty() {
                println!("No tickets found.");
            } else {
                for ticket in &tickets {
                    print_ticket_line(ticket);
                }
            }
        }
        TicketsCommand::Create {
            title,
            description,
            created_by,
            portal,
            priority,
            category,
        } => {
            let ticket = Ticket::new(
                title.as_str(),
                description.as_str(),
                created_by.as_str(),
                (*portal).into(),
                (*priority).into(),
                category.as_str(),
            );
            let id = ticket.id.clone();
            connector.tickets().create(ticket)?;
            println!("Created ticket {id}");
        }
        TicketsCommand::SetStatus { id, status } => {
            let Some(ticket) = connector.set_ticket_status(id, (*status).into())? else {
                bail!("no ticket with id {id}");
            };
            println!("Ticket {} is now {}", ticket.id, ticket.status);
        }
        TicketsCommand::Assign { id, assignee } => {
            let Some(ticket) = connector.assign_ticket(id, assignee.as_str())? else {
                bail!("no ticket with id {id}");
            };
            println!("Ticket {} assigned to {assignee}", ticket.id);
        }
        TicketsCommand::Respond {
            id,
            content,
            name,
            responder_id,
            role,
        } => {
            let response = TicketResponse::new(
                content.as_str(),
                name.as_str(),
                responder_id.as_str(),
                (*role).into(),
            );
            let Some(ticket) = connector.add_ticket_response(id, response)? else {
                bail!("no ticket with id {id}");
            };
            println!(
                "Added response to ticket {} ({} total)",
                ticket.id,
                ticket.responses.len()
            );
        }
        TicketsCommand::Delete { id } => {
            let before = connector.tickets().count()?;
            let after = connector.tickets().delete(id)?.len();
            if before == after {
                bail!("no ticket with id {id}");
            }
            println!("Deleted ticket {id}");
        }
    }
    Ok(())
}

fn print_ticket_line(ticket: &Ticket) {
    println!(
        "{}  [{}] [{}] {} ({}, {})",
        ticket.id,
        ticket.status,
        ticket.priority,
        ticket.title,
        ticket.portal_type,
        ticket.created_at.format("%Y-%m-%d %H:%M")
    );
    if let Some(assignee) = &ticket.assigned_to {
        println!("    assigned to {assignee}");
    }
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Backend:            {}", config.storage.backend);
                println!("  Database path:      {}", config.database_path().display());
                println!("  Key prefix:         {:?}", config.storage.key_prefix);
                println!();
                println!("[Sync]");
                println!("  Notify:             {}", config.sync.notify);
                println!("  Auto sync:          {}", config.sync.auto_sync);
                println!();
                println!("[Connector]");
                println!(
                    "  Initialize on open: {}",
                    config.connector.initialize_on_open
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => bail!("configuration error: {e}"),
            }
        }
    }
    Ok(())
}
