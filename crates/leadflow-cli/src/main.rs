//! Leadflow CLI - Sweep triggers and reminder management
//!
//! Operator tooling for the lead engine without opening the CRM UI.

mod api;
mod config;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::Password;
use uuid::Uuid;

use api::LeadflowClient;
use config::Config;

#[derive(Parser)]
#[command(name = "leadflow")]
#[command(about = "Leadflow CLI - lead SLA and reminder operations", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Login and store API key
    Login {
        /// API key (will prompt if not provided)
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Run the claim-window sweep now
    Sweep,

    /// Claim a lead
    Claim {
        /// Lead ID
        lead_id: String,
        /// Acting agent (falls back to configured default)
        #[arg(short, long)]
        agent_id: Option<String>,
    },

    /// Reminder operations
    Reminders {
        #[command(subcommand)]
        action: ReminderAction,
    },

    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum ReminderAction {
    /// List reminders that are due now
    Due,
    /// Create a reminder
    Add {
        /// Reminder title
        title: String,
        /// When the reminder is due (RFC 3339, e.g. 2025-06-01T09:00:00Z)
        #[arg(short = 'w', long)]
        when: String,
        /// Reminder type (callback, email_follow_up, meeting, viewing, other)
        #[arg(short = 't', long, default_value = "callback")]
        r#type: String,
        /// Related lead ID
        #[arg(short, long)]
        lead_id: Option<String>,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
        /// Acting agent (falls back to configured default)
        #[arg(short, long)]
        agent_id: Option<String>,
    },
    /// Snooze a reminder by N minutes
    Snooze {
        /// Reminder ID
        id: String,
        /// Minutes to snooze
        #[arg(short, long, default_value = "30")]
        minutes: i64,
    },
    /// Mark a reminder complete
    Complete {
        /// Reminder ID
        id: String,
    },
    /// Delete a reminder
    Delete {
        /// Reminder ID
        id: String,
    },
    /// Dispatch notifications for due reminders
    Fire,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Login { key } => cmd_login(key).await,
        Commands::Sweep => cmd_sweep().await,
        Commands::Claim { lead_id, agent_id } => cmd_claim(lead_id, agent_id).await,
        Commands::Reminders { action } => cmd_reminders(action).await,
        Commands::Config => cmd_config(),
    }
}

fn client(config: &Config) -> Result<LeadflowClient> {
    let api_key = config
        .api_key
        .as_ref()
        .context("Not logged in. Run 'leadflow login' first.")?;
    Ok(LeadflowClient::new(&config.base_url, api_key))
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_login(key: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    let api_key = match key {
        Some(k) => k,
        None => Password::new()
            .with_prompt("API Key")
            .interact()
            .context("Failed to read API key")?,
    };

    // Test connection
    let client = LeadflowClient::new(&config.base_url, &api_key);
    print!("Testing connection... ");

    match client.health().await {
        Ok(true) => {
            println!("{}", "OK".green());
        }
        _ => {
            println!("{}", "Failed".red());
            bail!("Could not connect to Leadflow API. Check your API key.");
        }
    }

    config.set_api_key(api_key);
    config.save()?;

    println!("{} API key saved to {:?}", "✓".green(), Config::config_path()?);

    Ok(())
}

async fn cmd_sweep() -> Result<()> {
    let config = Config::load()?;
    let client = client(&config)?;

    let summary = client.run_sweep().await?;

    if summary.total == 0 {
        println!("{} No expired claim windows", "✓".green());
        return Ok(());
    }

    println!(
        "{} {} escalated, {} errors ({} expired total)",
        "✓".green(),
        summary.processed.to_string().green(),
        if summary.errors > 0 {
            summary.errors.to_string().red().to_string()
        } else {
            summary.errors.to_string()
        },
        summary.total
    );

    Ok(())
}

async fn cmd_claim(lead_id: String, agent_flag: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let client = client(&config)?;

    let agent_id = config
        .get_agent_id(agent_flag.as_deref())
        .context("No agent specified. Use --agent-id or set default_agent_id in config.")?;
    let agent_id: Uuid = agent_id.parse().context("Invalid agent id")?;

    let lead = client.claim_lead(&lead_id, agent_id).await?;

    println!(
        "{} Claimed {} {} ({})",
        "✓".green(),
        lead.first_name.cyan(),
        lead.last_name.cyan(),
        lead.phase.dimmed()
    );

    Ok(())
}

async fn cmd_reminders(action: ReminderAction) -> Result<()> {
    let config = Config::load()?;
    let client = client(&config)?;

    match action {
        ReminderAction::Due => {
            let due = client.due_reminders().await?;
            if due.is_empty() {
                println!("No reminders due.");
                return Ok(());
            }

            println!("{}", "Due reminders:".bold());
            for r in due {
                println!(
                    "  {} {} [{}] due {}",
                    r.id.to_string().dimmed(),
                    r.title.cyan(),
                    r.reminder_type.dimmed(),
                    r.reminder_datetime.format("%Y-%m-%d %H:%M")
                );
            }
        }

        ReminderAction::Add {
            title,
            when,
            r#type,
            lead_id,
            notes,
            agent_id,
        } => {
            let agent_id = config
                .get_agent_id(agent_id.as_deref())
                .context("No agent specified. Use --agent-id or set default_agent_id in config.")?;
            let agent_id: Uuid = agent_id.parse().context("Invalid agent id")?;
            let lead_id = lead_id
                .map(|s| s.parse::<Uuid>())
                .transpose()
                .context("Invalid lead id")?;
            let when: DateTime<Utc> = when
                .parse()
                .context("Invalid datetime, expected RFC 3339 (e.g. 2025-06-01T09:00:00Z)")?;

            let reminder = client
                .create_reminder(agent_id, lead_id, &title, notes.as_deref(), &r#type, when)
                .await?;

            println!(
                "{} Reminder '{}' set for {}",
                "✓".green(),
                reminder.title.cyan(),
                reminder.reminder_datetime.format("%Y-%m-%d %H:%M")
            );
        }

        ReminderAction::Snooze { id, minutes } => {
            let reminder = client.snooze_reminder(&id, minutes).await?;
            let until = reminder
                .snoozed_until
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_else(|| "later".to_string());
            println!("{} Snoozed until {}", "✓".green(), until.cyan());
        }

        ReminderAction::Complete { id } => {
            client.complete_reminder(&id).await?;
            println!("{} Reminder completed", "✓".green());
        }

        ReminderAction::Delete { id } => {
            client.delete_reminder(&id).await?;
            println!("{} Reminder deleted", "✓".green());
        }

        ReminderAction::Fire => {
            let summary = client.fire_reminders().await?;
            println!(
                "{} {} notified, {} errors",
                "✓".green(),
                summary.notified,
                summary.errors
            );
        }
    }

    Ok(())
}

fn cmd_config() -> Result<()> {
    let config = Config::load()?;

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    println!(
        "  API Key: {}",
        if config.api_key.is_some() {
            "Set".green()
        } else {
            "Not set".red()
        }
    );
    println!(
        "  Default Agent: {}",
        config.default_agent_id.as_deref().unwrap_or("None").cyan()
    );

    Ok(())
}
