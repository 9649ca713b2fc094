//! Signoff CLI - Main entry point

use clap::{Parser, Subcommand};
use signoff_engine::SettingsRequest;
use signoff_rpc::{commands, AppContext};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "signoff")]
#[command(about = "Signoff - maker-checker approval engine", long_about = None)]
struct Cli {
    /// Data directory path
    #[arg(short, long, default_value = "./data")]
    data: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and seed the approval settings
    Init,

    /// Approve a pending command
    Approve {
        /// Command ID
        command: i64,
        /// Voting user ID
        #[arg(long = "as")]
        voter: i64,
    },

    /// Reject a pending command
    Reject {
        /// Command ID
        command: i64,
        /// Voting user ID
        #[arg(long = "as")]
        voter: i64,
    },

    /// Show the current decision for a command
    Status {
        /// Command ID
        command: i64,
    },

    /// List the votes cast on a command
    Votes {
        /// Command ID
        command: i64,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Approval settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show the active settings
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace the active settings
    Update {
        /// Approval mode: QUORUM, ALL or LEADER
        mode: String,
        /// Signatures required, counting the maker
        required: i64,
        /// Leader user ID (LEADER mode)
        #[arg(long)]
        leader: Option<i64>,
        /// Acting administrator user ID
        #[arg(long = "as")]
        actor: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let ctx = AppContext::new(&cli.data).await?;

    match cli.command {
        Commands::Init => {
            commands::init(&ctx).await?;
        }

        Commands::Approve { command, voter } => {
            commands::approve(&ctx, command, voter).await?;
        }

        Commands::Reject { command, voter } => {
            commands::reject(&ctx, command, voter).await?;
        }

        Commands::Status { command } => {
            commands::status(&ctx, command).await?;
        }

        Commands::Votes { command, json } => {
            commands::votes(&ctx, command, json).await?;
        }

        Commands::Settings { action } => match action {
            SettingsAction::Show { json } => {
                commands::settings_show(&ctx, json).await?;
            }
            SettingsAction::Update {
                mode,
                required,
                leader,
                actor,
            } => {
                let request = SettingsRequest {
                    approval_mode: mode,
                    required_approvals: required,
                    required_user_id: leader,
                };
                commands::settings_update(&ctx, actor, &request).await?;
            }
        },
    }

    ctx.close().await;
    Ok(())
}
