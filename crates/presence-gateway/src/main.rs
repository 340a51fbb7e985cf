//! Presence gateway entry point
//!
//! Run with:
//! ```bash
//! gateway-client | cargo run -p presence-gateway
//! cargo run -p presence-gateway -- query <GUILD_ID> <USER_ID> [STATUS]...
//! ```
//!
//! ## Subcommands
//!
//! - `run` (default): read dispatch events from stdin, one JSON object per line
//! - `query`: print a member's total tracked time
//!
//! Configuration is loaded from environment variables (and `.env`). Logs go to
//! stderr.

use clap::{Parser, Subcommand};
use presence_common::{try_init_tracing, try_init_tracing_with_config, AppConfig, AppError};
use presence_core::{format_duration, SessionKey, Snowflake};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "presence-gateway")]
#[command(about = "Discord presence session tracker")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Track presence from dispatch events on stdin
    Run,

    /// Print how long a member has spent in tracked statuses
    Query {
        #[arg(value_name = "GUILD_ID")]
        guild_id: Snowflake,

        #[arg(value_name = "USER_ID")]
        user_id: Snowflake,

        /// Only count these statuses (default: every tracked status)
        #[arg(value_name = "STATUS")]
        statuses: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli.command.unwrap_or(Commands::Run)).await {
        error!(error = %e, code = e.error_code(), "Presence gateway failed");
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> Result<(), AppError> {
    // Load configuration
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Logging is not configured yet; fall back to the defaults to report it.
            if let Err(init) = try_init_tracing() {
                eprintln!("Warning: Failed to initialize tracing: {init}");
            }
            return Err(e.into());
        }
    };

    // Initialize tracing
    if let Err(e) = try_init_tracing_with_config(config.logging.into()) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    match command {
        Commands::Run => {
            info!(
                app = %config.app.name,
                env = ?config.app.env,
                "Starting presence gateway..."
            );
            presence_gateway::server::run(config).await
        }
        Commands::Query {
            guild_id,
            user_id,
            statuses,
        } => {
            let key = SessionKey::new(guild_id, user_id);
            let total = presence_gateway::server::query_total(&config, key, &statuses).await?;
            println!("{}", format_duration(total));
            Ok(())
        }
    }
}
