use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::{config, StorageBackend};
use crate::database::DatabaseManager;
use crate::seed;
use crate::server;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "summer-games-api")]
#[command(about = "Summer Games roster API - sports, contingents and athletes")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    /// Defaults to `serve` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP API server")]
    Serve {
        #[arg(long, help = "Port to listen on, overrides SUMMER_GAMES_PORT")]
        port: Option<u16>,

        #[arg(long, help = "Load the starter roster into an empty store before serving")]
        seed: bool,
    },

    #[command(about = "Apply pending database migrations and exit")]
    Migrate,

    #[command(about = "Load the starter roster into an empty store and exit")]
    Seed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command.unwrap_or(Commands::Serve { port: None, seed: false }) {
        Commands::Serve { port, seed } => handle_serve(port, seed).await,
        Commands::Migrate => handle_migrate(output_format).await,
        Commands::Seed => handle_seed(output_format).await,
    }
}

async fn handle_serve(port: Option<u16>, seed: bool) -> anyhow::Result<()> {
    let mut app_config = config().clone();
    if let Some(port) = port {
        app_config.server.port = port;
    }
    server::serve(app_config, seed).await
}

async fn handle_migrate(output_format: OutputFormat) -> anyhow::Result<()> {
    let app_config = config();
    if app_config.storage.backend == StorageBackend::Memory {
        anyhow::bail!("STORAGE_BACKEND is 'memory'; there is no database to migrate");
    }

    let pool = DatabaseManager::connect(&app_config.database).await?;
    DatabaseManager::migrate(&pool)
        .await
        .context("failed to apply migrations")?;

    match output_format {
        OutputFormat::Json => println!("{}", json!({ "success": true, "migrated": true })),
        OutputFormat::Text => println!("Migrations applied"),
    }
    Ok(())
}

async fn handle_seed(output_format: OutputFormat) -> anyhow::Result<()> {
    let store = DatabaseManager::open_store(config()).await?;
    let state = AppState::new(store, config());
    let summary = seed::seed_if_empty(&state.guard)
        .await
        .context("failed to seed starter roster")?;

    match output_format {
        OutputFormat::Json => {
            println!("{}", json!({ "success": true, "data": summary }));
        }
        OutputFormat::Text if summary.is_empty() => {
            println!("Store already holds data; nothing seeded");
        }
        OutputFormat::Text => {
            println!(
                "Seeded {} sports, {} contingents, {} athletes",
                summary.sports, summary.contingents, summary.athletes
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::parse_from(["summer-games-api"]);
        assert!(cli.command.is_none());
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Text));
    }

    #[test]
    fn parses_serve_flags() {
        let cli = Cli::parse_from(["summer-games-api", "serve", "--port", "8080", "--seed"]);
        match cli.command {
            Some(Commands::Serve { port, seed }) => {
                assert_eq!(port, Some(8080));
                assert!(seed);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn json_flag_is_global() {
        let cli = Cli::parse_from(["summer-games-api", "seed", "--json"]);
        assert!(matches!(cli.command, Some(Commands::Seed)));
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));
    }
}
