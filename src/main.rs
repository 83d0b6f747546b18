use clap::Parser;
use summer_games_api::cli::Cli;
use summer_games_api::config::config;
use summer_games_api::is_development;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, STORAGE_BACKEND, etc.
    let _ = dotenvy::dotenv();

    let config = config();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter())),
        )
        .init();

    if is_development!() {
        tracing::debug!("Development mode; set APP_ENV=production for production defaults");
    }

    let cli = Cli::parse();

    if let Err(e) = summer_games_api::cli::run(cli).await {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
