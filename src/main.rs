use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::{Overrides, Settings};
use database::{connect, run_migrations};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the school records service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A .env file is optional; DATABASE_URL may already be in the environment.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();
    let settings = configuration::load_settings(&cli.overrides)?;
    init_tracing(&settings.log.level)?;

    // Execute the appropriate command
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => web_server::run_server(&settings).await,
        Commands::Migrate => handle_migrate(&settings).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Backend for the school records dashboard: students, subjects, professors
/// and enrollments over JSON-RPC.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the remote methods (the default).
    Serve,
    /// Create the tables if they are absent, then exit.
    Migrate,
}

fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .with_context(|| format!("invalid log level {default_level:?}"))?;
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Unlike the server, this reports connection problems as a failed exit.
async fn handle_migrate(settings: &Settings) -> anyhow::Result<()> {
    let pool = connect(&settings.database)
        .await
        .context("Failed to connect to the database")?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    pool.close().await;
    tracing::info!("Tables are in place");
    Ok(())
}
