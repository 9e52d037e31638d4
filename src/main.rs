use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use plotpilot::config::AppConfig;
use plotpilot::server::{self, MigrateDirection};

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        #[clap(short, long, default_value = "3000")]
        port: u16,
        #[clap(short, long, default_value = "plotpilot.db")]
        database: String,
        #[clap(long)]
        cors_origin: Option<String>,
    },
    /// Apply database migrations
    Migrate {
        #[clap(short, long, default_value = "plotpilot.db")]
        database: String,
        #[clap(subcommand)]
        direction: MigrateDirection,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        Command::Serve {
            port,
            database,
            cors_origin,
        } => {
            let config = AppConfig::from_env();
            info!("Starting server on port {}", port);
            server::start_server(port, &database, cors_origin.as_deref(), config).await?;
        }
        Command::Migrate {
            database,
            direction,
        } => {
            server::migrate_database(&database, direction).await?;
        }
    }

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level.to_string()))
        .without_time()
        .init();
}
