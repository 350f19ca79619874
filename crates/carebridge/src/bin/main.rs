//! carebridge command-line interface

use carebridge::cli::{migrate, serve};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Healthcare provider onboarding and EHR integration registry
#[derive(Parser)]
#[command(name = "carebridge")]
#[command(author, version, about = "Healthcare provider registry service", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 5000)]
        port: u16,

        /// Database connection string
        #[arg(long, env = "DATABASE_URL")]
        database_url: Option<String>,

        /// Use the in-memory store instead of PostgreSQL
        #[arg(long)]
        memory: bool,

        /// Maximum pooled database connections
        #[arg(long, default_value_t = 5)]
        pool_size: u32,
    },

    /// Create any missing database tables, then exit
    Migrate {
        /// Database connection string
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,
    },
}

#[tokio::main]
async fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let result = match cli.command {
        Commands::Serve {
            port,
            database_url,
            memory,
            pool_size,
        } => {
            let config = serve::ServeConfig {
                port,
                database_url,
                memory,
                pool_size,
            };
            serve::serve(config).await
        }

        Commands::Migrate { database_url } => {
            let config = migrate::MigrateConfig { database_url };
            migrate::migrate(config).await
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
