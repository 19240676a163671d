use anyhow::Result;
use clap::{Parser, Subcommand};

/// eventflow - Event management API
#[derive(Parser)]
#[command(name = "eventflow")]
#[command(about = "Create events, manage attendees and keep memberships consistent", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Run the retention sweep once and print its report
    Sweep,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = eventflow::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    eventflow::observability::init_observability(
        "eventflow",
        env!("CARGO_PKG_VERSION"),
        &config.observability,
    )?;

    match cli.command {
        Commands::Serve { host, port } => eventflow::cli::serve(config, host, port).await,
        Commands::Migrate => eventflow::cli::migrate(config).await,
        Commands::Sweep => eventflow::cli::sweep(config).await,
    }
}
