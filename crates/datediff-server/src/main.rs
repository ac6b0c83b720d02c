use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use datediff_server::{logging, AppConfig};

/// Date difference server: REST and GraphQL endpoints
#[derive(Parser)]
#[command(name = "datediff-server", version, about)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for the HTTP listener (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // defaults -> YAML -> env (DATEDIFF__*) -> CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server.bind_addr.set_port(port);
    }

    if cli.print_config {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Check => {
            println!("configuration OK");
            Ok(())
        }
        Commands::Run => {
            logging::init(&config.logging)?;
            datediff_server::serve(config).await
        }
    }
}
