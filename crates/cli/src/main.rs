use clap::{Parser, Subcommand};
use ferrous_probe_domain::CliOverrides;
use std::path::PathBuf;
use tracing::info;

mod bootstrap;
mod commands;
mod di;

#[derive(Parser)]
#[command(name = "ferrous-probe")]
#[command(version)]
#[command(about = "Ferrous Probe - network interference measurement toolkit")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a hostname and print the addresses with every network event
    Lookup {
        hostname: String,

        /// Resolver endpoint: system:///, udp://IP:PORT, tcp://IP:PORT,
        /// tls://HOST:PORT or an https:// DoH URL
        #[arg(short = 'r', long)]
        resolver: Option<String>,

        /// Per-query timeout in milliseconds
        #[arg(long)]
        query_timeout_ms: Option<u64>,

        /// TCP/UDP connect timeout in milliseconds
        #[arg(long)]
        connect_timeout_ms: Option<u64>,
    },

    /// Compute the verdict of a web connectivity measurement
    Analyze {
        /// URL that was measured
        url: String,

        /// JSON file holding the measurement's test keys
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cli_overrides = CliOverrides {
        log_level: cli.log_level.clone(),
        ..Default::default()
    };
    if let Command::Lookup {
        resolver,
        query_timeout_ms,
        connect_timeout_ms,
        ..
    } = &cli.command
    {
        cli_overrides.resolver = resolver.clone();
        cli_overrides.query_timeout_ms = *query_timeout_ms;
        cli_overrides.connect_timeout_ms = *connect_timeout_ms;
    }

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config)?;

    info!("Starting Ferrous Probe v{}", env!("CARGO_PKG_VERSION"));

    let output = match cli.command {
        Command::Lookup { hostname, .. } => commands::lookup(&config, &hostname).await?,
        Command::Analyze { url, file } => commands::analyze(&url, &file)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
