use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "portal", version, about = "Document-request portal audit log")]
struct Cli {
    /// Path to portal.yaml. Defaults are used when omitted and ./portal.yaml does not exist.
    #[arg(long, global = true, env = "PORTAL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the read-only audit query API.
    Serve,

    /// Exercise every audit helper against a fresh log and verify the results.
    Smoke {
        /// Print entries and statistics as JSON instead of log lines.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    // Logs go to stderr so `smoke --json` output stays machine-readable.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Serve => commands::serve::run_serve(config).await?,
        Command::Smoke { json } => commands::smoke::run_smoke(&config, json)?,
    }

    Ok(())
}
