use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use connect_n::config::AppConfig;
use connect_n::protocol::{self, MoveRequest};

/// Answer one connect-N move request.
///
/// Reads a JSON `MoveRequest` from `--request` (or stdin) and writes the
/// JSON `MoveResponse` to stdout. Logs go to stderr.
#[derive(Parser)]
#[command(name = "connect_n", about = "Pick a connect-N move with minimax search")]
struct Cli {
    /// Path to a JSON request; stdin when omitted
    #[arg(long)]
    request: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Seed for the mistake roll, overriding the config and request
    #[arg(long)]
    seed: Option<u64>,

    /// Pretty-print the response
    #[arg(long)]
    pretty: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", AppConfig::default_toml()?);
        return Ok(());
    }

    let app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    let input = match &cli.request {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading request from {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading request from stdin")?;
            buf
        }
    };

    let mut request: MoveRequest =
        serde_json::from_str(&input).context("parsing move request")?;
    if cli.seed.is_some() {
        request.seed = cli.seed;
    }

    let response = protocol::handle_request(&request, &app_config.engine)
        .context("answering move request")?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{output}");
    Ok(())
}
