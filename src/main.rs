use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rfscroll::scenario::run_scenario;
use rfscroll::{ControllerConfig, Scenario};

#[derive(Parser, Debug)]
#[command(name = "rfscroll", version, about = "Replay scroll restoration scenarios")]
struct Cli {
    /// Log controller decisions (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a scenario file and print the report as JSON
    Run {
        scenario: PathBuf,
        /// Controller configuration (JSON, missing fields take defaults)
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
    },
    /// Print the default controller configuration
    Config,
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<ControllerConfig> {
    match path {
        Some(p) => ControllerConfig::load(p)
            .with_context(|| format!("loading config {}", p.display())),
        None => Ok(ControllerConfig::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Run {
            scenario,
            config,
            pretty,
        } => {
            let config = load_config(config.as_ref())?;
            let loaded = Scenario::load(&scenario)
                .with_context(|| format!("loading scenario {}", scenario.display()))?;
            let report = run_scenario(&loaded, config)?;
            let out = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{}", out);
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&ControllerConfig::default())?);
        }
    }
    Ok(())
}
