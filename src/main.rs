//! ledgerview main entry point

use anyhow::Context;
use clap::{Parser, Subcommand};
use ledgerview_api::{start_server, AppState};
use ledgerview_config::Config;
use ledgerview_router::{build_router, Navigator};
use ledgerview_style::StyleConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "ledgerview")]
#[command(version = "0.1.0")]
#[command(about = "Route table, resolver and style configuration for the ledger web UI", long_about = None)]
struct Args {
    /// Configuration file path (defaults are used when it does not exist)
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API and history-mode pages (default)
    Serve,
    /// List the declared routes
    Routes,
    /// Navigate to each path in order and print the final active route
    Resolve {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Print the utility-CSS configuration as JSON
    Style,
    /// List the files the utility-CSS generator would scan
    Scan {
        /// Project root the content globs are relative to
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Print a default configuration file
    Config,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(Command::Config) = args.command {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let mut config = Config::load_or_default(&args.config)
        .map_err(|e| anyhow::anyhow!("[{}] {}", e.code(), e))
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    config.apply_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str()))
        .init();
    if !args.config.exists() {
        log::warn!("{} not found, running with default configuration", args.config.display());
    }
    log::debug!("Config loaded: base={}, bind={}", config.router.base, config.bind_addr());

    let router = build_router(&config.router)?;
    let style = StyleConfig::from_settings(&config.style);

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let rt = Runtime::new()?;
            rt.block_on(start_server(AppState::new(config, router, style)))?;
        }
        Command::Routes => {
            for route in router.table().summaries() {
                println!("{:<50} {:<18} {}", route.path, route.name, route.load);
            }
        }
        Command::Resolve { paths } => {
            let rt = Runtime::new()?;
            rt.block_on(async {
                let navigator = Navigator::new(Arc::new(router));
                for path in &paths {
                    let resolved = navigator.push(path).await?;
                    log::info!("{} -> {}", path, resolved.name);
                }
                let active = navigator.current().await;
                println!("{}", serde_json::to_string_pretty(&active)?);
                anyhow::Ok(())
            })?;
        }
        Command::Style => {
            println!("{}", serde_json::to_string_pretty(&style.to_json())?);
        }
        Command::Scan { root } => {
            for file in style.scan(&root)? {
                println!("{}", file.display());
            }
        }
        Command::Config => print!("{}", Config::generate_default()),
    }

    Ok(())
}
