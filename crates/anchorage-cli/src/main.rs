mod cli;
mod commands;

use std::process;

use anchorage_config::Config;
use anchorage_engine::{AnchorError, CancellationToken};
use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Command};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        logger.filter_level(cli.log_level());
    }
    logger.init();

    let config = load_config(&cli)?;

    match &cli.command {
        Command::Describe { file, start, end } => {
            let doc = commands::load_document(&config, file)?;
            let selectors = commands::describe(&config, &doc, start, end)?;
            println!("{}", serde_json::to_string_pretty(&selectors)?);
        }
        Command::Anchor { file, selectors } => {
            let doc = commands::load_document(&config, file)?;
            let selectors = commands::read_selectors(selectors)?;
            log::info!("anchoring {} selectors", selectors.len());

            match commands::anchor(&config, &doc, &selectors, &CancellationToken::new()).await {
                Ok(anchored) => println!("{}", serde_json::to_string_pretty(&anchored)?),
                Err(AnchorError::Unanchorable { attempts }) => {
                    eprintln!("Error: annotation is orphaned, no selector could be anchored");
                    for attempt in &attempts {
                        eprintln!("  {attempt}");
                    }
                    process::exit(2);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let loaded = match &cli.config {
        Some(path) => {
            let path = Config::expand_path(path).unwrap_or_else(|| path.clone());
            log::info!("Config path: {}", path.display());
            Config::load_from_path(&path)?
                .with_context(|| format!("Config file not found: {}", path.display()))?
        }
        None => {
            log::info!("Config path: {}", Config::config_path().display());
            Config::load()?.unwrap_or_default()
        }
    };

    let mut config = loaded;
    if let Some(window) = cli.context_window {
        config.anchoring.context_window = window;
    }
    if let Some(ms) = cli.timeout_ms {
        config.anchoring.search_timeout_ms = Some(ms);
    }
    config.validate()?;

    Ok(config)
}
