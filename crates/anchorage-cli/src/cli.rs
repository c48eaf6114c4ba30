use std::path::PathBuf;
use std::str::FromStr;

use anchorage_engine::NodePath;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "anchorage")]
#[command(about = "Describe selections in markup files and anchor them again")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ~/.config/anchorage/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Characters of quote context to record
    #[arg(long, value_name = "CHARS", global = true)]
    pub context_window: Option<usize>,

    /// Give up anchoring after this many milliseconds
    #[arg(long, value_name = "MS", global = true)]
    pub timeout_ms: Option<u64>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the selectors describing a selection as JSON
    Describe {
        /// Markup file
        file: PathBuf,

        /// Selection start as PATH:OFFSET, e.g. /p[1]/text()[1]:13
        #[arg(long)]
        start: Endpoint,

        /// Selection end as PATH:OFFSET
        #[arg(long)]
        end: Endpoint,
    },

    /// Resolve a JSON array of selectors against a markup file
    Anchor {
        /// Markup file
        file: PathBuf,

        /// JSON file holding the selectors
        selectors: PathBuf,
    },
}

impl Cli {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

/// A position given on the command line: a node path and an offset in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub path: NodePath,
    pub offset: usize,
}

impl FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, offset) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("expected PATH:OFFSET, got {s:?}"))?;
        let offset = offset
            .parse()
            .map_err(|e| format!("bad offset {offset:?}: {e}"))?;
        let path = path.parse().map_err(|e| format!("{e}"))?;
        Ok(Endpoint { path, offset })
    }
}
