//! CLI module - command definitions and handlers

mod ask;
mod config_cmd;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use ask::AskArgs;
pub use config_cmd::ConfigArgs;

/// lnbot - ask questions about a directory of documents
#[derive(Parser)]
#[command(name = "lnbot")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file to use instead of ~/.config/lnbot/config.toml
    #[arg(long, global = true, env = "LNBOT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub ask: AskArgs,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage configuration
    Config(ConfigArgs),
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config_path = lnbot::Config::resolve_path(self.config);
        match self.command {
            Some(Commands::Config(args)) => config_cmd::run(args, &config_path),
            None => ask::run(self.ask, &config_path, self.quiet).await,
        }
    }
}
