//! Config command - manage lnbot configuration

use std::path::Path;

use clap::{Args, Subcommand};

use lnbot::Config;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Initialize config file with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show config file path
    Path,
}

pub fn run(args: ConfigArgs, path: &Path) -> anyhow::Result<()> {
    match args.command {
        ConfigCommands::Show => {
            let config = Config::load_from(path);

            if path.exists() {
                println!("Config file: {}", path.display());
            } else {
                println!("Config file: {} (not found, using defaults)", path.display());
            }
            println!();
            println!("[llm]");
            println!("provider = \"{}\"", config.llm.provider);
            println!("model = \"{}\"", config.llm.model);
            println!("temperature = {:.1}", config.llm.temperature);
            if let Some(host) = &config.llm.host {
                println!("host = \"{}\"", host);
            }
            if let Some(base_url) = &config.llm.base_url {
                println!("base_url = \"{}\"", base_url);
            }
            if config.llm.api_key.is_some() {
                println!("api_key = \"***\"");
            }
            println!();
            println!("[embedding]");
            println!("provider = \"{}\"", config.embedding.provider);
            println!("model = \"{}\"", config.embedding.model);
            if let Some(host) = &config.embedding.host {
                println!("host = \"{}\"", host);
            }
            if config.embedding.api_key.is_some() {
                println!("api_key = \"***\"");
            }
            if let Some(batch_size) = config.embedding.batch_size {
                println!("batch_size = {}", batch_size);
            }
            println!();
            println!("[index]");
            println!("input_dir = \"{}\"", config.index.input_dir.display());
            println!("output_dir = \"{}\"", config.index.output_dir.display());
            println!("chunk_size = {}", config.index.chunk_size);
            println!("chunk_overlap = {}", config.index.chunk_overlap);
            println!("similarity_top_k = {}", config.index.similarity_top_k);
        }

        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }

            Config::write_example(path)?;
            println!("Created config file at {}", path.display());
            println!();
            println!("Set OPENAI_API_KEY, or switch [llm] and [embedding] to a local provider:");
            println!();
            println!("  [llm]");
            println!("  provider = \"ollama\"");
            println!("  model = \"llama3\"");
            println!();
            println!("  [embedding]");
            println!("  provider = \"ollama\"");
            println!("  model = \"nomic-embed-text\"");
        }

        ConfigCommands::Path => {
            println!("{}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(command: ConfigCommands) -> ConfigArgs {
        ConfigArgs { command }
    }

    #[test]
    fn test_init_writes_to_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("lnbot.toml");

        run(args(ConfigCommands::Init { force: false }), &path).unwrap();
        assert_eq!(Config::load_from(&path).index.chunk_size, 1024);

        let err = run(args(ConfigCommands::Init { force: false }), &path).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        std::fs::write(&path, "[llm]\nprovider = \"ollama\"\n").unwrap();
        run(args(ConfigCommands::Show), &path).unwrap();
        run(args(ConfigCommands::Init { force: true }), &path).unwrap();
        assert_eq!(Config::load_from(&path).llm.provider, "openai");
    }
}
