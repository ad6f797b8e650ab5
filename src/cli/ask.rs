//! Ask command - build or reload the index and answer a question

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use lnbot::{Config, Indexer};

/// Question asked when none is given
pub const DEFAULT_QUERY: &str = "How to open a Lightning channel?";

#[derive(Args)]
pub struct AskArgs {
    /// Question to ask
    #[arg(default_value = DEFAULT_QUERY)]
    pub query: String,

    /// Directory of source documents [config: index.input_dir, default: data]
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Directory the index is persisted to [config: index.output_dir, default: data]
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// LLM provider
    #[arg(long, value_parser = ["openai", "ollama", "anthropic", "simulated"])]
    pub llm: Option<String>,

    /// LLM model name
    #[arg(long)]
    pub model: Option<String>,

    /// Embedding provider
    #[arg(long, value_parser = ["openai", "ollama", "simulated"])]
    pub embedding_mode: Option<String>,

    /// Embedding model name
    #[arg(long)]
    pub embedding_model: Option<String>,

    /// Number of passages to retrieve
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Print the retrieved passages after the answer
    #[arg(long)]
    pub show_sources: bool,
}

impl AskArgs {
    /// Command-line values take precedence over the config file
    fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.input_dir {
            config.index.input_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.index.output_dir = dir.clone();
        }
        if let Some(llm) = &self.llm {
            config.llm.provider = llm.clone();
        }
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if let Some(mode) = &self.embedding_mode {
            config.embedding.provider = mode.clone();
        }
        if let Some(model) = &self.embedding_model {
            config.embedding.model = model.clone();
        }
        if let Some(top_k) = self.top_k {
            config.index.similarity_top_k = top_k;
        }
    }
}

pub async fn run(args: AskArgs, config_path: &Path, quiet: bool) -> anyhow::Result<()> {
    let mut config = Config::load_from(config_path);
    args.apply(&mut config);

    info!(
        "Using {} ({}) with embeddings from {} ({})",
        config.llm.provider, config.llm.model, config.embedding.provider, config.embedding.model
    );

    let indexer = Indexer::from_config(&config, !quiet).await?;

    let response = indexer.query(&args.query).await?;
    println!("{}", response);

    if args.show_sources && !response.source_nodes.is_empty() {
        println!("\n{}", response.formatted_sources(200));
    }

    Ok(())
}
