//! lnbot - question answering over a directory of documents
//!
//! Builds (or reloads) a persisted vector index and answers one query with it.

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "lnbot=debug,warn"
    } else if cli.quiet {
        "warn"
    } else {
        "lnbot=info,warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    if let Err(e) = cli.run().await {
        if let Some(local) = e.downcast_ref::<lnbot::Error>() {
            eprintln!("Error: {}", local);
            std::process::exit(local.exit_code());
        }
        return Err(e);
    }

    Ok(())
}
