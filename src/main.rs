//! Media Renamer CLI
//!
//! A command-line tool that renames movie and TV libraries into a
//! normalized directory layout tagged with TMDB identifiers.

use clap::Parser;
use media_renamer::cli::{args::Cli, commands::rename};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    rename::run(&cli).await?;

    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("media_renamer=debug")
    } else {
        EnvFilter::new("media_renamer=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
