use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yt_transcript_saver::shell::Shell;
use yt_transcript_saver::{Cli, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the interactive console quiet unless asked otherwise.
    let default_filter = if cli.verbose {
        "yt_transcript_saver=debug,transcript_saver=debug"
    } else {
        "yt_transcript_saver=warn,transcript_saver=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load()?;
    let transcripts_dir = cli
        .transcripts_dir
        .unwrap_or_else(|| config.transcripts_dir.clone());

    let shell = Shell::new(config, transcripts_dir)?;
    shell.run().await?;

    Ok(())
}
