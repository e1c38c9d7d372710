use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "transcript-saver",
    about = "YouTube Transcript Saver - fetch video captions and keep them as text files",
    version,
    long_about = "An interactive tool for saving YouTube video transcripts. Paste a video URL, \
pick one of the available caption languages, and the transcript is written to a local text file \
you can browse later from the same menu."
)]
pub struct Cli {
    /// Directory transcripts are saved to (overrides the config file)
    #[arg(short = 'd', long, value_name = "DIR")]
    pub transcripts_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
