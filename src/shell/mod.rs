//! Interactive menu shell.
//!
//! The menu is a small finite-state machine; every flow returns to
//! `MainMenu` and only the explicit Exit choice terminates the loop.
//! No failure in a flow is allowed to end the process.

use std::path::PathBuf;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::captions::{CaptionTrack, CaptionsClient};
use crate::config::Config;
use crate::metadata::MetadataResolver;
use crate::utils::{extract_video_id, parse_selection, prompt_line, prompt_yes_no};
use crate::{negotiate, output, Result, SaverError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuState {
    MainMenu,
    SaveFlow,
    ViewFlow,
    About,
    Exit,
}

pub struct Shell {
    config: Config,
    transcripts_dir: PathBuf,
    captions: CaptionsClient,
    metadata: MetadataResolver,
}

impl Shell {
    pub fn new(config: Config, transcripts_dir: PathBuf) -> Result<Self> {
        let captions = CaptionsClient::new(config.request_delay_ms)?;
        let metadata = MetadataResolver::new(config.yt_dlp_path.clone());

        Ok(Self {
            config,
            transcripts_dir,
            captions,
            metadata,
        })
    }

    /// Run the menu loop until the user exits.
    pub async fn run(&self) -> Result<()> {
        print_banner();

        if !self.metadata.check_availability().await {
            println!(
                "{}  yt-dlp was not found on PATH. Install it to resolve video titles:",
                style("⚠️").yellow()
            );
            println!("   https://github.com/yt-dlp/yt-dlp");
        }

        let mut state = MenuState::MainMenu;

        loop {
            state = match state {
                MenuState::MainMenu => self.main_menu(),
                MenuState::SaveFlow => {
                    self.save_flow().await;
                    MenuState::MainMenu
                }
                MenuState::ViewFlow => {
                    self.view_flow();
                    MenuState::MainMenu
                }
                MenuState::About => {
                    show_about();
                    MenuState::MainMenu
                }
                MenuState::Exit => break,
            };
        }

        println!("\n👋 Thank you for using YouTube Transcript Saver!");
        Ok(())
    }

    fn main_menu(&self) -> MenuState {
        println!("\n{}", "-".repeat(60));
        println!("{:^60}", "🎯 Main Menu");
        println!("{}", "-".repeat(60));
        println!("1. 📝 Save Video Transcript");
        println!("2. 📋 View Previous Transcripts");
        println!("3. ℹ️  About");
        println!("4. ❌ Exit");
        println!("{}", "-".repeat(60));

        match prompt_line("\nEnter your choice (1-4): ").as_str() {
            "1" => MenuState::SaveFlow,
            "2" => MenuState::ViewFlow,
            "3" => MenuState::About,
            "4" => MenuState::Exit,
            _ => {
                println!("\n❌ Invalid choice! Please try again.");
                MenuState::MainMenu
            }
        }
    }

    /// One pass of the save pipeline per URL entry; loops only on input
    /// errors, and returns to the menu after processing one video.
    async fn save_flow(&self) {
        loop {
            println!("\n{}", "-".repeat(60));
            let url = prompt_line("🔗 Enter YouTube URL (or press Enter to go back): ");

            if url.is_empty() {
                return;
            }

            let Some(video_id) = extract_video_id(&url) else {
                println!("\n❌ Invalid YouTube URL! Please enter a valid YouTube URL.");
                continue;
            };
            tracing::debug!("extracted video id {}", video_id);

            let spinner = spinner("Getting video information...");
            let metadata = match self.metadata.resolve(&url).await {
                Ok(metadata) => {
                    spinner.finish_and_clear();
                    metadata
                }
                Err(err) => {
                    spinner.finish_and_clear();
                    report_error(&err);
                    continue;
                }
            };

            println!("\n📺 Processing: {}", style(&metadata.title).bold());
            println!("👤 Channel: {}", metadata.author);

            let transcript = match self.negotiate_transcript(&video_id).await {
                Some(transcript) => transcript,
                None => continue,
            };

            let path = match output::save_transcript(
                &self.transcripts_dir,
                &metadata.title,
                &transcript.text,
                &url,
                &transcript.language_code,
            ) {
                Ok(path) => path,
                Err(err) => {
                    report_error(&err);
                    return;
                }
            };

            println!("\n✅ Transcript saved successfully!");
            match path.canonicalize() {
                Ok(absolute) => println!("📄 File location: {}", absolute.display()),
                Err(_) => println!("📄 File location: {}", path.display()),
            }

            if prompt_yes_no("\nWould you like to view the transcript now? (y/n) ") {
                match output::read_saved(&path) {
                    Ok(content) => {
                        println!("\n{}", "=".repeat(60));
                        println!("{}", content);
                        println!("{}", "=".repeat(60));
                        prompt_line("\nPress Enter to continue...");
                    }
                    Err(err) => report_error(&err),
                }
            }
            return;
        }
    }

    /// List tracks, let the user pick a supported language, and run the
    /// fetch strategy chain. `None` means the video was abandoned.
    async fn negotiate_transcript(&self, video_id: &str) -> Option<negotiate::TranscriptResult> {
        let spinner = spinner("Checking for available transcripts...");
        let track_list = match self.captions.list_tracks(video_id).await {
            Ok(list) => {
                spinner.finish_and_clear();
                list
            }
            Err(err) => {
                spinner.finish_and_clear();
                report_error(&err);
                return None;
            }
        };

        let supported = negotiate::supported_tracks(&track_list, &self.config.languages);
        if supported.is_empty() {
            println!(
                "\n❌ No captions available in supported languages ({}).",
                self.config.languages.join(", ")
            );
            return None;
        }

        println!("\n📃 Available transcripts:");
        for track in &supported {
            println!("  • {}", describe_track(track));
        }

        println!("\nSelect language:");
        for (i, track) in supported.iter().enumerate() {
            println!("{}. {} ({})", i + 1, track.language, track.language_code);
        }

        let selected = loop {
            let input = prompt_line("\nEnter number (or press Enter to go back): ");
            if input.is_empty() {
                return None;
            }
            match parse_selection(&input, supported.len()) {
                Some(index) => break supported[index],
                None => println!("❌ Invalid choice. Please try again."),
            }
        };

        let spinner = self::spinner("Fetching transcript...");
        match negotiate::fetch_transcript(&self.captions, &track_list, &selected.language_code)
            .await
        {
            Ok(transcript) => {
                spinner.finish_and_clear();
                println!("\n✅ Using {} transcript!", selected.language);
                Some(transcript)
            }
            Err(err) => {
                spinner.finish_and_clear();
                report_error(&err);
                None
            }
        }
    }

    fn view_flow(&self) {
        let saved = match output::list_saved(&self.transcripts_dir) {
            Ok(saved) => saved,
            Err(err) => {
                report_error(&err);
                return;
            }
        };

        if saved.is_empty() {
            println!("\n❌ No saved transcripts found!");
            return;
        }

        println!("\n{}", "=".repeat(60));
        println!("{:^60}", "📋 Saved Transcripts");
        println!("{}", "=".repeat(60));

        for (i, file) in saved.iter().enumerate() {
            println!("\n{}. {}", i + 1, style(&file.name).bold());
            println!("   📅 {}", file.modified.format("%Y-%m-%d %H:%M:%S"));
        }

        println!("\nEnter the number of the transcript to view (or press Enter to go back)");
        let choice = prompt_line("Choice: ");

        if let Some(index) = parse_selection(&choice, saved.len()) {
            match output::read_saved(&saved[index].path) {
                Ok(content) => {
                    println!("\n{}", "=".repeat(60));
                    println!("{}", content);
                    println!("{}", "=".repeat(60));
                    prompt_line("\nPress Enter to continue...");
                }
                Err(err) => report_error(&err),
            }
        }
    }
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
    {
        bar.set_style(spinner_style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

fn report_error(err: &SaverError) {
    println!("\n❌ {}", err);
    if let Some(hint) = err.hint() {
        println!("💡 Tip: {}", hint);
    }
}

fn describe_track(track: &CaptionTrack) -> String {
    let kind = if track.is_generated {
        "🤖 (Auto-generated)"
    } else {
        "✨ (Manual)"
    };
    format!("{} ({}) {}", track.language, track.language_code, kind)
}

fn print_banner() {
    println!("{}", style("\n    ===============================================================").cyan());
    println!("{:^68}", "🎥 YouTube Transcript Saver");
    println!("{:^68}", "save video captions as text, right from your terminal");
    println!("{}", style("    ===============================================================").cyan());
}

fn show_about() {
    println!("\n{}", "=".repeat(60));
    println!("{:^60}", "ℹ️  About");
    println!("{}", "=".repeat(60));
    println!(
        "
This YouTube Transcript Saver helps you to:
• Extract video transcripts from YouTube videos
• Save transcripts as text files
• Organize transcripts by video name
• View saved transcripts easily

Features:
• Simple and easy to use interface
• Support for English and Hindi captions
• Automatic file naming
• Clean transcript formatting

Usage Tips:
• Make sure videos have captions enabled
• The video title is used as the filename
• Transcripts are saved in the 'Transcripts' folder
"
    );
    prompt_line("\nPress Enter to continue...");
}
