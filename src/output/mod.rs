//! Transcript persistence: formatted text files under the transcripts
//! directory, plus the listing backend for the browser.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::Result;

/// Replace filesystem-reserved characters with underscores.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c => c,
        })
        .collect()
}

/// Path a transcript will be written to: `{sanitizedTitle}_{lang}.txt`.
pub fn transcript_path(dir: &Path, title: &str, language_code: &str) -> PathBuf {
    dir.join(format!("{}_{}.txt", sanitize_title(title), language_code))
}

/// Write the transcript with its metadata header. Creates the directory
/// if needed; an existing file of the same name is overwritten.
pub fn save_transcript(
    dir: &Path,
    title: &str,
    text: &str,
    url: &str,
    language_code: &str,
) -> Result<PathBuf> {
    fs_err::create_dir_all(dir)?;

    let path = transcript_path(dir, title, language_code);
    let generated_on = Local::now().format("%Y-%m-%d %H:%M:%S");
    let rule = "=".repeat(60);

    let content = format!(
        "{rule}\nYouTube Video Transcript\n{rule}\n\n\
         Title: {title}\n\
         URL: {url}\n\
         Language: {language_code}\n\
         Generated on: {generated_on}\n\
         \n{rule}\nTRANSCRIPT\n{rule}\n\n{text}",
    );

    fs_err::write(&path, content)?;
    tracing::info!("saved transcript to {}", path.display());

    Ok(path)
}

/// A previously saved transcript file.
#[derive(Debug, Clone)]
pub struct SavedTranscript {
    pub path: PathBuf,
    /// File stem shown in the browser listing.
    pub name: String,
    pub modified: DateTime<Local>,
}

/// List saved transcripts, newest first. A missing directory is just an
/// empty listing.
pub fn list_saved(dir: &Path) -> Result<Vec<SavedTranscript>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut saved = Vec::new();

    for entry in fs_err::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.extension().and_then(|e| e.to_str()) != Some("txt") {
            continue;
        }

        let name = match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem.to_string(),
            None => continue,
        };

        let modified = entry.metadata()?.modified()?;

        saved.push(SavedTranscript {
            path,
            name,
            modified: modified.into(),
        });
    }

    saved.sort_by(|a, b| b.modified.cmp(&a.modified));

    Ok(saved)
}

/// Read a saved transcript back for display.
pub fn read_saved(path: &Path) -> Result<String> {
    Ok(fs_err::read_to_string(path)?)
}
