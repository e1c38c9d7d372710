//! YouTube Transcript Saver - an interactive CLI for saving video transcripts
//!
//! This library fetches the caption tracks YouTube publishes for a video,
//! negotiates a language with the user, and persists the transcript text
//! under a local `Transcripts` directory.

pub mod captions;
pub mod cli;
pub mod config;
pub mod metadata;
pub mod negotiate;
pub mod output;
pub mod shell;
pub mod utils;

pub use captions::{CaptionEntry, CaptionTrack, CaptionsClient, TrackList};
pub use cli::Cli;
pub use config::Config;
pub use metadata::{MetadataResolver, VideoMetadata};
pub use negotiate::TranscriptResult;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, SaverError>;

/// Error kinds surfaced to the interactive shell. Each carries enough
/// structure that the UI never has to sniff message strings.
#[derive(thiserror::Error, Debug)]
pub enum SaverError {
    #[error("Invalid YouTube URL: {0}")]
    InvalidUrl(String),

    #[error("Subtitles are disabled for video {0}")]
    CaptionsDisabled(String),

    #[error("Video {0} is unavailable")]
    VideoUnavailable(String),

    #[error("Video {0} is age restricted")]
    AgeRestricted(String),

    #[error("YouTube blocked the request for video {0}")]
    RequestBlocked(String),

    #[error("Video {0} is not playable: {1}")]
    VideoUnplayable(String, String),

    #[error("No caption track found for language '{0}'")]
    TrackNotFound(String),

    #[error("Track '{0}' cannot be translated to '{1}'")]
    TranslationFailed(String, String),

    #[error("Transcript for language '{0}' contained no text")]
    EmptyTranscript(String),

    #[error("Could not fetch video information: {0}")]
    Metadata(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Could not parse YouTube response for video {0}")]
    Unparsable(String),

    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),
}

impl SaverError {
    /// A short actionable tip shown next to the error, when one exists.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            SaverError::CaptionsDisabled(_) => {
                Some("This video doesn't have any captions/subtitles enabled.")
            }
            SaverError::VideoUnavailable(_) => {
                Some("Make sure the video is publicly available and not private/deleted.")
            }
            SaverError::AgeRestricted(_) => {
                Some("Age-restricted videos don't expose their captions.")
            }
            SaverError::RequestBlocked(_) => {
                Some("YouTube is rate limiting this machine. Wait a while and try again.")
            }
            SaverError::TranslationFailed(..) => {
                Some("Could not translate the transcript. Try another language.")
            }
            SaverError::TrackNotFound(_) | SaverError::EmptyTranscript(_) => {
                Some("This transcript might not be available anymore.")
            }
            SaverError::Http(_) => Some("Check your network connection and try again."),
            _ => None,
        }
    }
}
