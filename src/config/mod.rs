use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Result, SaverError};

/// Application configuration, stored as YAML under the user's config
/// directory and created with defaults on first run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory transcripts are saved to
    pub transcripts_dir: PathBuf,

    /// Caption language codes offered to the user
    pub languages: Vec<String>,

    /// Delay between caption requests, guards against rate limiting
    pub request_delay_ms: u64,

    /// Path to the yt-dlp binary used for metadata lookups
    pub yt_dlp_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transcripts_dir: PathBuf::from("Transcripts"),
            languages: vec!["en".to_string(), "hi".to_string()],
            request_delay_ms: 500,
            yt_dlp_path: "yt-dlp".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs_err::read_to_string(&config_path)?;

            let config: Config = serde_yaml::from_str(&content).map_err(|e| {
                SaverError::Config(format!("failed to parse config file: {}", e))
            })?;

            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| SaverError::Config(format!("failed to serialize config: {}", e)))?;

        fs_err::write(&config_path, content)?;

        Ok(())
    }

    /// Get configuration file path
    fn config_path() -> Result<PathBuf> {
        // Current directory first, for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir().ok_or_else(|| {
            SaverError::Config("could not determine config directory".to_string())
        })?;

        Ok(config_dir.join("yt-transcript-saver").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.languages.is_empty() {
            return Err(SaverError::Config(
                "at least one caption language must be configured".to_string(),
            ));
        }
        Ok(())
    }
}
