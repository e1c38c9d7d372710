//! Thin client for YouTube's caption ("timedtext") endpoints.
//!
//! YouTube does not publish an official captions API; like the widely
//! used transcript libraries, we pull the InnerTube player payload for
//! a video and read the caption track list out of it, then fetch the
//! tracks' timedtext URLs directly.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use serde_json::Value;
use url::Url;

use crate::{Result, SaverError};

pub mod parser;

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";
const INNERTUBE_API_URL: &str = "https://www.youtube.com/youtubei/v1/player?key=";

/// One caption track offered by the provider.
#[derive(Debug, Clone)]
pub struct CaptionTrack {
    pub language_code: String,
    pub language: String,
    pub is_generated: bool,
    pub is_translatable: bool,
    pub base_url: String,
    pub translation_languages: Vec<TranslationLanguage>,
}

#[derive(Debug, Clone)]
pub struct TranslationLanguage {
    pub language: String,
    pub language_code: String,
}

/// All caption tracks for a video, in provider order.
#[derive(Debug, Clone)]
pub struct TrackList {
    pub video_id: String,
    pub tracks: Vec<CaptionTrack>,
}

/// A single caption fragment with its timing.
#[derive(Debug, Clone)]
pub struct CaptionEntry {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

impl CaptionTrack {
    /// Derive a track that fetches this one translated to `target`.
    ///
    /// Translation happens server side via the `tlang` query parameter;
    /// any previously applied translation is replaced.
    pub fn translate(&self, target: &str) -> Result<CaptionTrack> {
        if !self.is_translatable {
            return Err(SaverError::TranslationFailed(
                self.language_code.clone(),
                target.to_string(),
            ));
        }

        let target_language = self
            .translation_languages
            .iter()
            .find(|l| l.language_code == target)
            .map(|l| l.language.clone())
            .ok_or_else(|| {
                SaverError::TranslationFailed(self.language_code.clone(), target.to_string())
            })?;

        let mut url = Url::parse(&self.base_url).map_err(|_| {
            SaverError::TranslationFailed(self.language_code.clone(), target.to_string())
        })?;

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != "tlang")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(pairs)
            .append_pair("tlang", target);

        Ok(CaptionTrack {
            language_code: target.to_string(),
            language: target_language,
            is_generated: true,
            is_translatable: self.is_translatable,
            base_url: url.into(),
            translation_languages: self.translation_languages.clone(),
        })
    }
}

impl TrackList {
    /// Find the track for a language code, preferring manual captions
    /// over auto-generated ones.
    pub fn find(&self, language_code: &str) -> Option<&CaptionTrack> {
        self.tracks
            .iter()
            .find(|t| t.language_code == language_code && !t.is_generated)
            .or_else(|| self.tracks.iter().find(|t| t.language_code == language_code))
    }
}

/// Client for listing and fetching caption tracks.
pub struct CaptionsClient {
    client: reqwest::Client,
    request_delay: Duration,
}

impl CaptionsClient {
    pub fn new(request_delay_ms: u64) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("en-US"),
        );

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            request_delay: Duration::from_millis(request_delay_ms),
        })
    }

    /// List every caption track the provider advertises for a video.
    pub async fn list_tracks(&self, video_id: &str) -> Result<TrackList> {
        let html = self.fetch_watch_html(video_id).await?;
        let api_key = extract_api_key(&html, video_id)?;

        self.pause().await;
        let player_data = self.fetch_player_data(video_id, &api_key).await?;

        extract_track_list(video_id, &player_data)
    }

    /// Convenience fetch: list tracks and fetch the first match for
    /// `language_code` in one call.
    pub async fn fetch_by_language(
        &self,
        video_id: &str,
        language_code: &str,
    ) -> Result<Vec<CaptionEntry>> {
        let track_list = self.list_tracks(video_id).await?;
        let track = track_list
            .find(language_code)
            .ok_or_else(|| SaverError::TrackNotFound(language_code.to_string()))?;

        self.fetch_track(track).await
    }

    /// Fetch and parse the timedtext document for a single track.
    pub async fn fetch_track(&self, track: &CaptionTrack) -> Result<Vec<CaptionEntry>> {
        self.pause().await;

        let response = self.client.get(&track.base_url).send().await?;
        let response = check_status(response, &track.language_code)?;
        let xml = response.text().await?;

        Ok(parser::parse_timedtext(&xml))
    }

    async fn fetch_watch_html(&self, video_id: &str) -> Result<String> {
        self.pause().await;

        let url = format!("{}{}", WATCH_URL, video_id);
        let response = self.client.get(&url).send().await?;
        let response = check_status(response, video_id)?;
        let html = response.text().await?;

        if !requires_consent(&html) {
            return Ok(html);
        }

        // EU consent wall. The cookie store picked up the consent
        // redirect cookies, so a single retry normally gets through.
        tracing::debug!("consent page detected for {}, retrying once", video_id);
        self.pause().await;

        let response = self.client.get(&url).send().await?;
        let response = check_status(response, video_id)?;
        let html = response.text().await?;

        if requires_consent(&html) {
            return Err(SaverError::RequestBlocked(video_id.to_string()));
        }

        Ok(html)
    }

    async fn fetch_player_data(&self, video_id: &str, api_key: &str) -> Result<Value> {
        let url = format!("{}{}", INNERTUBE_API_URL, api_key);

        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": "20.10.38"
                }
            },
            "videoId": video_id
        });

        let response = self.client.post(&url).json(&body).send().await?;
        let response = check_status(response, video_id)?;

        Ok(response.json().await?)
    }

    async fn pause(&self) {
        tokio::time::sleep(self.request_delay).await;
    }
}

fn requires_consent(html: &str) -> bool {
    html.contains("action=\"https://consent.youtube.com/s\"")
}

fn check_status(response: reqwest::Response, subject: &str) -> Result<reqwest::Response> {
    if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(SaverError::RequestBlocked(subject.to_string()));
    }
    Ok(response.error_for_status()?)
}

fn api_key_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).ok())
        .as_ref()
}

fn extract_api_key(html: &str, video_id: &str) -> Result<String> {
    if html.contains("class=\"g-recaptcha\"") {
        return Err(SaverError::RequestBlocked(video_id.to_string()));
    }

    let re = api_key_re().ok_or_else(|| SaverError::Unparsable(video_id.to_string()))?;

    re.captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| SaverError::Unparsable(video_id.to_string()))
}

/// Map the player payload's playability status to structured errors.
fn check_playability(video_id: &str, player_data: &Value) -> Result<()> {
    let Some(playability) = player_data.get("playabilityStatus") else {
        return Ok(());
    };

    let status = playability
        .get("status")
        .and_then(|s| s.as_str())
        .unwrap_or("");

    if status == "OK" {
        return Ok(());
    }

    let reason = playability
        .get("reason")
        .and_then(|r| r.as_str())
        .unwrap_or("");

    match status {
        "LOGIN_REQUIRED" => {
            if reason.contains("not a bot") {
                return Err(SaverError::RequestBlocked(video_id.to_string()));
            }
            if reason.contains("inappropriate for some users") {
                return Err(SaverError::AgeRestricted(video_id.to_string()));
            }
        }
        "ERROR" => {
            if reason.contains("unavailable") {
                return Err(SaverError::VideoUnavailable(video_id.to_string()));
            }
        }
        _ => {}
    }

    Err(SaverError::VideoUnplayable(
        video_id.to_string(),
        reason.to_string(),
    ))
}

/// Pull the caption track list out of an InnerTube player payload.
fn extract_track_list(video_id: &str, player_data: &Value) -> Result<TrackList> {
    check_playability(video_id, player_data)?;

    let renderer = player_data
        .pointer("/captions/playerCaptionsTracklistRenderer")
        .ok_or_else(|| SaverError::CaptionsDisabled(video_id.to_string()))?;

    let translation_languages: Vec<TranslationLanguage> = renderer
        .get("translationLanguages")
        .and_then(|tl| tl.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|lang| {
                    Some(TranslationLanguage {
                        language_code: lang.get("languageCode")?.as_str()?.to_string(),
                        language: lang
                            .pointer("/languageName/runs/0/text")?
                            .as_str()?
                            .to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let mut tracks = Vec::new();

    if let Some(caption_tracks) = renderer.get("captionTracks").and_then(|ct| ct.as_array()) {
        for caption in caption_tracks {
            let Some(language_code) = caption.get("languageCode").and_then(|l| l.as_str()) else {
                continue;
            };
            let Some(base_url) = caption.get("baseUrl").and_then(|u| u.as_str()) else {
                continue;
            };

            let language = caption
                .pointer("/name/runs/0/text")
                .and_then(|t| t.as_str())
                .unwrap_or(language_code)
                .to_string();

            let is_generated = caption
                .get("kind")
                .and_then(|k| k.as_str())
                .map(|k| k == "asr")
                .unwrap_or(false);

            let is_translatable = caption
                .get("isTranslatable")
                .and_then(|t| t.as_bool())
                .unwrap_or(false);

            tracks.push(CaptionTrack {
                language_code: language_code.to_string(),
                language,
                is_generated,
                is_translatable,
                base_url: base_url.replace("&fmt=srv3", ""),
                translation_languages: if is_translatable {
                    translation_languages.clone()
                } else {
                    Vec::new()
                },
            });
        }
    }

    if tracks.is_empty() {
        return Err(SaverError::CaptionsDisabled(video_id.to_string()));
    }

    Ok(TrackList {
        video_id: video_id.to_string(),
        tracks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_track(code: &str, generated: bool, translatable: bool) -> CaptionTrack {
        CaptionTrack {
            language_code: code.to_string(),
            language: code.to_uppercase(),
            is_generated: generated,
            is_translatable: translatable,
            base_url: format!("https://www.youtube.com/api/timedtext?v=test&lang={}", code),
            translation_languages: vec![
                TranslationLanguage {
                    language: "English".to_string(),
                    language_code: "en".to_string(),
                },
                TranslationLanguage {
                    language: "Hindi".to_string(),
                    language_code: "hi".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_find_prefers_manual_over_generated() {
        let list = TrackList {
            video_id: "test".to_string(),
            tracks: vec![sample_track("en", true, true), sample_track("en", false, true)],
        };

        let found = list.find("en").unwrap();
        assert!(!found.is_generated);
    }

    #[test]
    fn test_find_falls_back_to_generated() {
        let list = TrackList {
            video_id: "test".to_string(),
            tracks: vec![sample_track("hi", true, true)],
        };

        assert!(list.find("hi").unwrap().is_generated);
        assert!(list.find("fr").is_none());
    }

    #[test]
    fn test_translate_appends_tlang() {
        let track = sample_track("en", true, true);
        let translated = track.translate("hi").unwrap();

        assert_eq!(translated.language_code, "hi");
        assert_eq!(translated.language, "Hindi");
        assert!(translated.base_url.contains("tlang=hi"));
    }

    #[test]
    fn test_translate_replaces_existing_tlang() {
        let track = sample_track("hi", true, true);
        let double = track.translate("en").unwrap().translate("hi").unwrap();

        assert!(double.base_url.contains("tlang=hi"));
        assert!(!double.base_url.contains("tlang=en"));
    }

    #[test]
    fn test_translate_rejects_untranslatable_track() {
        let track = sample_track("en", false, false);
        assert!(matches!(
            track.translate("hi"),
            Err(SaverError::TranslationFailed(..))
        ));
    }

    #[test]
    fn test_translate_rejects_unknown_target() {
        let track = sample_track("en", true, true);
        assert!(matches!(
            track.translate("xx"),
            Err(SaverError::TranslationFailed(..))
        ));
    }

    #[test]
    fn test_extract_track_list_from_player_payload() {
        let payload = serde_json::json!({
            "playabilityStatus": { "status": "OK" },
            "captions": {
                "playerCaptionsTracklistRenderer": {
                    "captionTracks": [
                        {
                            "baseUrl": "https://www.youtube.com/api/timedtext?v=abc&lang=en&fmt=srv3",
                            "languageCode": "en",
                            "name": { "runs": [ { "text": "English" } ] },
                            "isTranslatable": true
                        },
                        {
                            "baseUrl": "https://www.youtube.com/api/timedtext?v=abc&lang=hi",
                            "languageCode": "hi",
                            "name": { "runs": [ { "text": "Hindi" } ] },
                            "kind": "asr",
                            "isTranslatable": false
                        }
                    ],
                    "translationLanguages": [
                        {
                            "languageCode": "hi",
                            "languageName": { "runs": [ { "text": "Hindi" } ] }
                        }
                    ]
                }
            }
        });

        let list = extract_track_list("abc", &payload).unwrap();
        assert_eq!(list.tracks.len(), 2);

        let en = &list.tracks[0];
        assert_eq!(en.language, "English");
        assert!(!en.is_generated);
        assert!(!en.base_url.contains("fmt=srv3"));
        assert_eq!(en.translation_languages.len(), 1);

        let hi = &list.tracks[1];
        assert!(hi.is_generated);
        assert!(hi.translation_languages.is_empty());
    }

    #[test]
    fn test_extract_track_list_without_captions_renderer() {
        let payload = serde_json::json!({
            "playabilityStatus": { "status": "OK" }
        });

        assert!(matches!(
            extract_track_list("abc", &payload),
            Err(SaverError::CaptionsDisabled(_))
        ));
    }

    #[test]
    fn test_playability_unavailable_video() {
        let payload = serde_json::json!({
            "playabilityStatus": {
                "status": "ERROR",
                "reason": "Video unavailable"
            }
        });

        assert!(matches!(
            extract_track_list("abc", &payload),
            Err(SaverError::VideoUnavailable(_))
        ));
    }

    #[test]
    fn test_playability_age_restricted() {
        let payload = serde_json::json!({
            "playabilityStatus": {
                "status": "LOGIN_REQUIRED",
                "reason": "This video may be inappropriate for some users."
            }
        });

        assert!(matches!(
            extract_track_list("abc", &payload),
            Err(SaverError::AgeRestricted(_))
        ));
    }

    #[test]
    fn test_extract_api_key() {
        let html = r#"<script>var cfg = {"INNERTUBE_API_KEY": "AIzaSyTest_Key-123"};</script>"#;
        assert_eq!(extract_api_key(html, "abc").unwrap(), "AIzaSyTest_Key-123");
    }

    #[test]
    fn test_extract_api_key_missing() {
        assert!(matches!(
            extract_api_key("<html></html>", "abc"),
            Err(SaverError::Unparsable(_))
        ));
    }
}
