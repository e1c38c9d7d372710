//! Transcript negotiation: pick a track and fetch it, cascading over an
//! ordered list of strategies until one succeeds.

use async_trait::async_trait;

use crate::captions::{CaptionEntry, CaptionTrack, CaptionsClient, TrackList};
use crate::{Result, SaverError};

/// The concatenated transcript text plus the language it was actually
/// fetched in. Never empty on success.
#[derive(Debug, Clone)]
pub struct TranscriptResult {
    pub text: String,
    pub language_code: String,
}

/// Restrict a track list to the configured language codes, keeping
/// provider order.
pub fn supported_tracks<'a>(list: &'a TrackList, languages: &[String]) -> Vec<&'a CaptionTrack> {
    list.tracks
        .iter()
        .filter(|t| languages.iter().any(|l| l == &t.language_code))
        .collect()
}

/// One way of obtaining caption entries for a language.
#[async_trait]
trait FetchStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn attempt(
        &self,
        client: &CaptionsClient,
        list: &TrackList,
        language_code: &str,
    ) -> Result<Vec<CaptionEntry>>;
}

/// Strategy 1: the provider's convenience fetch-by-language call.
struct DirectFetch;

#[async_trait]
impl FetchStrategy for DirectFetch {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn attempt(
        &self,
        client: &CaptionsClient,
        list: &TrackList,
        language_code: &str,
    ) -> Result<Vec<CaptionEntry>> {
        client.fetch_by_language(&list.video_id, language_code).await
    }
}

/// Strategy 2: fetch through the track object from the already-listed
/// set, detouring through translation for auto-generated non-English
/// tracks.
struct TrackFallback;

#[async_trait]
impl FetchStrategy for TrackFallback {
    fn name(&self) -> &'static str {
        "track-fallback"
    }

    async fn attempt(
        &self,
        client: &CaptionsClient,
        list: &TrackList,
        language_code: &str,
    ) -> Result<Vec<CaptionEntry>> {
        let track = list
            .find(language_code)
            .ok_or_else(|| SaverError::TrackNotFound(language_code.to_string()))?;

        client.fetch_track(&fallback_track(track, language_code)).await
    }
}

/// Decide which track the fallback strategy fetches.
///
/// Auto-generated non-English tracks sometimes fail a direct translated
/// fetch but succeed when routed through English first. Translation
/// errors are swallowed and the fetch falls back to the untranslated
/// track.
fn fallback_track(track: &CaptionTrack, language_code: &str) -> CaptionTrack {
    if track.is_generated && language_code != "en" {
        match track.translate("en").and_then(|t| t.translate(language_code)) {
            Ok(translated) => translated,
            Err(err) => {
                tracing::debug!("translation detour failed, using original track: {}", err);
                track.clone()
            }
        }
    } else {
        track.clone()
    }
}

/// Fetch the transcript for `language_code`, trying each strategy in
/// order; the first success wins.
pub async fn fetch_transcript(
    client: &CaptionsClient,
    list: &TrackList,
    language_code: &str,
) -> Result<TranscriptResult> {
    let strategies: [&dyn FetchStrategy; 2] = [&DirectFetch, &TrackFallback];

    let mut last_error = SaverError::TrackNotFound(language_code.to_string());

    for strategy in strategies {
        match strategy.attempt(client, list, language_code).await {
            Ok(entries) => {
                tracing::debug!("strategy '{}' succeeded for {}", strategy.name(), language_code);
                return aggregate(&entries, language_code);
            }
            Err(err) => {
                tracing::debug!("strategy '{}' failed: {}", strategy.name(), err);
                last_error = err;
            }
        }
    }

    Err(last_error)
}

/// Normalize fetched entries into the final result. An empty aggregate
/// is a failure, not an empty transcript.
fn aggregate(entries: &[CaptionEntry], language_code: &str) -> Result<TranscriptResult> {
    let text = collect_text(entries);
    if text.is_empty() {
        return Err(SaverError::EmptyTranscript(language_code.to_string()));
    }

    Ok(TranscriptResult {
        text,
        language_code: language_code.to_string(),
    })
}

/// Join caption fragments into a single string: trim each fragment,
/// drop empties, separate with single spaces.
fn collect_text(entries: &[CaptionEntry]) -> String {
    entries
        .iter()
        .map(|e| e.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
