use std::io::{self, Write};
use std::sync::OnceLock;

use regex::Regex;

fn video_id_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})").ok())
        .as_ref()
}

/// Extract the 11-character video id from a YouTube URL.
///
/// Handles `youtube.com` watch/embed URLs via pattern matching and
/// `youtu.be` short links by taking the final path segment. Anything
/// else (including parse failures) yields `None` rather than an error.
pub fn extract_video_id(url: &str) -> Option<String> {
    if url.contains("youtube.com") {
        video_id_re()?
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    } else if url.contains("youtu.be") {
        let tail = url.rsplit('/').next()?;
        let id = tail.split('?').next()?;
        if id.is_empty() {
            None
        } else {
            Some(id.to_string())
        }
    } else {
        None
    }
}

/// Print `label` and read one trimmed line from stdin.
///
/// Read errors collapse to an empty string, which every prompt in the
/// shell treats as "go back".
pub fn prompt_line(label: &str) -> String {
    print!("{}", label);
    let _ = io::stdout().flush();

    let mut buf = String::new();
    if io::stdin().read_line(&mut buf).is_err() {
        return String::new();
    }
    buf.trim().to_string()
}

/// Ask a yes/no question. Anything starting with `y` (case-insensitive)
/// counts as yes.
pub fn prompt_yes_no(label: &str) -> bool {
    prompt_line(label).to_lowercase().starts_with('y')
}

/// Parse a 1-based selection against a list of `len` options.
pub fn parse_selection(input: &str, len: usize) -> Option<usize> {
    match input.parse::<usize>() {
        Ok(n) if n >= 1 && n <= len => Some(n - 1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_extract_video_id_watch_url_with_extra_params() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s&list=PL123"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_extract_video_id_embed_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_extract_video_id_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_extract_video_id_short_url_strips_query() {
        assert_eq!(
            extract_video_id("https://youtu.be/_NuH3D4SN-c?t=30"),
            Some("_NuH3D4SN-c".to_string())
        );
    }

    #[test]
    fn test_extract_video_id_other_host_fails() {
        assert_eq!(extract_video_id("https://example.com/watch?v=dQw4w9WgXcQ"), None);
        assert_eq!(extract_video_id("not a url at all"), None);
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("1", 3), Some(0));
        assert_eq!(parse_selection("3", 3), Some(2));
        assert_eq!(parse_selection("0", 3), None);
        assert_eq!(parse_selection("4", 3), None);
        assert_eq!(parse_selection("abc", 3), None);
        assert_eq!(parse_selection("", 3), None);
    }
}
