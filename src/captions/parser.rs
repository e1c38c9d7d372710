use std::sync::OnceLock;

use regex::Regex;

use super::CaptionEntry;

fn start_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"start="([^"]*)""#).ok()).as_ref()
}

fn dur_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"dur="([^"]*)""#).ok()).as_ref()
}

/// Parse YouTube's timedtext XML into caption entries.
///
/// The format is a flat list of `<text start=".." dur="..">..</text>`
/// elements. We slice on the tags directly rather than pulling in a
/// full XML parser; malformed elements are skipped.
pub fn parse_timedtext(xml: &str) -> Vec<CaptionEntry> {
    let mut entries = Vec::new();

    for part in xml.split("<text").skip(1) {
        let Some(attrs_end) = part.find('>') else {
            continue;
        };
        let Some(text_end) = part[attrs_end..].find("</text>") else {
            continue;
        };

        let attrs = &part[..attrs_end];
        let raw_text = &part[attrs_end + 1..attrs_end + text_end];

        let start = capture_f64(start_re(), attrs).unwrap_or(0.0);
        let duration = capture_f64(dur_re(), attrs).unwrap_or(0.0);

        entries.push(CaptionEntry {
            text: decode_entities(&strip_markup(raw_text)),
            start,
            duration,
        });
    }

    entries
}

fn capture_f64(re: Option<&Regex>, attrs: &str) -> Option<f64> {
    re?.captures(attrs)?.get(1)?.as_str().parse().ok()
}

/// Drop inline markup such as `<i>` and `<b>` that auto-generated
/// tracks sometimes carry.
fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn decode_entities(text: &str) -> String {
    let mut result = text.to_string();

    let entities = [
        ("&amp;", "&"),
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&quot;", "\""),
        ("&#39;", "'"),
        ("&apos;", "'"),
        ("&nbsp;", " "),
    ];

    for (entity, replacement) in entities.iter() {
        result = result.replace(entity, replacement);
    }

    result
}
