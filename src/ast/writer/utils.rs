use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use pulldown_cmark::Alignment;
use url::{ParseError, Url};

/// Characters escaped in relative references. `%` is left alone so already
/// escaped input passes through unchanged.
const RELATIVE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Normalise a link or image destination by parsing and re-serialising it.
/// Absolute URLs go through the `url` crate; relative references only get
/// unsafe characters percent-encoded. Input that does not parse is returned
/// unchanged.
pub fn escape_destination(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(url) => serialize_absolute(&url, raw),
        Err(ParseError::RelativeUrlWithoutBase) => utf8_percent_encode(raw, RELATIVE).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// `url` always serialises an authority URL with at least a `/` path; drop
/// it again when `raw` had no path.
fn serialize_absolute(url: &Url, raw: &str) -> String {
    let mut out = url.to_string();
    if url.has_authority() && url.path() == "/" && !has_root_path(raw) {
        let at = out.find(['?', '#']).unwrap_or(out.len());
        if out[..at].ends_with('/') {
            out.remove(at - 1);
        }
    }
    out
}

fn has_root_path(raw: &str) -> bool {
    raw.split_once("://")
        .and_then(|(_, rest)| rest.chars().find(|c| matches!(c, '/' | '\\' | '?' | '#')))
        .is_some_and(|c| c == '/' || c == '\\')
}

/// Upper-cased PukiWiki alignment keyword, `None` when unaligned.
pub fn alignment_label(align: Alignment) -> Option<&'static str> {
    match align {
        Alignment::None => None,
        Alignment::Left => Some("LEFT"),
        Alignment::Center => Some("CENTER"),
        Alignment::Right => Some("RIGHT"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_urls_are_normalised() {
        assert_eq!(
            escape_destination("http://example.com/a b"),
            "http://example.com/a%20b"
        );
        assert_eq!(
            escape_destination("HTTPS://Example.COM/x?q=1#top"),
            "https://example.com/x?q=1#top"
        );
    }

    #[test]
    fn bare_hosts_get_no_extra_slash() {
        assert_eq!(escape_destination("https://example.com"), "https://example.com");
        assert_eq!(escape_destination("https://example.com/"), "https://example.com/");
        assert_eq!(
            escape_destination("https://example.com?q=a b#top"),
            "https://example.com?q=a%20b#top"
        );
        assert_eq!(escape_destination("mailto:me@example.com"), "mailto:me@example.com");
    }

    #[test]
    fn relative_references_are_percent_encoded() {
        assert_eq!(escape_destination("img/a b.png"), "img/a%20b.png");
        assert_eq!(escape_destination("#anchor"), "#anchor");
        assert_eq!(escape_destination("a%20b"), "a%20b");
        assert_eq!(escape_destination("日本.png"), "%E6%97%A5%E6%9C%AC.png");
    }

    #[test]
    fn unparsable_input_is_returned_unchanged() {
        assert_eq!(escape_destination("http://[::1"), "http://[::1");
        assert_eq!(escape_destination(""), "");
    }

    #[test]
    fn alignment_labels() {
        assert_eq!(alignment_label(Alignment::None), None);
        assert_eq!(alignment_label(Alignment::Left), Some("LEFT"));
        assert_eq!(alignment_label(Alignment::Center), Some("CENTER"));
        assert_eq!(alignment_label(Alignment::Right), Some("RIGHT"));
    }
}
