//! Apple Music URL classification.
//!
//! Decides whether a pasted string is a downloadable Apple Music link and,
//! if so, what kind of resource it points to. Valid links have the shape
//! `https://music.apple.com/{storefront}/{type}/{name}/{id}`.

mod content_type;

pub use content_type::ContentType;

use serde::{Deserialize, Serialize};
use url::Url;

/// Result of classifying one input string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlClassification {
    /// The exact input text.
    pub raw: String,
    /// True iff the input matches the Apple Music URL shape.
    pub is_valid: bool,
    /// Kind derived from the type path segment; `Unknown` iff `is_valid` is false.
    pub content_type: ContentType,
}

/// Classifies `raw` as an Apple Music URL.
///
/// Accepts any input, including empty and partial strings, and never fails:
/// everything that does not match the required shape comes back as
/// `is_valid = false` with `content_type = Unknown`. Cheap enough to call on
/// every keystroke.
///
/// The storefront segment is deliberately not checked against a country
/// list, and query strings (`?i=...` on track links) are allowed.
pub fn classify(raw: &str) -> UrlClassification {
    let content_type = match content_type_of(raw) {
        Some(t) => t,
        None => ContentType::Unknown,
    };
    UrlClassification {
        raw: raw.to_string(),
        is_valid: content_type != ContentType::Unknown,
        content_type,
    }
}

/// Structural check: https scheme, bare `music.apple.com` host, and exactly
/// four non-empty path segments with a recognized type in the second slot.
fn content_type_of(raw: &str) -> Option<ContentType> {
    let parsed = Url::parse(raw).ok()?;
    if parsed.scheme() != "https" {
        return None;
    }
    if parsed.host_str() != Some("music.apple.com") {
        return None;
    }
    if parsed.port().is_some() || !parsed.username().is_empty() || parsed.password().is_some() {
        return None;
    }

    let mut segments = parsed.path_segments()?.filter(|s| !s.is_empty());
    let _storefront = segments.next()?;
    let type_segment = segments.next()?;
    let _name = segments.next()?;
    let _id = segments.next()?;
    if segments.next().is_some() {
        return None;
    }

    ContentType::from_segment(type_segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid(raw: &str) {
        let c = classify(raw);
        assert!(!c.is_valid, "expected invalid: {raw:?}");
        assert_eq!(c.content_type, ContentType::Unknown, "for input {raw:?}");
        assert_eq!(c.raw, raw);
    }

    #[test]
    fn all_known_type_segments_classify() {
        for (segment, expected) in [
            ("song", ContentType::Song),
            ("album", ContentType::Album),
            ("playlist", ContentType::Playlist),
            ("music-video", ContentType::MusicVideo),
            ("artist", ContentType::Artist),
        ] {
            let raw = format!("https://music.apple.com/us/{segment}/name/123");
            let c = classify(&raw);
            assert!(c.is_valid, "expected valid: {raw}");
            assert_eq!(c.content_type, expected);
        }
    }

    #[test]
    fn real_album_link() {
        let c = classify("https://music.apple.com/us/album/Random-Access-Memories/123456");
        assert!(c.is_valid);
        assert_eq!(c.content_type, ContentType::Album);
    }

    #[test]
    fn empty_and_garbage_input() {
        invalid("");
        invalid("   ");
        invalid("not a url");
        invalid("music.apple.com/us/album/x/1");
    }

    #[test]
    fn wrong_scheme_or_host() {
        invalid("http://music.apple.com/us/album/x/1");
        invalid("https://music.apple.com.evil.com/us/album/x/1");
        invalid("https://itunes.apple.com/us/album/x/1");
        invalid("https://www.music.apple.com/us/album/x/1");
    }

    #[test]
    fn unrecognized_type_segment_is_invalid() {
        invalid("https://music.apple.com/us/podcast/name/123");
        invalid("https://music.apple.com/us/station/name/123");
    }

    #[test]
    fn wrong_segment_count_is_invalid() {
        invalid("https://music.apple.com");
        invalid("https://music.apple.com/us");
        invalid("https://music.apple.com/us/album");
        invalid("https://music.apple.com/us/album/name");
        invalid("https://music.apple.com/us/album/name/123/extra");
    }

    #[test]
    fn port_or_userinfo_is_invalid() {
        invalid("https://music.apple.com:8080/us/album/x/1");
        invalid("https://user@music.apple.com/us/album/x/1");
    }

    #[test]
    fn query_and_fragment_are_allowed() {
        let c = classify("https://music.apple.com/us/album/name/123?i=456");
        assert!(c.is_valid);
        assert_eq!(c.content_type, ContentType::Album);
        let c = classify("https://music.apple.com/us/song/name/123#top");
        assert!(c.is_valid);
        assert_eq!(c.content_type, ContentType::Song);
    }

    #[test]
    fn storefront_is_permissive() {
        assert!(classify("https://music.apple.com/jp/song/x/1").is_valid);
        assert!(classify("https://music.apple.com/not-a-storefront/song/x/1").is_valid);
    }

    #[test]
    fn trailing_slash_is_tolerated() {
        let c = classify("https://music.apple.com/us/album/name/123/");
        assert!(c.is_valid);
        assert_eq!(c.content_type, ContentType::Album);
    }
}
