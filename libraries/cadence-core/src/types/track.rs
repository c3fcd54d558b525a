/// Track domain type
use crate::types::TrackId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playable catalog entry
///
/// Tracks are reference data owned by the catalog. Playback code reads them
/// but never writes back into them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Artwork reference (URL or storage key)
    #[serde(default)]
    pub artwork: Option<String>,

    /// Playable source locator handed to the audio engine
    pub source: String,

    /// Human readable duration as published by the backend (e.g. "3:45")
    #[serde(default)]
    pub duration: String,

    /// Whether playback requires the premium entitlement
    #[serde(default)]
    pub premium: bool,
}

impl Track {
    /// Create a new non-premium track with minimal metadata
    pub fn new(
        id: impl Into<TrackId>,
        title: impl Into<String>,
        artist: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            artwork: None,
            source: source.into(),
            duration: String::new(),
            premium: false,
        }
    }

    /// Builder-style premium flag
    pub fn with_premium(mut self, premium: bool) -> Self {
        self.premium = premium;
        self
    }

    /// Builder-style published duration string
    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }

    /// Builder-style artwork reference
    pub fn with_artwork(mut self, artwork: impl Into<String>) -> Self {
        self.artwork = Some(artwork.into());
        self
    }

    /// Parse the published duration string
    ///
    /// Accepts `m:ss` and `h:mm:ss`. Returns `None` for empty or malformed
    /// strings.
    pub fn published_duration(&self) -> Option<Duration> {
        parse_duration(&self.duration)
    }
}

/// Parse a `m:ss` or `h:mm:ss` duration string
pub fn parse_duration(text: &str) -> Option<Duration> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let mut total: u64 = 0;
    let mut parts = 0;
    for part in text.split(':') {
        let value: u64 = part.parse().ok()?;
        if parts > 0 && value >= 60 {
            return None;
        }
        total = total.checked_mul(60)?.checked_add(value)?;
        parts += 1;
    }

    if !(2..=3).contains(&parts) {
        return None;
    }

    Some(Duration::from_secs(total))
}

/// Format a duration the way the catalog publishes it (`m:ss` or `h:mm:ss`)
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minutes_seconds() {
        assert_eq!(parse_duration("3:45"), Some(Duration::from_secs(225)));
        assert_eq!(parse_duration("0:07"), Some(Duration::from_secs(7)));
        assert_eq!(parse_duration("1:02:03"), Some(Duration::from_secs(3723)));
    }

    #[test]
    fn parse_rejects_malformed() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("225"), None);
        assert_eq!(parse_duration("3:75"), None);
        assert_eq!(parse_duration("a:bc"), None);
        assert_eq!(parse_duration("1:2:3:4"), None);
    }

    #[test]
    fn format_matches_catalog_style() {
        assert_eq!(format_duration(Duration::from_secs(225)), "3:45");
        assert_eq!(format_duration(Duration::from_secs(7)), "0:07");
        assert_eq!(format_duration(Duration::from_secs(3723)), "1:02:03");
        assert_eq!(format_duration(Duration::from_millis(225_900)), "3:45");
    }

    #[test]
    fn track_builder() {
        let track = Track::new("1", "Song", "Artist", "https://cdn/1.mp3")
            .with_premium(true)
            .with_duration("2:30")
            .with_artwork("covers/1.jpg");

        assert!(track.premium);
        assert_eq!(track.published_duration(), Some(Duration::from_secs(150)));
        assert_eq!(track.artwork.as_deref(), Some("covers/1.jpg"));
    }
}
