//! Track catalog
//!
//! The catalog is the read-only list of playable tracks. Playback code holds it
//! behind `Arc<dyn TrackCatalog>` and never mutates it.

use crate::error::{CoreError, Result};
use crate::types::{Track, TrackId};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Read-only, ordered track catalog
///
/// Catalog order is the default traversal order used when a single track is
/// played outside of an explicit playlist.
pub trait TrackCatalog: Send + Sync {
    /// All tracks in catalog order
    fn all(&self) -> &[Track];

    /// Position of a track in catalog order
    fn index_of(&self, id: &TrackId) -> Option<usize> {
        self.all().iter().position(|track| &track.id == id)
    }

    /// Look up a track by id
    fn find_by_id(&self, id: &TrackId) -> Option<&Track> {
        self.index_of(id).and_then(|index| self.all().get(index))
    }

    /// Track at a catalog position
    fn get(&self, index: usize) -> Option<&Track> {
        self.all().get(index)
    }

    /// Number of tracks
    fn len(&self) -> usize {
        self.all().len()
    }

    /// Whether the catalog has no tracks
    fn is_empty(&self) -> bool {
        self.all().is_empty()
    }
}

/// In-memory catalog with an id index
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    tracks: Vec<Track>,
    index: HashMap<TrackId, usize>,
}

/// On-disk catalog layout (`[[tracks]]` in TOML, `{"tracks": [...]}` in JSON)
#[derive(Debug, Deserialize)]
struct CatalogFile {
    tracks: Vec<Track>,
}

impl StaticCatalog {
    /// Build a catalog, rejecting duplicate ids
    pub fn new(tracks: Vec<Track>) -> Result<Self> {
        let mut index = HashMap::with_capacity(tracks.len());
        for (i, track) in tracks.iter().enumerate() {
            if index.insert(track.id.clone(), i).is_some() {
                return Err(CoreError::DuplicateTrack(track.id.clone()));
            }
        }

        Ok(Self { tracks, index })
    }

    /// Parse a JSON catalog document
    pub fn from_json(text: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(text)?;
        Self::new(file.tracks)
    }

    /// Parse a TOML catalog document
    pub fn from_toml(text: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(text)?;
        Self::new(file.tracks)
    }

    /// Load a catalog file, choosing the format from the extension
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&text),
            Some("toml") => Self::from_toml(&text),
            other => Err(CoreError::invalid_input(format!(
                "unsupported catalog format: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }

    /// Track ids in catalog order
    pub fn ids(&self) -> Vec<TrackId> {
        self.tracks.iter().map(|t| t.id.clone()).collect()
    }
}

impl TrackCatalog for StaticCatalog {
    fn all(&self) -> &[Track] {
        &self.tracks
    }

    fn index_of(&self, id: &TrackId) -> Option<usize> {
        self.index.get(id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tracks() -> Vec<Track> {
        vec![
            Track::new("a", "Alpha", "One", "a.mp3"),
            Track::new("b", "Beta", "Two", "b.mp3").with_premium(true),
            Track::new("c", "Gamma", "One", "c.mp3"),
        ]
    }

    #[test]
    fn lookup_by_id_and_index() {
        let catalog = StaticCatalog::new(sample_tracks()).unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.index_of(&TrackId::from("c")), Some(2));
        assert_eq!(catalog.index_of(&TrackId::from("zz")), None);
        assert_eq!(
            catalog.find_by_id(&TrackId::from("b")).map(|t| t.premium),
            Some(true)
        );
        assert_eq!(catalog.get(0).map(|t| t.title.as_str()), Some("Alpha"));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let mut tracks = sample_tracks();
        tracks.push(Track::new("a", "Again", "Three", "a2.mp3"));

        let err = StaticCatalog::new(tracks).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateTrack(id) if id.as_str() == "a"));
    }

    #[test]
    fn parse_toml_catalog() {
        let text = r#"
            [[tracks]]
            id = "1"
            title = "First"
            artist = "Someone"
            source = "https://cdn.example/1.mp3"
            duration = "3:10"

            [[tracks]]
            id = "2"
            title = "Second"
            artist = "Someone Else"
            source = "https://cdn.example/2.mp3"
            premium = true
        "#;

        let catalog = StaticCatalog::from_toml(text).unwrap();
        assert_eq!(catalog.ids(), vec![TrackId::from("1"), TrackId::from("2")]);
        assert!(catalog.all()[1].premium);
        assert!(catalog.all()[1].duration.is_empty());
    }

    #[test]
    fn parse_json_catalog() {
        let text = r#"{"tracks": [
            {"id": "x", "title": "X", "artist": "Y", "source": "x.ogg", "artwork": "x.jpg"}
        ]}"#;

        let catalog = StaticCatalog::from_json(text).unwrap();
        assert_eq!(catalog.all()[0].artwork.as_deref(), Some("x.jpg"));
        assert!(!catalog.all()[0].premium);
    }

    #[test]
    fn default_methods_agree_with_index() {
        struct Plain(Vec<Track>);
        impl TrackCatalog for Plain {
            fn all(&self) -> &[Track] {
                &self.0
            }
        }

        let plain = Plain(sample_tracks());
        let indexed = StaticCatalog::new(sample_tracks()).unwrap();
        for track in indexed.all() {
            assert_eq!(plain.index_of(&track.id), indexed.index_of(&track.id));
        }
        assert!(!plain.is_empty());
    }
}
