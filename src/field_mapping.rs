// Canonical tag dictionary
//
// Maps format-specific field identifiers onto one canonical vocabulary:
// - ID3v2: Frame IDs (TIT2, TPE1, TALB, etc.)
// - FLAC/OGG: Vorbis Comment keys (TITLE, ARTIST, ALBUM, etc.)
//
// Identifiers missing from the table pass through unchanged. The table is
// built once and shared by reference; nothing mutates it during a run.

use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Canonical tag names
pub mod canonical {
    pub const TRACK_NUMBER: &str = "TrackNumber";
    pub const GENRE: &str = "Genre";
    pub const TITLE: &str = "Title";
    pub const ARTIST: &str = "Artist";
    pub const ALBUM_ARTIST: &str = "AlbumArtist";
    pub const ALBUM: &str = "Album";
    pub const DATE: &str = "Date";
    pub const COMMENT: &str = "Comment";
    pub const ARTWORK: &str = "Artwork";
    pub const ENCODED_BY: &str = "EncodedBy";
    pub const COMPOSED_BY: &str = "ComposedBy";
}

/// ID3v2 frame IDs and their canonical names
const ID3V2_NAMES: &[(&str, &str)] = &[
    ("TRCK", canonical::TRACK_NUMBER),
    ("TCON", canonical::GENRE),
    ("TIT2", canonical::TITLE),
    ("TPE1", canonical::ARTIST),
    ("TPE2", canonical::ALBUM_ARTIST),
    ("TALB", canonical::ALBUM),
    ("TDRC", canonical::DATE),
    ("TYER", canonical::DATE), // ID3v2.3 year
    ("COMM", canonical::COMMENT),
    ("APIC", canonical::ARTWORK),
    ("TENC", canonical::ENCODED_BY),
    ("TCOM", canonical::COMPOSED_BY),
];

/// Vorbis comment keys (upper-cased) and their canonical names
const VORBIS_NAMES: &[(&str, &str)] = &[
    ("TRACKNUMBER", canonical::TRACK_NUMBER),
    ("GENRE", canonical::GENRE),
    ("TITLE", canonical::TITLE),
    ("ARTIST", canonical::ARTIST),
    ("ALBUMARTIST", canonical::ALBUM_ARTIST),
    ("ALBUM", canonical::ALBUM),
    ("DATE", canonical::DATE),
    ("COMMENT", canonical::COMMENT),
    ("ENCODEDBY", canonical::ENCODED_BY),
    ("ENCODED-BY", canonical::ENCODED_BY),
    ("COMPOSER", canonical::COMPOSED_BY),
];

/// Frames that never reach the canonical map: comments are routinely
/// duplicated and private frames are opaque binary
const SUPPRESSED: &[&str] = &["COMM", "PRIV"];

/// File extensions scanned, compared case-insensitively
const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "flac", "wav", "ogg", "opus"];

/// Immutable lookup tables shared by the normalizer and aggregator
#[derive(Debug, Clone)]
pub struct TagDictionary {
    names: HashMap<String, String>,
    suppressed: HashSet<String>,
    extensions: HashSet<String>,
}

impl TagDictionary {
    /// The built-in vocabulary
    pub fn standard() -> Self {
        let names = ID3V2_NAMES
            .iter()
            .chain(VORBIS_NAMES)
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect();

        TagDictionary {
            names,
            suppressed: SUPPRESSED.iter().map(|s| s.to_string()).collect(),
            extensions: SUPPORTED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// An empty dictionary: no mappings, no suppression, no extensions
    pub fn empty() -> Self {
        TagDictionary {
            names: HashMap::new(),
            suppressed: HashSet::new(),
            extensions: HashSet::new(),
        }
    }

    /// Add or replace one identifier mapping
    pub fn with_mapping(mut self, identifier: &str, canonical_name: &str) -> Self {
        self.names.insert(identifier.to_string(), canonical_name.to_string());
        self
    }

    /// Add an identifier to the suppression set
    pub fn with_suppressed(mut self, identifier: &str) -> Self {
        self.suppressed.insert(identifier.to_string());
        self
    }

    /// Allow another file extension (without the dot)
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extensions.insert(extension.to_ascii_lowercase());
        self
    }

    /// Canonical name for `identifier`, or the identifier itself when unmapped
    pub fn canonical_name_of<'a>(&'a self, identifier: &'a str) -> &'a str {
        self.names.get(identifier).map(String::as_str).unwrap_or(identifier)
    }

    pub fn is_suppressed(&self, identifier: &str) -> bool {
        self.suppressed.contains(identifier)
    }

    /// Whether the path's extension is on the allow-list (case-insensitive)
    pub fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.contains(&ext.to_ascii_lowercase()))
    }
}

impl Default for TagDictionary {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_mappings() {
        let dict = TagDictionary::standard();
        assert_eq!(dict.canonical_name_of("TIT2"), "Title");
        assert_eq!(dict.canonical_name_of("TPE2"), "AlbumArtist");
        assert_eq!(dict.canonical_name_of("TCOM"), "ComposedBy");
        assert_eq!(dict.canonical_name_of("GENRE"), "Genre");
        assert_eq!(dict.canonical_name_of("ENCODED-BY"), "EncodedBy");
    }

    #[test]
    fn test_unknown_identifier_passes_through() {
        let dict = TagDictionary::standard();
        assert_eq!(dict.canonical_name_of("TBPM"), "TBPM");
        assert_eq!(dict.canonical_name_of("REPLAYGAIN_TRACK_GAIN"), "REPLAYGAIN_TRACK_GAIN");
    }

    #[test]
    fn test_suppression_is_independent_of_mapping() {
        let dict = TagDictionary::standard();
        // Mapped and suppressed
        assert!(dict.is_suppressed("COMM"));
        assert_eq!(dict.canonical_name_of("COMM"), "Comment");
        // Unmapped and suppressed
        assert!(dict.is_suppressed("PRIV"));
        assert_eq!(dict.canonical_name_of("PRIV"), "PRIV");
        assert!(!dict.is_suppressed("TIT2"));
    }

    #[test]
    fn test_extension_filter_is_case_insensitive() {
        let dict = TagDictionary::standard();
        assert!(dict.is_supported(Path::new("/music/a.mp3")));
        assert!(dict.is_supported(Path::new("/music/b.FLAC")));
        assert!(dict.is_supported(Path::new("c.Wav")));
        assert!(!dict.is_supported(Path::new("cover.jpg")));
        assert!(!dict.is_supported(Path::new("README")));
    }

    #[test]
    fn test_builder() {
        let dict = TagDictionary::empty()
            .with_mapping("XYZ", "Custom")
            .with_suppressed("TIT2")
            .with_extension("M4A");
        assert_eq!(dict.canonical_name_of("XYZ"), "Custom");
        assert!(dict.is_suppressed("TIT2"));
        assert!(dict.is_supported(Path::new("x.m4a")));
    }
}
