// Tag normalizer
//
// Converts one file's raw tags into a TagMap: canonical tag name to the
// ordered list of values found in the file. Both paths keep encounter order
// and never deduplicate values.

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use crate::decoder::DecodedTags;
use crate::error::DecodeError;
use crate::field_mapping::TagDictionary;
use crate::flac::VorbisComment;
use crate::id3::{frame_ids, Id3Frame};

/// Ordered multi-map from canonical tag name to values.
///
/// Keys keep first-insertion order, values keep push order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TagMap {
    entries: Vec<(String, Vec<String>)>,
}

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` under `name`, creating the key on first use
    pub fn push(&mut self, name: &str, value: String) {
        match self.entries.iter_mut().find(|(key, _)| key == name) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((name.to_string(), vec![value])),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, values)| values.as_slice())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Tag names in first-seen order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Every (name, value) pair, one per value
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |v| (key.as_str(), v.as_str())))
    }

    /// Number of distinct tag names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>> FromIterator<(K, String)> for TagMap {
    fn from_iter<I: IntoIterator<Item = (K, String)>>(iter: I) -> Self {
        let mut map = TagMap::new();
        for (name, value) in iter {
            map.push(name.as_ref(), value);
        }
        map
    }
}

// Single values still serialize as arrays
impl Serialize for TagMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, values) in &self.entries {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}

/// Normalize whichever tag format the decoder produced.
///
/// Returns `Ok(None)` for [`DecodedTags::Unsupported`].
pub fn normalize(tags: &DecodedTags, dict: &TagDictionary) -> Result<Option<TagMap>, DecodeError> {
    match tags {
        DecodedTags::Vorbis(comment) => Ok(Some(normalize_vorbis(comment, dict))),
        DecodedTags::Id3v2(frames) => normalize_id3v2(frames, dict).map(Some),
        DecodedTags::Unsupported => Ok(None),
    }
}

/// Vorbis comments: each field name is upper-cased and mapped onto its
/// canonical name, and values are appended in stored order.
pub fn normalize_vorbis(comment: &VorbisComment, dict: &TagDictionary) -> TagMap {
    let mut map = TagMap::new();
    for (field, value) in &comment.comments {
        let field = field.to_ascii_uppercase();
        if field.is_empty() || dict.is_suppressed(&field) {
            continue;
        }
        let name = dict.canonical_name_of(&field);
        if dict.is_suppressed(name) {
            continue;
        }
        map.push(name, value.clone());
    }
    map
}

/// ID3v2 frames, in decoder order.
///
/// Suppressed frames are skipped before rendering. A frame that fails to
/// render fails the whole file; a `TXXX` frame without a `[label]` prefix is
/// dropped on its own.
pub fn normalize_id3v2(frames: &[Id3Frame], dict: &TagDictionary) -> Result<TagMap, DecodeError> {
    let mut pairs: Vec<(String, String)> = Vec::with_capacity(frames.len());

    for frame in frames {
        let id = frame.id();
        if dict.is_suppressed(id) {
            continue;
        }

        let rendered = frame.render()?;

        if id == frame_ids::USER_TEXT {
            let Some((label, value)) = split_user_text(&rendered) else {
                debug!(text = %rendered, "dropping TXXX frame without a [label] prefix");
                continue;
            };
            let name = dict.canonical_name_of(label);
            if dict.is_suppressed(label) || dict.is_suppressed(name) {
                continue;
            }
            pairs.push((name.to_string(), value.to_string()));
        } else {
            let name = dict.canonical_name_of(id);
            // A custom mapping may target a suppressed name
            if dict.is_suppressed(name) {
                continue;
            }
            pairs.push((name.to_string(), rendered));
        }
    }

    Ok(pairs.into_iter().collect())
}

/// Split rendered `TXXX` text of the form `[label] value`.
///
/// The label runs from the first `[` to the first `]` after it; the value is
/// everything after the `]` and one separator character. Returns `None` when
/// the brackets are missing, the label is empty, or no separator follows.
pub fn split_user_text(rendered: &str) -> Option<(&str, &str)> {
    let open = rendered.find('[')?;
    let close = open + rendered[open..].find(']')?;
    let label = &rendered[open + 1..close];
    if label.is_empty() {
        return None;
    }

    let mut rest = rendered[close + 1..].chars();
    rest.next()?;
    Some((label, rest.as_str()))
}
