// Aggregator: decode and normalize every candidate file of a directory.
//
// Collection is best-effort. A file that cannot be decoded is logged and
// left out of the index; it never fails the run.

use std::path::{Path, PathBuf};

use glob::{glob_with, MatchOptions, Pattern};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, info, warn};

use crate::decoder::TagDecoder;
use crate::error::{Error, Result};
use crate::field_mapping::TagDictionary;
use crate::normalize::{normalize, TagMap};

/// Filename to canonical tags, in aggregation order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileTagIndex {
    entries: Vec<(String, TagMap)>,
}

impl FileTagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file's tags. Returns `false` and keeps the existing entry when
    /// the filename is already present.
    pub fn insert(&mut self, filename: String, tags: TagMap) -> bool {
        if self.get(&filename).is_some() {
            return false;
        }
        self.entries.push((filename, tags));
        true
    }

    pub fn get(&self, filename: &str) -> Option<&TagMap> {
        self.entries
            .iter()
            .find(|(name, _)| name == filename)
            .map(|(_, tags)| tags)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagMap)> {
        self.entries.iter().map(|(name, tags)| (name.as_str(), tags))
    }

    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for FileTagIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, tags) in &self.entries {
            map.serialize_entry(name, tags)?;
        }
        map.end()
    }
}

/// Counters for one collection pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub candidates: usize,
    pub tagged: usize,
    pub skipped: usize,
}

/// Supported files directly inside `dir`, sorted by path.
///
/// Subdirectories are not descended into.
pub fn candidate_files(dir: &Path, dict: &TagDictionary) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::Enumerate {
            path: dir.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    let pattern = format!("{}/*", Pattern::escape(&dir.to_string_lossy()));
    let options = MatchOptions {
        require_literal_leading_dot: false,
        ..MatchOptions::new()
    };
    let entries = glob_with(&pattern, options).map_err(|e| Error::Enumerate {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() && dict.is_supported(&path) => files.push(path),
            Ok(path) => debug!(path = %path.display(), "not a candidate"),
            Err(e) => warn!("Error reading path: {}", e),
        }
    }
    files.sort();
    Ok(files)
}

/// Decode and normalize `paths` in order, skipping files that fail.
pub fn collect(
    paths: &[PathBuf],
    decoder: &dyn TagDecoder,
    dict: &TagDictionary,
) -> (FileTagIndex, ScanStats) {
    let mut index = FileTagIndex::new();
    let mut stats = ScanStats {
        candidates: paths.len(),
        ..ScanStats::default()
    };

    for path in paths {
        let Some(filename) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            warn!(path = %path.display(), "skipping path without a file name");
            stats.skipped += 1;
            continue;
        };

        let tags = decoder
            .decode(path)
            .and_then(|decoded| normalize(&decoded, dict));

        match tags {
            Ok(Some(tags)) => {
                debug!(file = %filename, tags = tags.len(), "normalized");
                if index.insert(filename.clone(), tags) {
                    stats.tagged += 1;
                } else {
                    warn!(file = %filename, "duplicate filename, keeping first entry");
                    stats.skipped += 1;
                }
            }
            Ok(None) => {
                debug!(file = %filename, "no Vorbis comment or ID3v2 tag");
                stats.skipped += 1;
            }
            Err(e) => {
                warn!(file = %filename, error = %e, "skipping file");
                stats.skipped += 1;
            }
        }
    }

    info!(
        candidates = stats.candidates,
        tagged = stats.tagged,
        skipped = stats.skipped,
        "collection finished"
    );
    (index, stats)
}
