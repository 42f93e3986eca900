// tagfold: read the tags of every audio file in a directory, fold them into
// one canonical vocabulary, and export the result as a JSON document and as
// rows in a SQLite database.

pub mod aggregate;
pub mod decoder;
pub mod error;
pub mod export;
pub mod field_mapping;
pub mod flac;
pub mod id3;
pub mod normalize;
pub mod ogg;
pub mod utils;
pub mod wav;

use std::path::{Path, PathBuf};

use tracing::info;

pub use aggregate::{FileTagIndex, ScanStats};
pub use decoder::{DecodedTags, FileDecoder, TagDecoder};
pub use error::{DecodeError, Error, ExportError, Result};
pub use export::{JsonOutcome, JsonStyle};
pub use field_mapping::TagDictionary;
pub use normalize::TagMap;

/// Inputs of one library scan
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Directory whose files are scanned (not recursively)
    pub input_dir: PathBuf,
    /// Directory receiving `<input dir name>.json`
    pub json_dir: PathBuf,
    /// SQLite database, created if missing
    pub db_path: PathBuf,
    /// Replace an existing JSON document
    pub overwrite: bool,
    pub json_style: JsonStyle,
}

/// What a scan did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub stats: ScanStats,
    /// `None` when nothing was tagged and no export ran
    pub json: Option<JsonOutcome>,
    /// Rows inserted into the database
    pub rows: usize,
}

/// Scan `options.input_dir`, then export the tags of every readable file.
///
/// Files that fail to decode are skipped. If no file yields tags, neither
/// export runs. The JSON export happens first and is not undone when the
/// database export fails.
pub fn parse_library(
    options: &ScanOptions,
    decoder: &dyn TagDecoder,
    dict: &TagDictionary,
) -> Result<RunSummary> {
    let paths = aggregate::candidate_files(&options.input_dir, dict)?;
    info!(dir = %options.input_dir.display(), candidates = paths.len(), "scanning");

    let (index, stats) = aggregate::collect(&paths, decoder, dict);
    if index.is_empty() {
        info!("no tagged files, nothing to export");
        return Ok(RunSummary {
            stats,
            json: None,
            rows: 0,
        });
    }

    let name = library_name(&options.input_dir);
    let json = export::export_json(
        &index,
        &options.json_dir,
        &name,
        options.overwrite,
        options.json_style,
    )?;
    let rows = export::export_sqlite(&index, &options.db_path)?;

    Ok(RunSummary {
        stats,
        json: Some(json),
        rows,
    })
}

/// Final component of the input directory, resolving `.` and `..` first
pub fn library_name(dir: &Path) -> String {
    if let Some(name) = dir.file_name() {
        return name.to_string_lossy().into_owned();
    }
    dir.canonicalize()
        .ok()
        .and_then(|abs| abs.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "library".to_string())
}
