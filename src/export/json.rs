// JSON document export

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::aggregate::FileTagIndex;
use crate::error::ExportError;

/// Output layout for the JSON document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// Indented, one value per line
    #[default]
    Pretty,
    /// Single line
    Compact,
}

/// What the JSON export did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonOutcome {
    Written(PathBuf),
    /// Target existed and overwrite was not requested
    Skipped(PathBuf),
}

/// `<output_dir>/<name>.json`
pub fn json_output_path(output_dir: &Path, name: &str) -> PathBuf {
    output_dir.join(format!("{}.json", name))
}

/// Serialize `index` to `<output_dir>/<name>.json`, creating `output_dir` as
/// needed.
///
/// An existing file is replaced only when `overwrite` is set; otherwise the
/// export is skipped without error.
pub fn export_json(
    index: &FileTagIndex,
    output_dir: &Path,
    name: &str,
    overwrite: bool,
    style: JsonStyle,
) -> Result<JsonOutcome, ExportError> {
    let path = json_output_path(output_dir, name);
    if path.exists() && !overwrite {
        info!(path = %path.display(), "JSON output exists, skipping (use --overwrite to replace)");
        return Ok(JsonOutcome::Skipped(path));
    }

    let document = match style {
        JsonStyle::Pretty => serde_json::to_vec_pretty(index)?,
        JsonStyle::Compact => serde_json::to_vec(index)?,
    };

    fs::create_dir_all(output_dir).map_err(|source| ExportError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;
    fs::write(&path, document).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), files = index.len(), "wrote JSON");
    Ok(JsonOutcome::Written(path))
}
