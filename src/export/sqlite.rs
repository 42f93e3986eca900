// SQLite export
//
// Two tables: one MusicFile row per indexed file and one Tag row per
// (name, value) pair. All rows of a run share one ParsedOn timestamp and are
// written in a single transaction.

use std::fs;
use std::path::Path;

use rusqlite::{params, Connection, Transaction};
use tracing::{debug, info};

use crate::aggregate::FileTagIndex;
use crate::error::ExportError;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS MusicFile (
    Id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
    Filename TEXT NOT NULL,
    ParsedOn INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS Tag (
    Id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
    MusicFileId INTEGER NOT NULL REFERENCES MusicFile(Id),
    TagName TEXT NOT NULL,
    TagValue TEXT NOT NULL,
    ParsedOn INTEGER NOT NULL
);
";

const INSERT_MUSIC_FILE: &str = "INSERT INTO MusicFile (Filename, ParsedOn) VALUES (?1, ?2)";

const INSERT_TAG: &str =
    "INSERT INTO Tag (MusicFileId, TagName, TagValue, ParsedOn) VALUES (?1, ?2, ?3, ?4)";

fn open(path: &Path) -> Result<Connection, ExportError> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

/// Replace any database at `path` with an empty one holding the schema
pub fn create_database(path: &Path) -> Result<(), ExportError> {
    if path.exists() {
        fs::remove_file(path).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    }

    let mut conn = open(path)?;
    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA)?;
    tx.commit()?;

    info!(path = %path.display(), "created database");
    Ok(())
}

/// Append `index` to the database at `path`, stamped with the current time.
///
/// Returns the number of rows inserted.
pub fn export_sqlite(index: &FileTagIndex, path: &Path) -> Result<usize, ExportError> {
    export_sqlite_at(index, path, chrono::Utc::now().timestamp())
}

/// As [`export_sqlite`], with an explicit `ParsedOn` (Unix seconds)
pub fn export_sqlite_at(index: &FileTagIndex, path: &Path, parsed_on: i64) -> Result<usize, ExportError> {
    let mut conn = open(path)?;

    // Dropping an uncommitted transaction rolls it back
    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA)?;
    let rows = write_rows(&tx, index, parsed_on)?;
    tx.commit()?;

    info!(path = %path.display(), rows, "wrote SQLite rows");
    Ok(rows)
}

fn write_rows(tx: &Transaction<'_>, index: &FileTagIndex, parsed_on: i64) -> Result<usize, ExportError> {
    let mut insert_file = tx.prepare(INSERT_MUSIC_FILE)?;
    let mut insert_tag = tx.prepare(INSERT_TAG)?;
    let mut rows = 0;

    for (filename, tags) in index.iter() {
        rows += insert_file.execute(params![filename, parsed_on])?;
        let music_file_id = tx.last_insert_rowid();

        for (name, value) in tags.pairs() {
            rows += insert_tag.execute(params![music_file_id, name, value, parsed_on])?;
        }
        debug!(file = %filename, music_file_id, "inserted");
    }

    Ok(rows)
}
