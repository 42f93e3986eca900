// Exporters for a finished FileTagIndex
//
// The JSON and SQLite exports are independent side effects; a storage
// failure does not undo a JSON file that was already written.

pub mod json;
pub mod sqlite;

pub use json::{export_json, json_output_path, JsonOutcome, JsonStyle};
pub use sqlite::{create_database, export_sqlite, export_sqlite_at};
