// CLI command implementations
use std::path::Path;

use anyhow::{Context, Result};
use tagfold::{parse_library, FileDecoder, ScanOptions, TagDictionary};

use super::config::{Commands, Config};
use super::output::OutputFormatter;

/// Run the selected subcommand
pub fn run(config: &Config, formatter: &OutputFormatter) -> Result<()> {
    match &config.command {
        Commands::Scan {
            input_dir,
            json_dir,
            db,
            overwrite,
            format,
        } => {
            let options = ScanOptions {
                input_dir: input_dir.clone(),
                json_dir: json_dir.clone(),
                db_path: db.clone(),
                overwrite: *overwrite,
                json_style: (*format).into(),
            };
            command_scan(&options, formatter)
        }
        Commands::InitDb { db } => command_init_db(db, formatter),
    }
}

/// Scan a directory and export its tags
fn command_scan(options: &ScanOptions, formatter: &OutputFormatter) -> Result<()> {
    let dict = TagDictionary::standard();
    let summary = parse_library(options, &FileDecoder, &dict)
        .with_context(|| format!("Failed to scan {}", options.input_dir.display()))?;

    formatter.print_summary(&summary);
    Ok(())
}

/// Create a fresh database
fn command_init_db(db: &Path, formatter: &OutputFormatter) -> Result<()> {
    tagfold::export::create_database(db)
        .with_context(|| format!("Failed to create database {}", db.display()))?;

    formatter.print_success(&format!("Created {}", db.display()));
    Ok(())
}
