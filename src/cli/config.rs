// CLI configuration
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use tagfold::JsonStyle;

/// tagfold - fold audio file tags into JSON and SQLite
#[derive(Parser, Debug)]
#[command(name = "tagfold")]
#[command(about = "Normalize ID3v2 and Vorbis comment tags of a music directory into JSON and SQLite", long_about = None)]
#[command(version)]
pub struct Config {
    /// Quiet mode (warnings and errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (log every file)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a directory and export its tags
    Scan {
        /// Directory holding the audio files (not searched recursively)
        #[arg(value_name = "INPUT_DIR")]
        input_dir: PathBuf,

        /// Directory for the JSON document, named after INPUT_DIR
        #[arg(long, value_name = "DIR")]
        json_dir: PathBuf,

        /// SQLite database to append to (created if missing)
        #[arg(long, value_name = "FILE")]
        db: PathBuf,

        /// Replace an existing JSON document
        #[arg(long)]
        overwrite: bool,

        /// JSON layout
        #[arg(short, long, value_enum, default_value = "pretty")]
        format: OutputFormat,
    },

    /// Create an empty database, replacing any existing file
    InitDb {
        /// Database path
        #[arg(value_name = "FILE")]
        db: PathBuf,
    },
}

/// JSON document layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Indented JSON
    #[default]
    Pretty,
    /// Single-line JSON
    Compact,
}

impl From<OutputFormat> for JsonStyle {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Pretty => JsonStyle::Pretty,
            OutputFormat::Compact => JsonStyle::Compact,
        }
    }
}

impl Config {
    /// Default log filter when `RUST_LOG` is unset
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Config::command().debug_assert();
    }

    #[test]
    fn test_parse_scan() {
        let config = Config::parse_from([
            "tagfold", "-v", "scan", "/music/Album", "--json-dir", "/out", "--db", "lib.sqlite", "--format", "compact",
        ]);
        assert!(config.verbose);
        assert_eq!(config.log_level(), "debug");
        match config.command {
            Commands::Scan {
                input_dir,
                overwrite,
                format,
                ..
            } => {
                assert_eq!(input_dir, PathBuf::from("/music/Album"));
                assert!(!overwrite);
                assert_eq!(JsonStyle::from(format), JsonStyle::Compact);
            }
            other => panic!("expected scan, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_requires_outputs() {
        assert!(Config::try_parse_from(["tagfold", "scan", "/music"]).is_err());
    }

    #[test]
    fn test_quiet_after_subcommand() {
        let config = Config::parse_from(["tagfold", "init-db", "lib.sqlite", "--quiet"]);
        assert_eq!(config.log_level(), "warn");
    }
}
