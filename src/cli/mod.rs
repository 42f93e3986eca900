// CLI module for tagfold
//
// Argument parsing, command dispatch and terminal output for the binary.
// The library crate does all tag and export work.

pub mod commands;
pub mod config;
pub mod output;

pub use commands::run;
pub use config::Config;
pub use output::OutputFormatter;
