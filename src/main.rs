// CLI binary entry point for tagfold

mod cli;

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Config, OutputFormatter};

fn main() {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let formatter = OutputFormatter::new(config.quiet);
    if let Err(e) = cli::run(&config, &formatter) {
        formatter.print_error(&format!("{:#}", e));
        process::exit(1);
    }
}
