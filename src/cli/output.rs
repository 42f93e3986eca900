// Output formatting for CLI

use tagfold::{JsonOutcome, RunSummary};

/// Terminal messages, silenced by `--quiet` except for errors
pub struct OutputFormatter {
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Print success message
    pub fn print_success(&self, message: &str) {
        if !self.quiet {
            println!("✓ {}", message);
        }
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }

    /// Print info message
    pub fn print_info(&self, message: &str) {
        if !self.quiet {
            println!("  {}", message);
        }
    }

    /// Report the outcome of a scan
    pub fn print_summary(&self, summary: &RunSummary) {
        let stats = &summary.stats;
        self.print_info(&format!(
            "{} candidate files, {} tagged, {} skipped",
            stats.candidates, stats.tagged, stats.skipped
        ));

        match &summary.json {
            None => self.print_info("No tagged files; nothing exported"),
            Some(JsonOutcome::Written(path)) => {
                self.print_success(&format!("Wrote {}", path.display()))
            }
            Some(JsonOutcome::Skipped(path)) => self.print_info(&format!(
                "Kept existing {} (use --overwrite to replace)",
                path.display()
            )),
        }

        if summary.json.is_some() {
            self.print_success(&format!("Inserted {} database rows", summary.rows));
        }
    }
}
