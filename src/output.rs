//! Result presentation
//!
//! Human summaries on a terminal, plain prefixes when piped, one JSON
//! document in `--json` mode.

use is_terminal::IsTerminal;

use crate::orchestrator::{BatchOutcome, StagingResult};

/// Prints staging outcomes to stdout/stderr
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    json: bool,
    decorated: bool,
}

impl Reporter {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            decorated: std::io::stdout().is_terminal(),
        }
    }

    #[cfg(test)]
    fn plain(json: bool) -> Self {
        Self {
            json,
            decorated: false,
        }
    }

    pub fn staging_result(&self, result: &StagingResult) {
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
            );
            return;
        }

        if result.success {
            println!("{} {}", self.ok_mark(), result.message);
        } else {
            println!("{} {}", self.fail_mark(), result.message);
        }
        if !result.aspects_included.is_empty() {
            println!("  aspects: {}", result.aspects_included.join(", "));
        }
        for path in &result.files_saved {
            println!("  file: {}", path.display());
        }
    }

    pub fn batch_outcome(&self, outcome: &BatchOutcome) {
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
            );
            return;
        }

        println!(
            "{} {} staged, {} failed",
            if outcome.all_succeeded() {
                self.ok_mark()
            } else {
                self.fail_mark()
            },
            outcome.succeeded,
            outcome.failed
        );
        for error in &outcome.errors {
            println!("  [{}] {}: {}", error.index, error.entity, error.message);
        }
        for result in outcome.results.iter().filter(|r| r.success) {
            for path in &result.files_saved {
                println!("  file: {}", path.display());
            }
        }
    }

    /// Error line on stderr; used for validation failures before any result
    /// exists.
    pub fn error(&self, message: &str) {
        if self.json {
            eprintln!(
                "{}",
                serde_json::json!({"success": false, "error": message})
            );
        } else {
            eprintln!("{} {message}", self.fail_mark());
        }
    }

    fn ok_mark(&self) -> &'static str {
        if self.decorated {
            "✓"
        } else {
            "ok:"
        }
    }

    fn fail_mark(&self) -> &'static str {
        if self.decorated {
            "❌"
        } else {
            "error:"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_depend_on_decoration() {
        let plain = Reporter::plain(false);
        assert_eq!(plain.ok_mark(), "ok:");
        assert_eq!(plain.fail_mark(), "error:");

        let decorated = Reporter {
            json: false,
            decorated: true,
        };
        assert_eq!(decorated.ok_mark(), "✓");
        assert_eq!(decorated.fail_mark(), "❌");
    }
}
