//! Find Makefile targets that make would remake but whose files are missing.

mod driver;
mod patterns;
mod tracker;
mod types;

pub use driver::{Capture, InvocationError, command_line, make_args};
pub use patterns::{LocaleMatch, TargetPatterns, consider, must_remake, no_implicit_rule};
pub use tracker::{State, Tracker};
pub use types::{CheckConfig, INVOCATION_FAILED, Report, Verdict};

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, trace};

/// Classify a make debug trace line by line.
///
/// Lines are trimmed before classification; make indents nested
/// considerations. Existence checks resolve against `root`.
pub fn analyse<'a>(lines: impl IntoIterator<Item = &'a str>, root: &Path) -> Report {
    let mut tracker = Tracker::new(root);
    for line in lines {
        let line = line.trim();
        trace!("{}", line);
        tracker.feed(line);
    }
    tracker.finish()
}

/// Run make in dry-run debug mode and print the missing targets.
///
/// Returns the report; callers turn it into an exit code with
/// [`Report::exit_code`].
pub fn run(config: &CheckConfig) -> Result<Report> {
    info!("checking {} for missing targets", config.root().display());

    let capture = driver::run(config).with_context(|| format!("could not run {}", config.make))?;
    if config.dry_run {
        println!("{}", capture.stdout.trim_end());
    }

    let report = analyse(capture.lines(), config.root());
    for target in report.missing() {
        println!("  Missing: {}", target);
    }

    let n = report.missing_count();
    if n > 0 {
        println!("\n{} target(s) missing", n);
    } else {
        println!("All targets present \u{2713}");
    }

    Ok(report)
}
