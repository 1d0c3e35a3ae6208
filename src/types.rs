//! Core types for missing-target detection.

use std::path::{Path, PathBuf};

/// How make is invoked for one dry-run check, and where its targets live.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Build tool executable, looked up on `PATH` when not absolute.
    pub make: String,

    /// Flags requesting always-make, debug tracing and just-print.
    /// GNU make: `-B -d -n`.
    pub flags: Vec<String>,

    /// Directory make changes into (`-C`). Target paths are checked relative to it.
    pub directory: Option<PathBuf>,

    /// Makefile to read instead of the default lookup (`-f`).
    pub makefile: Option<PathBuf>,

    /// Goals passed through to make; empty means the default goal.
    pub goals: Vec<String>,

    /// Prefix the invocation with `echo` so nothing is executed.
    pub dry_run: bool,
}

impl CheckConfig {
    /// Config for GNU make in the current directory.
    pub fn gnu_make() -> Self {
        Self {
            make: "make".to_string(),
            flags: vec!["-B".to_string(), "-d".to_string(), "-n".to_string()],
            directory: None,
            makefile: None,
            goals: Vec::new(),
            dry_run: false,
        }
    }

    /// Root against which target names are checked for existence.
    pub fn root(&self) -> &Path {
        self.directory.as_deref().unwrap_or_else(|| Path::new("."))
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self::gnu_make()
    }
}

/// Outcome for one distinct target that make said must be remade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// No file on disk and the name has an extension.
    Missing(String),
    /// The file already exists.
    Present(String),
    /// No extension, assumed to be a phony goal whatever the filesystem says.
    Phony(String),
}

impl Verdict {
    pub fn target(&self) -> &str {
        match self {
            Verdict::Missing(t) | Verdict::Present(t) | Verdict::Phony(t) => t,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Verdict::Missing(_))
    }
}

/// Exit code when the build tool could not be run at all.
pub const INVOCATION_FAILED: i32 = 255;

/// Summary of a finished run, verdicts in the order make reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub verdicts: Vec<Verdict>,
}

impl Report {
    /// Names of the missing targets, in report order.
    pub fn missing(&self) -> Vec<&str> {
        self.verdicts
            .iter()
            .filter(|v| v.is_missing())
            .map(Verdict::target)
            .collect()
    }

    pub fn missing_count(&self) -> usize {
        self.verdicts.iter().filter(|v| v.is_missing()).count()
    }

    /// Process exit code: the missing count, clamped to 254.
    ///
    /// 255 is reserved for [`INVOCATION_FAILED`], so a failed run never
    /// looks like a large missing count.
    pub fn exit_code(&self) -> i32 {
        self.missing_count().min(254) as i32
    }
}
