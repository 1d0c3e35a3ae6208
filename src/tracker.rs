//! Target tracking: a per-line state machine over make's debug trace.

use crate::patterns::{self, TargetPatterns};
use crate::types::{Report, Verdict};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Which target, if any, make is currently considering.
#[derive(Debug, Clone)]
pub enum State {
    Idle,
    Considering {
        patterns: TargetPatterns,
        /// Set on entry. Carried along but never consulted for verdicts.
        analysing: bool,
    },
}

impl State {
    /// Advance by one line. Returns the next state and, for a "must remake"
    /// line about the current target, that target's name.
    ///
    /// Priority: consider, then no-implicit-rule, then must-remake. Lines
    /// matching nothing, or arriving while idle, leave the state untouched.
    pub fn step(self, line: &str) -> (State, Option<String>) {
        if let Some(m) = patterns::consider(line) {
            debug!("considering '{}' ({})", m.target, m.locale);
            let next = State::Considering {
                patterns: TargetPatterns::new(m.target),
                analysing: true,
            };
            return (next, None);
        }

        match self {
            State::Idle => (State::Idle, None),
            State::Considering {
                patterns,
                analysing,
            } => {
                if let Some(m) = patterns.no_implicit_rule(line) {
                    debug!("no implicit rule for '{}' ({})", m.target, m.locale);
                    return (State::Idle, None);
                }
                let remake = patterns.must_remake(line).map(|m| {
                    debug!("must remake '{}' ({})", m.target, m.locale);
                    m.target.to_string()
                });
                (
                    State::Considering {
                        patterns,
                        analysing,
                    },
                    remake,
                )
            }
        }
    }

    pub fn current(&self) -> Option<&str> {
        match self {
            State::Idle => None,
            State::Considering { patterns, .. } => Some(patterns.target()),
        }
    }

    pub fn is_analysing(&self) -> bool {
        matches!(self, State::Considering { analysing: true, .. })
    }
}

/// Consumes diagnostic lines in order and records one verdict per distinct
/// target that make says must be remade.
#[derive(Debug)]
pub struct Tracker {
    root: PathBuf,
    state: State,
    seen: HashSet<String>,
    verdicts: Vec<Verdict>,
}

impl Tracker {
    /// Existence checks resolve target names against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            state: State::Idle,
            seen: HashSet::new(),
            verdicts: Vec::new(),
        }
    }

    /// Feed one line. Returns the verdict if this line produced a new one.
    pub fn feed(&mut self, line: &str) -> Option<&Verdict> {
        let state = std::mem::replace(&mut self.state, State::Idle);
        let (next, remake) = state.step(line);
        self.state = next;
        match remake {
            Some(target) => self.record(target),
            None => None,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn finish(self) -> Report {
        Report {
            verdicts: self.verdicts,
        }
    }

    fn record(&mut self, target: String) -> Option<&Verdict> {
        if !self.seen.insert(target.clone()) {
            debug!("'{}' already classified", target);
            return None;
        }
        let verdict = classify(&self.root, target);
        match &verdict {
            Verdict::Missing(t) => info!("must remake {}: file is missing", t),
            Verdict::Present(t) => info!("target {} already there", t),
            Verdict::Phony(t) => debug!("target {} has no extension, treating as phony", t),
        }
        self.verdicts.push(verdict);
        self.verdicts.last()
    }
}

/// Extensionless names are phony goals; the rest are missing unless on disk.
fn classify(root: &Path, target: String) -> Verdict {
    let has_extension = Path::new(&target)
        .extension()
        .is_some_and(|ext| !ext.is_empty());
    if !has_extension {
        Verdict::Phony(target)
    } else if root.join(&target).exists() {
        Verdict::Present(target)
    } else {
        Verdict::Missing(target)
    }
}
