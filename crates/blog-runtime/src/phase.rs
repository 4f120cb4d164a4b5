//! Page load phases
//!
//! A page load runs `NotStarted -> Eager -> Lazy -> Delayed -> Done`, each
//! phase finishing before the next begins. `Delayed` only schedules the
//! delayed work; the load is `Done` without waiting for it.

use crate::error::{RuntimeError, RuntimeResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of a page load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadPhase {
    /// Nothing done yet
    #[default]
    NotStarted,
    /// Decoration up to the largest contentful paint
    Eager,
    /// Block loading, taxonomy and everything depending on it
    Lazy,
    /// Delayed work scheduled
    Delayed,
    /// Load finished
    Done,
}

impl LoadPhase {
    /// Phases in load order
    pub const ORDER: [LoadPhase; 5] = [
        LoadPhase::NotStarted,
        LoadPhase::Eager,
        LoadPhase::Lazy,
        LoadPhase::Delayed,
        LoadPhase::Done,
    ];

    /// Name used in logs and reports
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            LoadPhase::NotStarted => "not-started",
            LoadPhase::Eager => "eager",
            LoadPhase::Lazy => "lazy",
            LoadPhase::Delayed => "delayed",
            LoadPhase::Done => "done",
        }
    }
}

impl fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Phases reachable from `from`
#[must_use]
pub fn allowed_transitions(from: LoadPhase) -> &'static [LoadPhase] {
    use LoadPhase::{Delayed, Done, Eager, Lazy, NotStarted};
    match from {
        NotStarted => &[Eager],
        Eager => &[Lazy],
        Lazy => &[Delayed],
        Delayed => &[Done],
        Done => &[],
    }
}

/// Check a phase change
///
/// # Errors
/// Returns `RuntimeError::IllegalTransition` if `to` does not follow `from`
pub fn validate_transition(from: LoadPhase, to: LoadPhase) -> RuntimeResult<()> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(RuntimeError::IllegalTransition { from, to })
    }
}

/// Tracks the phase of one page load
#[derive(Debug, Clone, Default)]
pub struct PhaseTracker {
    current: LoadPhase,
    visited: Vec<LoadPhase>,
}

impl PhaseTracker {
    /// Tracker for a load that has not started
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase
    #[inline]
    #[must_use]
    pub fn current(&self) -> LoadPhase {
        self.current
    }

    /// Phases entered so far, in order
    #[inline]
    #[must_use]
    pub fn visited(&self) -> &[LoadPhase] {
        &self.visited
    }

    /// Whether the load is done
    #[inline]
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.current == LoadPhase::Done
    }

    /// Enter the next phase
    ///
    /// # Errors
    /// Returns `RuntimeError::IllegalTransition` and stays in the current
    /// phase if `to` does not follow it
    pub fn advance(&mut self, to: LoadPhase) -> RuntimeResult<()> {
        validate_transition(self.current, to)?;
        tracing::info!(from = %self.current, to = %to, "page load phase");
        self.current = to;
        self.visited.push(to);
        Ok(())
    }
}
