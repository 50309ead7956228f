//! SessionState - State Store
//!
//! Canonical snapshot of every registered worker, the console buffer and the
//! missing-dependency prompt slot. Mutation primitives and selectors only;
//! the transition rules live in the reducer.
//!
//! Worker ids passed to the mutators must come from the registration list.
//! An unknown id is a caller bug; mutators report it by returning `false`
//! and leave the state untouched.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::WorkerConfig;
use crate::event::{WorkerFailure, WorkerState};

// ─────────────────────────────────────────────────────────────────────────────
// Worker Record
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct WorkerRecord {
    pub state: WorkerState,
    pub done: bool,
    pub error: Option<WorkerFailure>,
    pub output: String,
    pub config: Arc<WorkerConfig>,
}

impl WorkerRecord {
    pub fn new(config: Arc<WorkerConfig>) -> Self {
        Self {
            state: WorkerState::Absent,
            done: false,
            error: None,
            output: String::new(),
            config,
        }
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Aggregate Status
// ─────────────────────────────────────────────────────────────────────────────

/// Fold of every worker's `done` / `error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateStatus {
    pub done: bool,
    pub error: bool,
}

impl AggregateStatus {
    /// Identity of the fold: an empty board is done and clean.
    pub const IDENTITY: Self = Self {
        done: true,
        error: false,
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// Session State
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    workers: Vec<WorkerRecord>,
    index: HashMap<String, usize>,

    console: String,
    was_cleared: bool,

    missing_module: Option<String>,
    missing_module_resolvable: bool,
}

impl SessionState {
    /// Create a state with one default record per worker, in registration order.
    pub fn with_workers<I>(configs: I) -> Self
    where
        I: IntoIterator<Item = WorkerConfig>,
    {
        let mut state = Self::default();
        state.init_workers(configs);
        state
    }

    /// Populate default records. Intended to be called once, before any event.
    /// A repeated id keeps its first registration.
    pub fn init_workers<I>(&mut self, configs: I)
    where
        I: IntoIterator<Item = WorkerConfig>,
    {
        for config in configs {
            if self.index.contains_key(&config.id) {
                tracing::warn!(id = %config.id, "ignoring duplicate worker registration");
                continue;
            }
            self.index.insert(config.id.clone(), self.workers.len());
            self.workers.push(WorkerRecord::new(Arc::new(config)));
        }
    }

    /// Current snapshot, for rendering.
    pub fn snapshot(&self) -> &Self {
        self
    }

    // ─────────────────────────────────────────────────────────────────────
    // Selectors
    // ─────────────────────────────────────────────────────────────────────

    /// Workers in registration order.
    pub fn workers(&self) -> impl Iterator<Item = &WorkerRecord> {
        self.workers.iter()
    }

    pub fn worker(&self, id: &str) -> Option<&WorkerRecord> {
        self.index.get(id).map(|&i| &self.workers[i])
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn console(&self) -> &str {
        &self.console
    }

    pub fn was_cleared(&self) -> bool {
        self.was_cleared
    }

    pub fn missing_module(&self) -> Option<&str> {
        self.missing_module.as_deref()
    }

    pub fn missing_module_resolvable(&self) -> bool {
        self.missing_module_resolvable
    }

    pub fn aggregate(&self) -> AggregateStatus {
        self.workers
            .iter()
            .fold(AggregateStatus::IDENTITY, |acc, w| AggregateStatus {
                done: acc.done && w.done,
                error: acc.error || w.has_error(),
            })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mutators
    // ─────────────────────────────────────────────────────────────────────

    fn worker_mut(&mut self, id: &str) -> Option<&mut WorkerRecord> {
        match self.index.get(id) {
            Some(&i) => Some(&mut self.workers[i]),
            None => None,
        }
    }

    pub fn append_output(&mut self, id: &str, text: &str) -> bool {
        self.worker_mut(id)
            .map(|w| w.output.push_str(text))
            .is_some()
    }

    pub fn set_worker_state(&mut self, id: &str, state: WorkerState) -> bool {
        self.worker_mut(id).map(|w| w.state = state).is_some()
    }

    /// Mark a worker done. The first recorded error is kept.
    pub fn complete_worker(&mut self, id: &str, error: Option<WorkerFailure>) -> bool {
        self.worker_mut(id)
            .map(|w| {
                w.state = WorkerState::Absent;
                w.done = true;
                if w.error.is_none() {
                    w.error = error;
                }
            })
            .is_some()
    }

    pub fn reset_worker(&mut self, id: &str) -> bool {
        self.worker_mut(id)
            .map(|w| *w = WorkerRecord::new(Arc::clone(&w.config)))
            .is_some()
    }

    pub fn append_console(&mut self, text: &str) {
        self.console.push_str(text);
    }

    pub fn clear_console(&mut self) {
        self.console.clear();
        self.was_cleared = true;
    }

    pub fn set_missing_module(&mut self, specifier: String, resolvable: bool) {
        self.missing_module = Some(specifier);
        self.missing_module_resolvable = resolvable;
    }

    pub fn clear_missing_module(&mut self) {
        self.missing_module = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(ids: &[&str]) -> SessionState {
        SessionState::with_workers(ids.iter().map(|id| WorkerConfig::new(*id)))
    }

    #[test]
    fn test_registration_order_is_kept() {
        let state = board(&["zeta", "alpha", "mid"]);
        let ids: Vec<&str> = state.workers().map(WorkerRecord::id).collect();
        assert_eq!(ids, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_duplicate_registration_is_ignored() {
        let state = SessionState::with_workers(vec![
            WorkerConfig::new("a"),
            WorkerConfig::watching("a"),
        ]);
        assert_eq!(state.worker_count(), 1);
        assert!(!state.worker("a").unwrap().config.watch);
    }

    #[test]
    fn test_unknown_worker_is_reported() {
        let mut state = board(&["a"]);
        let before = state.clone();
        assert!(!state.append_output("ghost", "boo"));
        assert!(!state.complete_worker("ghost", None));
        assert!(!state.reset_worker("ghost"));
        assert_eq!(state, before);
    }

    #[test]
    fn test_first_error_wins() {
        let mut state = board(&["a"]);
        state.complete_worker("a", Some(WorkerFailure { detail: Some("first".into()) }));
        state.complete_worker("a", Some(WorkerFailure { detail: Some("second".into()) }));
        state.complete_worker("a", None);
        assert_eq!(
            state.worker("a").unwrap().error,
            Some(WorkerFailure { detail: Some("first".into()) })
        );
    }

    #[test]
    fn test_empty_board_aggregate_is_identity() {
        assert_eq!(board(&[]).aggregate(), AggregateStatus::IDENTITY);
    }

    #[test]
    fn test_aggregate_fold() {
        let mut state = board(&["a", "b"]);
        assert_eq!(state.aggregate(), AggregateStatus { done: false, error: false });
        state.complete_worker("a", Some(WorkerFailure { detail: None }));
        assert_eq!(state.aggregate(), AggregateStatus { done: false, error: true });
        state.complete_worker("b", None);
        assert_eq!(state.aggregate(), AggregateStatus { done: true, error: true });
    }

    #[test]
    fn test_clear_console_marks_cleared() {
        let mut state = board(&[]);
        state.append_console("[info] hi\n");
        assert!(!state.was_cleared());
        state.clear_console();
        assert_eq!(state.console(), "");
        assert!(state.was_cleared());
    }
}
