//! Event Reducer - applies one event to the session state
//!
//! Every event maps to exactly one mutation. The caller redraws after each
//! `apply`, whatever it returns. Events naming an unregistered worker are
//! logged and dropped.

use crate::event::{format_console_args, DashboardEvent, WorkerFailure, WorkerState};

use super::state::SessionState;

/// What `apply` did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Changed,
    /// The event was absorbed without touching state.
    Ignored,
}

impl Applied {
    fn from_found(found: bool) -> Self {
        if found {
            Self::Changed
        } else {
            Self::Ignored
        }
    }
}

/// Apply a single event to `state`.
pub fn apply(state: &mut SessionState, event: DashboardEvent) -> Applied {
    tracing::debug!(kind = event.kind(), "applying event");

    match event {
        DashboardEvent::WorkerOutput { id, msg } => {
            unknown_worker(&id, state.append_output(&id, &msg))
        }
        DashboardEvent::WorkerStatusUpdate { id, state: label } => match label {
            Some(label) => unknown_worker(&id, state.set_worker_state(&id, WorkerState::from(label))),
            None => Applied::Ignored,
        },
        DashboardEvent::WorkerCompleted { id, error } => {
            let failure = error.as_ref().and_then(WorkerFailure::from_value);
            unknown_worker(&id, state.complete_worker(&id, failure))
        }
        DashboardEvent::WorkerReset { id } => unknown_worker(&id, state.reset_worker(&id)),
        DashboardEvent::ConsoleMessage { level, args } => {
            state.append_console(&format!("[{}] {}\n", level, format_console_args(&args)));
            Applied::Changed
        }
        DashboardEvent::SessionStarted => {
            if state.missing_module().is_none() && !state.console().is_empty() {
                state.clear_console();
            }
            state.clear_missing_module();
            Applied::Changed
        }
        DashboardEvent::MissingDependency {
            specifier,
            is_installed,
        } => {
            state.set_missing_module(specifier, is_installed);
            Applied::Changed
        }
    }
}

fn unknown_worker(id: &str, found: bool) -> Applied {
    if !found {
        tracing::warn!(id, "event for unregistered worker ignored");
    }
    Applied::from_found(found)
}
