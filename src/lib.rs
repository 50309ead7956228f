//! Watchboard - live terminal dashboard for build and watch workers

pub mod config;
pub mod dashboard;
pub mod error;
pub mod event;
pub mod install;
pub mod logging;

pub use config::{BoardConfig, WorkerConfig};
pub use dashboard::{Dashboard, Frame, Painter, RunOutcome, SessionInfo, SessionMode, SessionState};
pub use error::{BoardError, FixSuggestion};
pub use event::{BusHandle, DashboardEvent, EventBus};
pub use install::{CommandInstaller, NoopInstaller, PackageInstaller, RecordingInstaller};
