//! Dashboard Module - live status board for build/watch workers
//!
//! Architecture:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     RENDER LAYER (render.rs)                        │
//! │  Pure: SessionState + SessionInfo → Frame. Painter writes it out.   │
//! └─────────────────────────────────────────────────────────────────────┘
//!                               ▲
//!                               │ snapshot
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │              DOMAIN LAYER (state.rs, reducer.rs)                    │
//! │  SessionState store + one mutation per DashboardEvent.              │
//! └─────────────────────────────────────────────────────────────────────┘
//!                               ▲
//!                               │ DashboardEvent / input lines
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                 LOOP (app.rs, prompt.rs)                            │
//! │  Single consumer of the event bus; install prompt on stdin.         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

mod app;
mod prompt;
mod reducer;
mod render;
mod session;
mod state;

pub mod theme;

pub use app::{Dashboard, Painter, RunOutcome};
pub use prompt::{PromptHandler, PromptOutcome};
pub use reducer::{apply, Applied};
pub use render::{render, split_specifier, status_badge, Badge, Frame, ID_COLUMN_WIDTH};
pub use session::{BuildInfo, ServeInfo, SessionInfo, SessionMode};
pub use state::{AggregateStatus, SessionState, WorkerRecord};
