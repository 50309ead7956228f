//! Dashboard events
//!
//! The wire format is one JSON object per event, internally tagged by `type`:
//!
//! ```text
//! {"type":"WORKER_MSG","id":"build:js","msg":"compiled 3 files\n"}
//! {"type":"WORKER_UPDATE","id":"build:js","state":["bundling","yellow"]}
//! {"type":"WORKER_COMPLETE","id":"build:js","error":true}
//! {"type":"WORKER_RESET","id":"build:js"}
//! {"type":"CONSOLE","level":"info","args":["listening on %d", 8080]}
//! {"type":"NEW_SESSION"}
//! {"type":"MISSING_WEB_MODULE","specifier":"@scope/pkg/deep","isInstalled":false}
//! ```

mod bus;
mod format;

pub use bus::{spawn_ndjson_reader, BusHandle, EventBus, WeakBusHandle};
pub use format::format_console_args;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dashboard::theme::StyleTag;

/// One event delivered to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DashboardEvent {
    /// Output text emitted by a worker.
    #[serde(rename = "WORKER_MSG")]
    WorkerOutput { id: String, msg: String },

    /// Free-form transient status reported by a worker.
    #[serde(rename = "WORKER_UPDATE")]
    WorkerStatusUpdate {
        id: String,
        #[serde(default)]
        state: Option<StatusLabel>,
    },

    /// A worker finished, optionally with an error.
    #[serde(rename = "WORKER_COMPLETE")]
    WorkerCompleted {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<Value>,
    },

    #[serde(rename = "WORKER_RESET")]
    WorkerReset { id: String },

    /// Out-of-band console log line.
    #[serde(rename = "CONSOLE")]
    ConsoleMessage {
        level: String,
        #[serde(default)]
        args: Vec<Value>,
    },

    #[serde(rename = "NEW_SESSION")]
    SessionStarted,

    #[serde(rename = "MISSING_WEB_MODULE")]
    MissingDependency {
        specifier: String,
        #[serde(rename = "isInstalled", default)]
        is_installed: bool,
    },
}

impl DashboardEvent {
    /// Wire tag, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::WorkerOutput { .. } => "WORKER_MSG",
            Self::WorkerStatusUpdate { .. } => "WORKER_UPDATE",
            Self::WorkerCompleted { .. } => "WORKER_COMPLETE",
            Self::WorkerReset { .. } => "WORKER_RESET",
            Self::ConsoleMessage { .. } => "CONSOLE",
            Self::SessionStarted => "NEW_SESSION",
            Self::MissingDependency { .. } => "MISSING_WEB_MODULE",
        }
    }

    pub fn info(args: impl IntoIterator<Item = Value>) -> Self {
        Self::ConsoleMessage {
            level: "info".to_string(),
            args: args.into_iter().collect(),
        }
    }

    pub fn error(args: impl IntoIterator<Item = Value>) -> Self {
        Self::ConsoleMessage {
            level: "error".to_string(),
            args: args.into_iter().collect(),
        }
    }
}

/// Status label as it appears on the wire: `"bundling"` or `["bundling", "yellow"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusLabel {
    Plain(String),
    Styled(String, String),
}

/// Transient worker state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WorkerState {
    #[default]
    Absent,
    Label(String),
    StyledLabel(String, StyleTag),
}

impl From<StatusLabel> for WorkerState {
    /// An empty label counts as no state, so the badge falls through to
    /// DONE / FAILED / WATCHING / READY.
    fn from(label: StatusLabel) -> Self {
        match label {
            StatusLabel::Plain(text) | StatusLabel::Styled(text, _) if text.is_empty() => {
                Self::Absent
            }
            StatusLabel::Plain(text) => Self::Label(text),
            StatusLabel::Styled(text, tag) => Self::StyledLabel(text, StyleTag::parse(&tag)),
        }
    }
}

/// A recorded worker failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerFailure {
    pub detail: Option<String>,
}

impl WorkerFailure {
    /// Interpret an incoming `error` value by truthiness.
    ///
    /// `null`, `false`, `0` and `""` mean "no error". A non-empty string keeps
    /// its text; arrays and objects keep their compact JSON.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null | Value::Bool(false) => None,
            Value::Bool(true) => Some(Self { detail: None }),
            Value::Number(n) => {
                if n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()) {
                    Some(Self {
                        detail: Some(n.to_string()),
                    })
                } else {
                    None
                }
            }
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(Self {
                detail: Some(s.clone()),
            }),
            other => Some(Self {
                detail: Some(other.to_string()),
            }),
        }
    }
}
