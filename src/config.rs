//! Board Configuration
//!
//! A board file lists the workers to track, in display order, plus the
//! session mode and the installer command used when a missing dependency is
//! approved.
//!
//! ```yaml
//! title: Snowpack
//! serve:
//!   port: 8080
//!   ips: [192.168.1.20]
//!   start_time_ms: 42
//! installer:
//!   install: [npm, install]
//!   record: [npm, install, --save]
//! workers:
//!   - id: "mount:public"
//!     watch: true
//!   - id: "build:js"
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dashboard::{BuildInfo, ServeInfo, SessionInfo, SessionMode};
use crate::error::{BoardError, Result};

pub const DEFAULT_TITLE: &str = "Snowpack";

/// Static descriptor of one worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerConfig {
    pub id: String,

    /// Long-running watcher; shown as WATCHING while idle in serve mode.
    #[serde(default)]
    pub watch: bool,
}

impl WorkerConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            watch: false,
        }
    }

    pub fn watching(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            watch: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServeConfig {
    pub port: u16,

    /// Network addresses the dev server is reachable on.
    #[serde(default)]
    pub ips: Vec<String>,

    #[serde(default)]
    pub start_time_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    pub dest: PathBuf,
}

/// Commands run when the user approves a missing dependency. The package
/// name is appended as the last argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallerConfig {
    /// Used when the package was not found locally.
    pub install: Vec<String>,

    /// Used when the package is installed and only needs recording.
    /// Falls back to `install`.
    #[serde(default)]
    pub record: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub serve: Option<ServeConfig>,

    #[serde(default)]
    pub build: Option<BuildConfig>,

    #[serde(default)]
    pub installer: Option<InstallerConfig>,

    #[serde(default)]
    pub workers: Vec<WorkerConfig>,
}

impl BoardConfig {
    /// Load and validate a board file.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = fs::read_to_string(path).map_err(|source| BoardError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for (index, worker) in self.workers.iter().enumerate() {
            if worker.id.trim().is_empty() {
                return Err(BoardError::EmptyWorkerId { index });
            }
            if !seen.insert(worker.id.as_str()) {
                return Err(BoardError::DuplicateWorker {
                    id: worker.id.clone(),
                });
            }
        }

        if self.serve.is_some() && self.build.is_some() {
            return Err(BoardError::ConflictingModes);
        }

        if let Some(installer) = &self.installer {
            let record_empty = installer.record.as_ref().is_some_and(Vec::is_empty);
            if installer.install.is_empty() || record_empty {
                return Err(BoardError::EmptyInstallerCommand);
            }
        }

        Ok(())
    }

    /// Static session info for the renderer.
    pub fn session_info(&self) -> SessionInfo {
        let mode = match (&self.serve, &self.build) {
            (Some(serve), _) => SessionMode::Serve(ServeInfo {
                port: serve.port,
                ips: serve.ips.clone(),
                start_time_ms: serve.start_time_ms,
            }),
            (None, Some(build)) => SessionMode::Build(BuildInfo {
                dest: build.dest.display().to_string(),
            }),
            (None, None) => SessionMode::Headless,
        };
        SessionInfo {
            title: self
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            mode,
        }
    }
}
