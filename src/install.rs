//! PackageInstaller - the collaborator behind an approved prompt
//!
//! The dashboard only decides *that* a package should be added; what adding
//! means is up to the installer.
//!
//! - `PackageInstaller`: trait called by the prompt handler
//! - `NoopInstaller`: does nothing
//! - `RecordingInstaller`: remembers every call, for tests
//! - `CommandInstaller`: runs the configured package-manager command

use std::process::Stdio;
use std::sync::{Arc, Mutex};

use serde_json::json;
use tokio::process::Command;
use tokio::task::JoinSet;

use crate::config::InstallerConfig;
use crate::event::{BusHandle, DashboardEvent, WeakBusHandle};

/// Receives approved install decisions.
///
/// Called from the dashboard loop, so implementations must return quickly and
/// push slow work onto a task.
pub trait PackageInstaller: Send + Sync {
    /// `needs_install` is false when the package exists locally and only has
    /// to be recorded.
    fn add_package(&self, specifier: &str, needs_install: bool);
}

#[derive(Debug, Clone, Default)]
pub struct NoopInstaller;

impl NoopInstaller {
    pub fn new() -> Self {
        Self
    }
}

impl PackageInstaller for NoopInstaller {
    fn add_package(&self, specifier: &str, needs_install: bool) {
        tracing::debug!(specifier, needs_install, "no installer configured");
    }
}

/// Remembers `(specifier, needs_install)` for every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingInstaller {
    calls: Arc<Mutex<Vec<(String, bool)>>>,
}

impl RecordingInstaller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(String, bool)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl PackageInstaller for RecordingInstaller {
    fn add_package(&self, specifier: &str, needs_install: bool) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((specifier.to_string(), needs_install));
        }
    }
}

/// Runs `install <pkg>` or `record <pkg>` and reports progress to the console
/// section through the bus. Holds only a weak handle, so a closed event
/// source still ends the run; call [`CommandInstaller::wait`] before exiting.
#[derive(Clone)]
pub struct CommandInstaller {
    install: Vec<String>,
    record: Vec<String>,
    bus: WeakBusHandle,
    tasks: Arc<Mutex<JoinSet<()>>>,
}

impl CommandInstaller {
    pub fn new(config: &InstallerConfig, bus: &BusHandle) -> Self {
        Self {
            install: config.install.clone(),
            record: config
                .record
                .clone()
                .unwrap_or_else(|| config.install.clone()),
            bus: bus.downgrade(),
            tasks: Arc::default(),
        }
    }

    /// Wait for every command started so far.
    pub async fn wait(&self) {
        let mut tasks = match self.tasks.lock() {
            Ok(mut tasks) => std::mem::take(&mut *tasks),
            Err(_) => return,
        };
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::warn!(error = %e, "package command task failed");
            }
        }
    }

    /// Argv for a decision, package name last.
    pub fn command_for(&self, package: &str, needs_install: bool) -> Vec<String> {
        let base = if needs_install {
            &self.install
        } else {
            &self.record
        };
        let mut argv = base.clone();
        argv.push(package.to_string());
        argv
    }
}

impl PackageInstaller for CommandInstaller {
    fn add_package(&self, specifier: &str, needs_install: bool) {
        let (package, _) = crate::dashboard::split_specifier(specifier);
        let argv = self.command_for(package, needs_install);
        let bus = self.bus.clone();
        tracing::info!(package, needs_install, command = ?argv, "adding package");

        let task = async move {
            let Some((program, args)) = argv.split_first() else {
                return;
            };
            bus.emit(DashboardEvent::info([json!("$ %s"), json!(argv.join(" "))]));

            let output = Command::new(program)
                .args(args)
                .stdin(Stdio::null())
                .output()
                .await;

            match output {
                Ok(out) if out.status.success() => {
                    tracing::info!(program = %program, "package command finished");
                    bus.emit(DashboardEvent::info([json!("%s finished"), json!(program)]));
                }
                Ok(out) => {
                    let stderr = String::from_utf8_lossy(&out.stderr);
                    tracing::warn!(program = %program, status = %out.status, "package command failed");
                    bus.emit(DashboardEvent::error([
                        json!("%s failed (%s)"),
                        json!(program),
                        json!(out.status.to_string()),
                        json!(stderr.trim()),
                    ]));
                }
                Err(e) => {
                    tracing::warn!(program = %program, error = %e, "package command could not start");
                    bus.emit(DashboardEvent::error([
                        json!("could not run %s: %s"),
                        json!(program),
                        json!(e.to_string()),
                    ]));
                }
            }
        };
        if let Ok(mut tasks) = self.tasks.lock() {
            tasks.spawn(task);
        }
    }
}
