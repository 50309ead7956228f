//! Interactive Prompt Handler
//!
//! Any line of input while a missing dependency is pending approves it. The
//! handler never clears the prompt; a later NEW_SESSION or
//! MISSING_WEB_MODULE event does that.

use std::sync::Arc;

use crate::install::PackageInstaller;

use super::state::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptOutcome {
    /// The pending package was handed to the installer.
    Approved,
    /// Nothing pending; the line was dropped.
    Ignored,
}

pub struct PromptHandler {
    installer: Arc<dyn PackageInstaller>,
}

impl PromptHandler {
    pub fn new(installer: Arc<dyn PackageInstaller>) -> Self {
        Self { installer }
    }

    pub fn handle_line(&self, state: &SessionState, line: &str) -> PromptOutcome {
        let Some(specifier) = state.missing_module() else {
            tracing::debug!(len = line.len(), "input with no pending prompt ignored");
            return PromptOutcome::Ignored;
        };
        let needs_install = !state.missing_module_resolvable();
        tracing::info!(specifier, needs_install, "prompt approved");
        self.installer.add_package(specifier, needs_install);
        PromptOutcome::Approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::RecordingInstaller;

    #[test]
    fn test_line_without_prompt_is_ignored() {
        let installer = RecordingInstaller::new();
        let handler = PromptHandler::new(Arc::new(installer.clone()));
        let state = SessionState::default();
        assert_eq!(handler.handle_line(&state, ""), PromptOutcome::Ignored);
        assert!(installer.calls().is_empty());
    }

    #[test]
    fn test_needs_install_is_inverse_of_resolvable() {
        let installer = RecordingInstaller::new();
        let handler = PromptHandler::new(Arc::new(installer.clone()));
        let mut state = SessionState::default();

        state.set_missing_module("react".into(), true);
        assert_eq!(handler.handle_line(&state, ""), PromptOutcome::Approved);
        state.set_missing_module("@scope/pkg/deep".into(), false);
        assert_eq!(handler.handle_line(&state, "y"), PromptOutcome::Approved);

        assert_eq!(
            installer.calls(),
            vec![
                ("react".to_string(), false),
                ("@scope/pkg/deep".to_string(), true)
            ]
        );
        assert_eq!(state.missing_module(), Some("@scope/pkg/deep"));
    }
}
