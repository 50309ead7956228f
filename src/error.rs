//! Error types with fix suggestions
//!
//! Dashboard failures (a worker reporting an error) are state, not errors.
//! This enum only covers the ambient edges: loading the board file, reading
//! the event source and writing frames to the terminal.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BoardError>;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("BOARD-001: Cannot read board file '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("BOARD-002: Board file parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("BOARD-003: Worker #{index} has an empty id")]
    EmptyWorkerId { index: usize },

    #[error("BOARD-004: Worker id '{id}' is registered more than once")]
    DuplicateWorker { id: String },

    #[error("BOARD-005: Board declares both 'serve' and 'build' modes")]
    ConflictingModes,

    #[error("BOARD-006: Installer command is empty")]
    EmptyInstallerCommand,

    #[error("BOARD-010: Cannot open event source '{path}': {source}")]
    EventSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("BOARD-020: Terminal write failed: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("BOARD-030: Logging setup failed: {0}")]
    Logging(String),
}

impl FixSuggestion for BoardError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            BoardError::ConfigRead { .. } => Some("Check the board file path and permissions"),
            BoardError::ConfigParse(_) => Some("Check YAML syntax: indentation and quoting"),
            BoardError::EmptyWorkerId { .. } => Some("Give every entry under workers: a non-empty id"),
            BoardError::DuplicateWorker { .. } => Some("Worker ids must be unique within a board"),
            BoardError::ConflictingModes => {
                Some("Keep either the serve: block or the build: block, not both")
            }
            BoardError::EmptyInstallerCommand => {
                Some("Set installer.install to a command, e.g. [npm, install]")
            }
            BoardError::EventSource { .. } => {
                Some("Pass an existing file or FIFO to --events, or '-' for stdin")
            }
            BoardError::Terminal(_) => Some("Check that stdout is still open"),
            BoardError::Logging(_) => Some("Check the --log-file path and WATCHBOARD_LOG filter"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_variant_has_a_suggestion() {
        let errors = vec![
            BoardError::EmptyWorkerId { index: 0 },
            BoardError::DuplicateWorker { id: "a".into() },
            BoardError::ConflictingModes,
            BoardError::EmptyInstallerCommand,
            BoardError::Terminal(std::io::Error::other("closed")),
            BoardError::Logging("bad filter".into()),
        ];
        for err in errors {
            assert!(err.fix_suggestion().is_some(), "missing fix for {err}");
        }
    }

    #[test]
    fn test_error_codes_in_display() {
        let err = BoardError::DuplicateWorker { id: "mount:src".into() };
        assert_eq!(
            err.to_string(),
            "BOARD-004: Worker id 'mount:src' is registered more than once"
        );
    }
}
