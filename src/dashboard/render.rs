//! Renderer - full frame from a snapshot
//!
//! Pure: the same snapshot and session info always produce the same bytes.
//! Clearing the terminal is left to the painter, which does it before every
//! frame.

use std::fmt::{self, Write};

use colored::ColoredString;

use crate::event::WorkerState;

use super::session::{SessionInfo, SessionMode};
use super::state::{AggregateStatus, SessionState, WorkerRecord};
use super::theme::Theme;

/// Width of the id column, dots included.
pub const ID_COLUMN_WIDTH: usize = 24;

/// One rendered frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    text: String,
    /// `None` when the prompt banner took over the frame.
    aggregate: Option<AggregateStatus>,
}

impl Frame {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn aggregate(&self) -> Option<AggregateStatus> {
        self.aggregate
    }

    /// The session finished with errors; the host should exit non-zero.
    pub fn requests_exit(&self) -> bool {
        self.aggregate.is_some_and(|a| a.error)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Status badge
// ─────────────────────────────────────────────────────────────────────────────

/// Bracketed status shown next to each worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Badge<'a> {
    Transient(&'a WorkerState),
    Failed,
    Done,
    Watching,
    Ready,
}

impl Badge<'_> {
    pub fn styled(&self) -> ColoredString {
        match self {
            Badge::Transient(WorkerState::StyledLabel(text, tag)) => tag.apply(text),
            Badge::Transient(WorkerState::Label(text)) => Theme::muted(text),
            Badge::Transient(WorkerState::Absent) => Theme::muted(""),
            Badge::Failed => Theme::error("FAILED"),
            Badge::Done => Theme::success("DONE"),
            Badge::Watching => Theme::muted("WATCHING"),
            Badge::Ready => Theme::muted("READY"),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Badge::Transient(WorkerState::StyledLabel(text, _) | WorkerState::Label(text)) => text.as_str(),
            Badge::Transient(WorkerState::Absent) => "",
            Badge::Failed => "FAILED",
            Badge::Done => "DONE",
            Badge::Watching => "WATCHING",
            Badge::Ready => "READY",
        }
    }
}

/// Pick a worker's badge. First matching arm wins.
pub fn status_badge<'a>(worker: &'a WorkerRecord, mode: &SessionMode) -> Badge<'a> {
    let watching = mode.is_serve() && worker.config.watch;
    match (&worker.state, worker.done, worker.has_error(), watching) {
        (state @ (WorkerState::Label(_) | WorkerState::StyledLabel(..)), ..) => {
            Badge::Transient(state)
        }
        (WorkerState::Absent, true, true, _) => Badge::Failed,
        (WorkerState::Absent, true, false, _) => Badge::Done,
        (WorkerState::Absent, false, _, true) => Badge::Watching,
        (WorkerState::Absent, false, _, false) => Badge::Ready,
    }
}

/// Split a specifier into package name and deep-import path.
///
/// `@scope/pkg/deep/x` gives `("@scope/pkg", Some("deep/x"))`,
/// `lodash/fp` gives `("lodash", Some("fp"))`.
pub fn split_specifier(specifier: &str) -> (&str, Option<&str>) {
    let Some(mut end) = specifier.find('/') else {
        return (specifier, None);
    };
    if specifier.starts_with('@') {
        match specifier[end + 1..].find('/') {
            Some(next) => end += 1 + next,
            None => return (specifier, None),
        }
    }
    let deep = &specifier[end + 1..];
    (&specifier[..end], (!deep.is_empty()).then_some(deep))
}

// ─────────────────────────────────────────────────────────────────────────────
// Frame
// ─────────────────────────────────────────────────────────────────────────────

/// Render the whole dashboard.
pub fn render(state: &SessionState, session: &SessionInfo) -> Frame {
    let mut text = String::new();
    // Writing into a String cannot fail.
    let aggregate = render_into(&mut text, state, session).unwrap_or(None);
    Frame { text, aggregate }
}

fn render_into(
    out: &mut String,
    state: &SessionState,
    session: &SessionInfo,
) -> Result<Option<AggregateStatus>, fmt::Error> {
    write!(out, "{}\n\n", Theme::title(&session.title))?;

    match &session.mode {
        SessionMode::Serve(serve) => {
            write!(out, "  {}", Theme::url(&serve.local_url()))?;
            for url in serve.network_urls() {
                write!(out, "{}{}", Theme::url_separator(" > "), Theme::url(&url))?;
            }
            write!(
                out,
                "\n{}\n\n",
                Theme::muted(&format!("  Server started in {}ms.", serve.start_time_ms))
            )?;
        }
        SessionMode::Build(build) => {
            write!(
                out,
                "  {}{}\n\n",
                Theme::url(&build.dest),
                Theme::muted(" Building your application...")
            )?;
        }
        SessionMode::Headless => {}
    }

    for worker in state.workers() {
        let dots = ".".repeat(ID_COLUMN_WIDTH.saturating_sub(worker.id().chars().count()));
        writeln!(
            out,
            "  {}{}[{}]",
            worker.id(),
            Theme::muted(&dots),
            status_badge(worker, &session.mode).styled()
        )?;
    }
    out.push('\n');

    if let Some(specifier) = state.missing_module() {
        render_prompt(out, specifier, state.missing_module_resolvable(), &session.title)?;
        return Ok(None);
    }

    for worker in state.workers().filter(|w| !w.output.is_empty()) {
        let header = format!("▼ {}", worker.id());
        let header = if worker.has_error() {
            Theme::error_section(&header)
        } else {
            Theme::section(&header)
        };
        write!(out, "{}\n\n{}\n\n", header, indent(&worker.output))?;
    }

    write!(out, "{}\n\n", Theme::section("▼ Console"))?;
    if state.console().is_empty() {
        let placeholder = if state.was_cleared() {
            "  Output cleared."
        } else {
            "  No output, yet."
        };
        write!(out, "{}\n\n", Theme::muted(placeholder))?;
    } else {
        write!(out, "{}\n\n", indent(state.console()))?;
    }

    let aggregate = state.aggregate();
    if aggregate.error {
        write!(out, "{}\n\n", Theme::error_section("▼ Result"))?;
        out.push_str("  ⚠️  Finished, with errors.\n\n");
    } else if aggregate.done {
        write!(out, "{}\n\n", Theme::success_section("▶ Build Complete!"))?;
    }
    Ok(Some(aggregate))
}

fn render_prompt(
    out: &mut String,
    specifier: &str,
    resolvable: bool,
    title: &str,
) -> fmt::Result {
    let (package, deep_path) = split_specifier(specifier);

    write!(out, "{}\n\n", Theme::error_section(&format!("▼ {}", title)))?;
    if resolvable {
        write!(out, "  New import {} found!\n\n", Theme::emphasis(package))?;
    } else {
        write!(out, "  Package {} could not be found!\n\n", Theme::emphasis(package))?;
    }
    if let Some(path) = deep_path {
        write!(
            out,
            "{}\n\n",
            Theme::muted(&format!("  Imported as {}/{}", package, path))
        )?;
    }
    write!(
        out,
        "  {} to install it with {}.\n\n",
        Theme::emphasis("Press Enter"),
        title
    )
}

fn indent(text: &str) -> String {
    format!("  {}", text.trim().replace('\n', "\n  "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkerConfig;
    use crate::dashboard::session::{BuildInfo, ServeInfo};
    use crate::dashboard::theme::StyleTag;
    use crate::event::WorkerFailure;

    fn serve_mode() -> SessionMode {
        SessionMode::Serve(ServeInfo {
            port: 8080,
            ips: vec!["10.0.0.7".into()],
            start_time_ms: 87,
        })
    }

    fn record(config: WorkerConfig) -> WorkerRecord {
        WorkerRecord::new(std::sync::Arc::new(config))
    }

    #[test]
    fn test_badge_precedence() {
        let mut w = record(WorkerConfig::watching("w"));
        assert_eq!(status_badge(&w, &serve_mode()), Badge::Watching);
        assert_eq!(status_badge(&w, &SessionMode::Headless), Badge::Ready);

        w.done = true;
        assert_eq!(status_badge(&w, &serve_mode()), Badge::Done);

        w.error = Some(WorkerFailure { detail: None });
        assert_eq!(status_badge(&w, &serve_mode()), Badge::Failed);

        w.state = WorkerState::StyledLabel("bundling".into(), StyleTag::Yellow);
        assert_eq!(status_badge(&w, &serve_mode()).label(), "bundling");
    }

    #[test]
    fn test_plain_worker_is_ready_in_serve_mode() {
        let w = record(WorkerConfig::new("plain"));
        assert_eq!(status_badge(&w, &serve_mode()), Badge::Ready);
    }

    #[test]
    fn test_split_specifier() {
        assert_eq!(split_specifier("@scope/pkg/deep"), ("@scope/pkg", Some("deep")));
        assert_eq!(split_specifier("@scope/pkg"), ("@scope/pkg", None));
        assert_eq!(split_specifier("@scope"), ("@scope", None));
        assert_eq!(split_specifier("lodash/fp/map"), ("lodash", Some("fp/map")));
        assert_eq!(split_specifier("react"), ("react", None));
    }

    #[test]
    fn test_serve_header() {
        let state = SessionState::default();
        let frame = render(&state, &SessionInfo::new("Snowpack", serve_mode()));
        assert!(frame.text().contains("http://localhost:8080"));
        assert!(frame.text().contains("http://10.0.0.7:8080"));
        assert!(frame.text().contains("Server started in 87ms."));
    }

    #[test]
    fn test_build_header() {
        let state = SessionState::default();
        let mode = SessionMode::Build(BuildInfo {
            dest: "/tmp/out".into(),
        });
        let frame = render(&state, &SessionInfo::new("Snowpack", mode));
        assert!(frame.text().contains("/tmp/out"));
        assert!(frame.text().contains("Building your application..."));
        assert!(!frame.text().contains("localhost"));
    }

    #[test]
    fn test_headless_has_no_mode_block() {
        let frame = render(&SessionState::default(), &SessionInfo::new("T", SessionMode::Headless));
        assert!(!frame.text().contains("localhost"));
        assert!(!frame.text().contains("Building"));
    }

    #[test]
    fn test_long_id_gets_no_dots() {
        let id = "x".repeat(ID_COLUMN_WIDTH + 3);
        let state = SessionState::with_workers(vec![WorkerConfig::new(id.clone())]);
        let frame = render(&state, &SessionInfo::new("T", SessionMode::Headless));
        let line = frame.text().lines().find(|l| l.contains(&id)).unwrap();
        assert!(!line.contains("x."));
    }

    #[test]
    fn test_output_is_trimmed_and_indented() {
        assert_eq!(indent("\nfirst\nsecond\n\n"), "  first\n  second");
    }

    #[test]
    fn test_empty_board_reports_complete() {
        let frame = render(&SessionState::default(), &SessionInfo::new("T", SessionMode::Headless));
        assert_eq!(frame.aggregate(), Some(AggregateStatus::IDENTITY));
        assert!(frame.text().contains("Build Complete!"));
        assert!(!frame.requests_exit());
    }
}
