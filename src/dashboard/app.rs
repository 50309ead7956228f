//! Dashboard - owns the session state and drives redraws
//!
//! One loop, one owner: events and input lines are multiplexed with
//! `tokio::select!` and each is fully handled (mutation + repaint) before the
//! next is looked at.

use std::io::Write;
use std::sync::Arc;

use crossterm::{
    cursor::MoveTo,
    queue,
    terminal::{Clear, ClearType},
};
use tokio::sync::mpsc;
use tokio_stream::{Stream, StreamExt};

use crate::config::WorkerConfig;
use crate::error::Result;
use crate::event::DashboardEvent;
use crate::install::PackageInstaller;

use super::prompt::{PromptHandler, PromptOutcome};
use super::reducer;
use super::render::{render, Frame};
use super::session::SessionInfo;
use super::state::SessionState;

// ─────────────────────────────────────────────────────────────────────────────
// Painter
// ─────────────────────────────────────────────────────────────────────────────

/// Writes frames to the terminal, clearing it first.
pub struct Painter<W: Write> {
    out: W,
    clear_screen: bool,
}

impl<W: Write> Painter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            clear_screen: true,
        }
    }

    /// No clear/cursor sequences between frames. For pipes and tests.
    pub fn plain(out: W) -> Self {
        Self {
            out,
            clear_screen: false,
        }
    }

    pub fn paint(&mut self, frame: &Frame) -> Result<()> {
        if self.clear_screen {
            queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        self.out.write_all(frame.text().as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dashboard
// ─────────────────────────────────────────────────────────────────────────────

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The event source closed.
    Finished,
    /// A frame reported errors; the host should exit non-zero.
    Failed,
}

impl RunOutcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Finished => 0,
            Self::Failed => 1,
        }
    }
}

pub struct Dashboard<W: Write> {
    state: SessionState,
    session: SessionInfo,
    painter: Painter<W>,
    prompt: Option<PromptHandler>,
    frames: usize,
}

impl<W: Write> Dashboard<W> {
    pub fn new<I>(workers: I, session: SessionInfo, painter: Painter<W>) -> Self
    where
        I: IntoIterator<Item = WorkerConfig>,
    {
        Self {
            state: SessionState::with_workers(workers),
            session,
            painter,
            prompt: None,
            frames: 0,
        }
    }

    /// Enable the install prompt. Only takes effect in serve mode.
    pub fn with_installer(mut self, installer: Arc<dyn PackageInstaller>) -> Self {
        if self.session.mode.is_serve() {
            self.prompt = Some(PromptHandler::new(installer));
        } else {
            tracing::debug!("install prompt disabled outside serve mode");
        }
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session(&self) -> &SessionInfo {
        &self.session
    }

    pub fn painter(&self) -> &Painter<W> {
        &self.painter
    }

    pub fn into_painter(self) -> Painter<W> {
        self.painter
    }

    /// Frames painted so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Repaint from the current snapshot.
    pub fn redraw(&mut self) -> Result<Frame> {
        let frame = render(self.state.snapshot(), &self.session);
        self.painter.paint(&frame)?;
        self.frames += 1;
        Ok(frame)
    }

    /// Apply one event, then repaint unconditionally.
    pub fn handle_event(&mut self, event: DashboardEvent) -> Result<Frame> {
        reducer::apply(&mut self.state, event);
        self.redraw()
    }

    /// Feed one line of user input. Returns the repainted frame when the line
    /// approved a pending install.
    pub fn handle_input(&mut self, line: &str) -> Result<Option<Frame>> {
        let Some(prompt) = &self.prompt else {
            return Ok(None);
        };
        match prompt.handle_line(&self.state, line) {
            PromptOutcome::Approved => self.redraw().map(Some),
            PromptOutcome::Ignored => Ok(None),
        }
    }

    /// Run until the event source closes or a frame reports failure.
    ///
    /// `input` is only read when the install prompt is enabled. A prompt
    /// still pending when the source closes keeps the run alive until it is
    /// approved or `input` ends.
    pub async fn run<S>(
        &mut self,
        mut events: mpsc::UnboundedReceiver<DashboardEvent>,
        mut input: S,
    ) -> Result<RunOutcome>
    where
        S: Stream<Item = String> + Unpin,
    {
        if self.redraw()?.requests_exit() {
            return Ok(RunOutcome::Failed);
        }

        let mut events_open = true;
        let mut input_open = self.prompt.is_some();
        loop {
            if !events_open && !(input_open && self.state.missing_module().is_some()) {
                return Ok(RunOutcome::Finished);
            }

            tokio::select! {
                biased;

                event = events.recv(), if events_open => match event {
                    Some(event) => {
                        if self.handle_event(event)?.requests_exit() {
                            tracing::info!("session finished with errors");
                            return Ok(RunOutcome::Failed);
                        }
                    }
                    None => {
                        tracing::debug!(frames = self.frames, "event source closed");
                        events_open = false;
                    }
                },

                line = input.next(), if input_open => match line {
                    Some(line) => {
                        let approved = self.handle_input(&line)?.is_some();
                        // Nothing is left to clear the prompt once the source is gone.
                        if approved && !events_open {
                            return Ok(RunOutcome::Finished);
                        }
                    }
                    None => {
                        tracing::debug!("input closed");
                        input_open = false;
                    }
                },
            }
        }
    }
}
