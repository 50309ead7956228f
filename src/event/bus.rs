//! Event bus - single-consumer queue in front of the dashboard
//!
//! Producers hold cheap `BusHandle` clones; the dashboard loop is the only
//! receiver, so events are applied strictly in arrival order.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::DashboardEvent;

/// Owning side of the bus. Split into a handle for producers and a receiver
/// for the dashboard.
pub struct EventBus {
    tx: mpsc::UnboundedSender<DashboardEvent>,
    rx: mpsc::UnboundedReceiver<DashboardEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    pub fn handle(&self) -> BusHandle {
        BusHandle {
            tx: self.tx.clone(),
        }
    }

    /// Consume the bus. The receiver closes once every handle is dropped.
    pub fn split(self) -> (BusHandle, mpsc::UnboundedReceiver<DashboardEvent>) {
        (BusHandle { tx: self.tx }, self.rx)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer side of the bus.
#[derive(Debug, Clone)]
pub struct BusHandle {
    tx: mpsc::UnboundedSender<DashboardEvent>,
}

impl BusHandle {
    /// Queue an event. Returns false once the dashboard has stopped listening.
    pub fn emit(&self, event: DashboardEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// A handle that does not keep the bus open.
    pub fn downgrade(&self) -> WeakBusHandle {
        WeakBusHandle {
            tx: self.tx.downgrade(),
        }
    }
}

/// Producer that lets the bus close once every strong handle is gone.
#[derive(Clone)]
pub struct WeakBusHandle {
    tx: mpsc::WeakUnboundedSender<DashboardEvent>,
}

impl WeakBusHandle {
    /// Queue an event if the bus is still open.
    pub fn emit(&self, event: DashboardEvent) -> bool {
        self.tx
            .upgrade()
            .is_some_and(|tx| tx.send(event).is_ok())
    }
}

/// Read newline-delimited JSON events from `reader` and forward them to `bus`.
///
/// Lines that do not decode are logged and skipped. The task ends at EOF or
/// when the dashboard goes away.
pub fn spawn_ndjson_reader<R>(reader: R, bus: BusHandle) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        let mut line_no = 0usize;
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "event source read failed, closing");
                    break;
                }
            };
            line_no += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<DashboardEvent>(trimmed) {
                Ok(event) => {
                    if !bus.emit(event) {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(line = line_no, error = %e, "skipping malformed event");
                }
            }
        }
        tracing::debug!(lines = line_no, "event source closed");
    })
}
