//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (stderr on the bench, UART on a handheld).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink {
    faults: u32,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Faults seen so far.
    pub fn faults(&self) -> u32 {
        self.faults
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::RequestSent(request) => {
                info!("REQ   | {}", request);
            }
            AppEvent::RequestDropped(request) => {
                warn!("REQ   | dropped {}", request);
            }
            AppEvent::Fault(fault) => {
                self.faults += 1;
                warn!("FAULT | {}", fault);
            }
        }
    }
}
