//! Application service: the hexagonal core.
//!
//! [`CvService`] owns the FSM and the shared context.  It takes one event
//! at a time, lets the FSM run, then flushes what the handlers buffered:
//! display commands first, then requests for the command-station driver,
//! then notifications.  Everything happens before `dispatch` returns, so
//! the caller's one-event-at-a-time loop is the only ordering guarantee
//! needed.
//!
//! ```text
//!  EventQueue ──▶ ┌────────────────────────┐ ──▶ DisplayPort
//!                 │       CvService        │ ──▶ ProgrammerPort
//!  AppCommand ──▶ │    FSM · CvContext     │ ──▶ EventSink
//!                 └────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::CvConfig;
use crate::error::{Error, Result};
use crate::events::{CvEvent, EventQueue, SessionEvent};
use crate::fsm::context::{CvContext, Session};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::protocol::CvProgRequest;

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{DisplayPort, EventSink, ProgrammerPort};

// ───────────────────────────────────────────────────────────────
// CvService
// ───────────────────────────────────────────────────────────────

/// The CV programming service.
pub struct CvService {
    fsm: Fsm,
    ctx: CvContext,
}

impl CvService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM; call [`start`](Self::start) next.
    pub fn new(config: CvConfig) -> Self {
        Self {
            fsm: Fsm::new(build_state_table(), StateId::Idle),
            ctx: CvContext::new(config),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM in Idle.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        self.ctx.clear_effects();
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("CvService started in {}", self.fsm.current_name());
    }

    // ── Event dispatch ────────────────────────────────────────

    /// Deliver one event and flush its side effects to the ports.
    /// Returns the state the FSM ends up in.
    pub fn dispatch(
        &mut self,
        event: &CvEvent,
        display: &mut impl DisplayPort,
        programmer: &mut impl ProgrammerPort,
        sink: &mut impl EventSink,
    ) -> StateId {
        let prev_state = self.fsm.current_state();

        // 1. FSM (pure state logic)
        let new_state = self.fsm.dispatch(event, &mut self.ctx);

        // 2. Display, in the order the handlers asked for it
        for cmd in &self.ctx.display {
            display.apply(cmd);
        }

        // 3. Requests to the command station
        for request in &self.ctx.outbox {
            Self::submit(*request, programmer, sink);
        }

        // 4. Notifications
        if let Some(fault) = self.ctx.fault {
            sink.emit(&AppEvent::Fault(fault));
        }
        if new_state != prev_state {
            sink.emit(&AppEvent::StateChanged {
                from: prev_state,
                to: new_state,
            });
        }

        self.ctx.clear_effects();
        new_state
    }

    /// Dispatch every queued event, oldest first.  Returns how many ran.
    pub fn process_queue<const N: usize>(
        &mut self,
        queue: &mut EventQueue<N>,
        display: &mut impl DisplayPort,
        programmer: &mut impl ProgrammerPort,
        sink: &mut impl EventSink,
    ) -> usize {
        let mut processed = 0;
        while let Some(event) = queue.pop() {
            self.dispatch(&event, display, programmer, sink);
            processed += 1;
        }
        processed
    }

    // ── Command handling ──────────────────────────────────────

    /// Process a command from the outer application.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        display: &mut impl DisplayPort,
        programmer: &mut impl ProgrammerPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        match cmd {
            AppCommand::Start(mode) => {
                self.require_idle()?;
                self.dispatch(
                    &SessionEvent::Start(mode).into(),
                    display,
                    programmer,
                    sink,
                );
            }
            AppCommand::Exit => {
                self.dispatch(
                    &SessionEvent::ExitRequested.into(),
                    display,
                    programmer,
                    sink,
                );
            }
            AppCommand::UpdateConfig(config) => {
                self.require_idle()?;
                config.validate()?;
                self.ctx.config = config;
                self.ctx.reset_session(self.ctx.session.mode);
                info!("CV configuration updated ({:?} profile)", self.ctx.config.profile);
            }
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Whether a programming session is open.
    pub fn is_active(&self) -> bool {
        self.fsm.current_state() != StateId::Idle
    }

    /// Snapshot of the session fields.
    pub fn session(&self) -> Session {
        self.ctx.session
    }

    /// The last request constructed by the FSM.
    pub fn last_request(&self) -> Option<CvProgRequest> {
        self.ctx.last_request
    }

    pub fn config(&self) -> &CvConfig {
        &self.ctx.config
    }

    /// Events dispatched since startup.
    pub fn dispatch_count(&self) -> u64 {
        self.fsm.dispatch_count()
    }

    // ── Internal ──────────────────────────────────────────────

    fn require_idle(&self) -> Result<()> {
        match self.fsm.current_state() {
            StateId::Idle => Ok(()),
            state => Err(Error::SessionActive(state)),
        }
    }

    fn submit(
        request: CvProgRequest,
        programmer: &mut impl ProgrammerPort,
        sink: &mut impl EventSink,
    ) {
        match programmer.submit(request) {
            Ok(()) => sink.emit(&AppEvent::RequestSent(request)),
            Err(e) => {
                warn!("CV request '{}' dropped: {}", request, e);
                sink.emit(&AppEvent::RequestDropped(request));
            }
        }
    }
}
