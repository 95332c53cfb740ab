//! Shared mutable context threaded through every FSM handler.
//!
//! `CvContext` is the single struct that state handlers read from and
//! write to.  It holds the programming session, the configuration, and the
//! side effects a handler produced during one dispatch: display commands,
//! outbound requests and a fault note.  The service flushes those to the
//! ports right after the dispatch, before the next event is accepted.

use heapless::Vec;
use log::{info, warn};

use crate::config::CvConfig;
use crate::error::ProgrammingFault;
use crate::events::ProgrammingMode;
use crate::numeric::FieldRange;
use crate::protocol::{CvProgRequest, RequestKind};

/// Display commands buffered per dispatch.
pub const DISPLAY_QUEUE_CAP: usize = 8;

/// Outbound requests buffered per dispatch.
pub const OUTBOX_CAP: usize = 2;

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// State of one programming session.  Reset on every entry to Idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    /// Chosen by the start event, fixed until the session returns to Idle.
    pub mode: ProgrammingMode,
    pub cv_number: u16,
    pub cv_value: u8,
    /// Target locomotive, POM mode only.
    pub pom_address: u16,
    /// `update` ticks seen while waiting for a result.
    pub timeout_count: u16,
}

impl Session {
    /// Fresh session with every field at its default.
    pub fn new(mode: ProgrammingMode, config: &CvConfig) -> Self {
        Self {
            mode,
            cv_number: config.cv_number_range(mode).reset(),
            cv_value: config.cv_value_min,
            pom_address: config.pom_address_range().reset(),
            timeout_count: 0,
        }
    }

    pub fn is_pom(&self) -> bool {
        self.mode == ProgrammingMode::ProgramOnMain
    }
}

// ---------------------------------------------------------------------------
// Display commands (written by state handlers; applied by the service)
// ---------------------------------------------------------------------------

/// Status line texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusText {
    CvProgramming,
    PomProgramming,
    ReadingCv,
    WritingCv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Green,
    /// Alert colour, used to flag an invalid entry.
    Red,
}

/// One call on the display collaborator.
///
/// `initial` is `true` for the first paint of a screen and `false` for an
/// incremental update.  `pom` selects the POM layout of the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayCommand {
    UpdateStatus { text: StatusText, visible: bool, color: Color },
    ShowNumber { value: u16, initial: bool, pom: bool },
    ShowValue { value: u8, initial: bool, pom: bool },
    ShowAddress { value: u16, initial: bool, color: Color },
    RemoveNumber { pom: bool },
    RemoveValue { pom: bool },
}

// ---------------------------------------------------------------------------
// CvContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct CvContext {
    // -- Session --
    pub session: Session,

    // -- Configuration --
    pub config: CvConfig,

    // -- Side effects of the current dispatch --
    /// Display calls, in order.
    pub display: Vec<DisplayCommand, DISPLAY_QUEUE_CAP>,
    /// Requests to hand to the command-station driver, in order.
    pub outbox: Vec<CvProgRequest, OUTBOX_CAP>,
    /// Fault recorded by a handler, reported by the service.
    pub fault: Option<ProgrammingFault>,

    /// The last request constructed, kept for inspection.
    pub last_request: Option<CvProgRequest>,
}

impl CvContext {
    /// Create a new context with the given configuration.
    pub fn new(config: CvConfig) -> Self {
        Self {
            session: Session::new(ProgrammingMode::CvDirect, &config),
            config,
            display: Vec::new(),
            outbox: Vec::new(),
            fault: None,
            last_request: None,
        }
    }

    // -- Ranges for the active mode --

    pub fn cv_number_range(&self) -> FieldRange {
        self.config.cv_number_range(self.session.mode)
    }

    pub fn cv_value_range(&self) -> FieldRange {
        self.config.cv_value_range()
    }

    pub fn pom_address_range(&self) -> FieldRange {
        self.config.pom_address_range()
    }

    // -- Side-effect helpers --

    /// Queue a display call.
    pub fn show(&mut self, cmd: DisplayCommand) {
        if self.display.push(cmd).is_err() {
            warn!("display queue full, dropping {:?}", cmd);
        }
    }

    pub fn status(&mut self, text: StatusText) {
        self.show(DisplayCommand::UpdateStatus {
            text,
            visible: true,
            color: Color::Green,
        });
    }

    /// Build a request from the session and queue it for the driver.
    pub fn emit(&mut self, kind: RequestKind) {
        let request = CvProgRequest::new(
            kind,
            self.session.pom_address,
            self.session.cv_number,
            self.session.cv_value,
        );
        info!("CV request: {}", request);
        self.last_request = Some(request);
        if self.outbox.push(request).is_err() {
            warn!("outbox full, dropping {}", request);
        }
    }

    pub fn raise(&mut self, fault: ProgrammingFault) {
        warn!("CV programming fault: {}", fault);
        self.fault = Some(fault);
    }

    /// Discard the fields and start a new session.
    pub fn reset_session(&mut self, mode: ProgrammingMode) {
        self.session = Session::new(mode, &self.config);
    }

    /// Drop all buffered side effects.
    pub fn clear_effects(&mut self) {
        self.display.clear();
        self.outbox.clear();
        self.fault = None;
    }
}
