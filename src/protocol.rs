//! Outbound programming requests addressed to the command-station driver.
//!
//! The driver owns the wire format; this module only defines the record it
//! is handed.  At most one request is outstanding at a time, which the FSM
//! guarantees by construction: only the read and direct-write states wait,
//! and neither emits a second operation until it is left.

use core::fmt;

use serde::{Deserialize, Serialize};

/// What the driver should do with a [`CvProgRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestKind {
    /// Read a CV on the programming track.
    Read,
    /// Write a CV on the programming track.
    Write,
    /// Write a CV on the main to `address`; never answered.
    PomWrite,
    /// Leave programming mode.
    Exit,
    /// Ask for the status of the pending read.
    StatusPoll,
}

/// One programming request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CvProgRequest {
    pub kind: RequestKind,
    /// Locomotive address (POM only, carried along otherwise).
    pub address: u16,
    pub cv_number: u16,
    pub cv_value: u8,
}

impl CvProgRequest {
    pub const fn new(kind: RequestKind, address: u16, cv_number: u16, cv_value: u8) -> Self {
        Self {
            kind,
            address,
            cv_number,
            cv_value,
        }
    }
}

impl fmt::Display for CvProgRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            RequestKind::Read => write!(f, "read CV{}", self.cv_number),
            RequestKind::Write => write!(f, "write CV{}={}", self.cv_number, self.cv_value),
            RequestKind::PomWrite => write!(
                f,
                "POM write loco {} CV{}={}",
                self.address, self.cv_number, self.cv_value
            ),
            RequestKind::Exit => write!(f, "exit"),
            RequestKind::StatusPoll => write!(f, "status poll"),
        }
    }
}
