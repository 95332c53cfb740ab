//! Unified error types for the CV programming core.
//!
//! Two separate families live here:
//!
//! - [`Error`] covers the few commands that can be refused outright: a
//!   bad configuration, or a command issued while a session is running.
//!   A driver that cannot take a request answers with [`ProgrammerError`]
//!   and the service reports the drop as an event instead.
//! - [`ProgrammingFault`] is the operator-facing taxonomy.  Faults never
//!   abort anything: every one of them resolves to a defined FSM state and
//!   is only reported through display colour and an
//!   [`AppEvent::Fault`](crate::app::events::AppEvent::Fault).
//!
//! All variants are `Copy` so they can be passed through the FSM and the
//! service without allocation.

use core::fmt;

use crate::fsm::StateId;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration is invalid.
    Config(ConfigError),
    /// The command needs the FSM to be idle, but a session is running.
    SessionActive(StateId),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::SessionActive(state) => write!(f, "session active in {state:?}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Driver errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgrammerError {
    /// The request queue towards the driver is full.
    QueueFull,
    /// The driver is not connected to a command station.
    Disconnected,
}

impl fmt::Display for ProgrammerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueueFull => write!(f, "request queue full"),
            Self::Disconnected => write!(f, "command station disconnected"),
        }
    }
}

// ---------------------------------------------------------------------------
// Programming faults
// ---------------------------------------------------------------------------

/// Recoverable failures of a programming step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgrammingFault {
    /// The command station rejected or could not verify the CV.
    Nack,
    /// No answer arrived within the tick-based deadline.
    Timeout,
    /// The POM address was left at its default when proceeding.
    InvalidEntry,
}

impl fmt::Display for ProgrammingFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nack => write!(f, "no acknowledge"),
            Self::Timeout => write!(f, "timed out"),
            Self::InvalidEntry => write!(f, "invalid entry"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
