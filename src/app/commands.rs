//! Inbound commands to the application service.
//!
//! These are issued by the outer application state machine, which decides
//! when the handheld enters or leaves CV programming.

use crate::config::CvConfig;
use crate::events::ProgrammingMode;

/// Commands that the outer application can send into the CV core.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Open a programming session in the given mode.
    Start(ProgrammingMode),

    /// Leave programming (same effect as the power key).
    Exit,

    /// Replace the configuration.  Only accepted while Idle.
    UpdateConfig(CvConfig),
}
