//! Outbound application events.
//!
//! The [`CvService`](super::service::CvService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::error::ProgrammingFault;
use crate::fsm::StateId;
use crate::protocol::CvProgRequest;

/// Structured events emitted by the CV core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries initial state).
    Started(StateId),

    /// The FSM moved between states during one dispatch.
    StateChanged { from: StateId, to: StateId },

    /// A request was handed to the command-station driver.
    RequestSent(CvProgRequest),

    /// The driver refused a request.
    RequestDropped(CvProgRequest),

    /// A programming step failed and was recovered locally.
    Fault(ProgrammingFault),
}
