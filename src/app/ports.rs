//! Port traits: the hexagonal boundary between the CV core and its
//! collaborators.
//!
//! ```text
//!   CvService (domain) ──▶ Port trait ──▶ Adapter
//! ```
//!
//! Driven adapters (display, command-station driver, event sinks) implement
//! these traits.  The [`CvService`](super::service::CvService) consumes them
//! via generics, so the domain core never touches hardware directly.
//!
//! Implementations are called synchronously from inside a dispatch and
//! must not call back into the service.

use crate::error::ProgrammerError;
use crate::fsm::context::{Color, DisplayCommand, StatusText};
use crate::protocol::CvProgRequest;

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → screen)
// ───────────────────────────────────────────────────────────────

/// Screen of the handheld.  Calls are fire-and-forget; the core never reads
/// back.  `initial` distinguishes the first paint of a field from an
/// incremental update.
pub trait DisplayPort {
    fn update_status(&mut self, text: StatusText, visible: bool, color: Color);

    /// CV number field; `pom` selects the POM layout.
    fn show_number(&mut self, value: u16, initial: bool, pom: bool);

    /// CV value field; `pom` selects the POM layout.
    fn show_value(&mut self, value: u8, initial: bool, pom: bool);

    /// POM locomotive address field.
    fn show_address(&mut self, value: u16, initial: bool, color: Color);

    /// Clear the CV number field before leaving its screen.
    fn remove_number(&mut self, pom: bool);

    /// Clear the CV value field before leaving its screen.
    fn remove_value(&mut self, pom: bool);

    /// Apply one buffered command.
    fn apply(&mut self, cmd: &DisplayCommand) {
        match *cmd {
            DisplayCommand::UpdateStatus { text, visible, color } => {
                self.update_status(text, visible, color);
            }
            DisplayCommand::ShowNumber { value, initial, pom } => {
                self.show_number(value, initial, pom);
            }
            DisplayCommand::ShowValue { value, initial, pom } => {
                self.show_value(value, initial, pom);
            }
            DisplayCommand::ShowAddress { value, initial, color } => {
                self.show_address(value, initial, color);
            }
            DisplayCommand::RemoveNumber { pom } => self.remove_number(pom),
            DisplayCommand::RemoveValue { pom } => self.remove_value(pom),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Programmer port (driven adapter: domain → command station)
// ───────────────────────────────────────────────────────────────

/// One-shot submission of a programming request to the command-station
/// driver.  Results come back later as
/// [`CvResult`](crate::events::CvResult) events on the event queue.
pub trait ProgrammerPort {
    fn submit(&mut self, request: CvProgRequest) -> Result<(), ProgrammerError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
