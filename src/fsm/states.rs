//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers: no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!            start(CV)                      start(POM)
//!   IDLE ────────────────┐      IDLE ─────────────────▶ POM ADDRESS ◀──────────┐
//!    ▲                   ▼                                │ long (addr≠default) │
//!    │ short (CV)   CV NUMBER ◀──────── short (POM) ──────┘                     │
//!    └──────────────────┤  ▲  │                                                 │
//!             long (CV) │  │  │ long (POM)                                      │
//!                       ▼  │  ▼                                                 │
//!              VALUE READ  │  VALUE CHANGE ◀──[write timeout]──┐                │
//!                   │      │   ▲   │ long                      │                │
//!   [nack/data/     └──────┼───┘   ▼                           │                │
//!    ready/timeout]        └─── CV WRITE ──────────────────────┘                │
//!                      [response, CV]   └──[entry, POM: fire and forget]────────┘
//!
//!  Any state but Idle ──[power / exit requested]──▶ IDLE  (emits exit request)
//! ```

use super::context::{Color, CvContext, DisplayCommand, StatusText};
use super::{StateDescriptor, StateId};
use crate::error::ProgrammingFault;
use crate::events::{CvEvent, CvResult, Key, PressEvent, ProgrammingMode, SessionEvent, TurnEvent, TurnKind};
use crate::numeric::{Direction, FieldRange};
use crate::protocol::RequestKind;
use log::info;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_event: idle_event,
        },
        // Index 1: EnterPomAddress
        StateDescriptor {
            id: StateId::EnterPomAddress,
            name: "EnterPomAddress",
            on_enter: Some(pom_address_enter),
            on_event: pom_address_event,
        },
        // Index 2: EnterCvNumber
        StateDescriptor {
            id: StateId::EnterCvNumber,
            name: "EnterCvNumber",
            on_enter: Some(cv_number_enter),
            on_event: cv_number_event,
        },
        // Index 3: EnterCvValueRead
        StateDescriptor {
            id: StateId::EnterCvValueRead,
            name: "EnterCvValueRead",
            on_enter: Some(value_read_enter),
            on_event: value_read_event,
        },
        // Index 4: EnterCvValueChange
        StateDescriptor {
            id: StateId::EnterCvValueChange,
            name: "EnterCvValueChange",
            on_enter: Some(value_change_enter),
            on_event: value_change_event,
        },
        // Index 5: EnterCvWrite
        StateDescriptor {
            id: StateId::EnterCvWrite,
            name: "EnterCvWrite",
            on_enter: Some(write_enter),
            on_event: write_event,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  Shared helpers
// ═══════════════════════════════════════════════════════════════════════════

/// Power key or application exit: tell the driver and drop the session.
fn exit_requested(ctx: &mut CvContext, event: &CvEvent) -> Option<StateId> {
    if event.is_exit() {
        ctx.emit(RequestKind::Exit);
        return Some(StateId::Idle);
    }
    None
}

/// New value of a field for an editing event, `None` if the event does not
/// edit (including a zero encoder delta).
fn adjust(range: FieldRange, value: u16, event: &CvEvent, coarse_step: u16) -> Option<u16> {
    match event {
        CvEvent::Turn(TurnEvent { kind, delta }) => {
            let dir = Direction::from_delta(*delta)?;
            Some(match kind {
                TurnKind::Turn => range.fine(value, dir),
                TurnKind::PushTurn => range.coarse(value, dir, coarse_step),
            })
        }
        CvEvent::Press(PressEvent::Key(Key::Reset)) => Some(range.reset()),
        CvEvent::Press(PressEvent::Key(key)) => key.step().map(|step| range.step_up(value, step)),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut CvContext) -> Option<StateId> {
    ctx.reset_session(ProgrammingMode::CvDirect);
    info!("IDLE: no programming session");
    None
}

fn idle_event(ctx: &mut CvContext, event: &CvEvent) -> Option<StateId> {
    match event {
        CvEvent::Session(SessionEvent::Start(ProgrammingMode::CvDirect)) => {
            ctx.reset_session(ProgrammingMode::CvDirect);
            ctx.status(StatusText::CvProgramming);
            Some(StateId::EnterCvNumber)
        }
        CvEvent::Session(SessionEvent::Start(ProgrammingMode::ProgramOnMain)) => {
            ctx.reset_session(ProgrammingMode::ProgramOnMain);
            ctx.status(StatusText::PomProgramming);
            Some(StateId::EnterPomAddress)
        }
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  POM ADDRESS: choose the locomotive to program on the main
// ═══════════════════════════════════════════════════════════════════════════

fn pom_address_enter(ctx: &mut CvContext) -> Option<StateId> {
    ctx.show(DisplayCommand::ShowAddress {
        value: ctx.session.pom_address,
        initial: true,
        color: Color::Green,
    });
    None
}

fn pom_address_event(ctx: &mut CvContext, event: &CvEvent) -> Option<StateId> {
    if let Some(next) = exit_requested(ctx, event) {
        return Some(next);
    }

    let range = ctx.pom_address_range();
    if let Some(value) = adjust(range, ctx.session.pom_address, event, ctx.config.coarse_step) {
        ctx.session.pom_address = value;
        ctx.show(DisplayCommand::ShowAddress {
            value,
            initial: false,
            color: Color::Green,
        });
        return None;
    }

    match event {
        CvEvent::Press(PressEvent::Short) => {
            ctx.emit(RequestKind::Exit);
            Some(StateId::Idle)
        }
        CvEvent::Press(press) if press.is_confirm() => {
            // The default address doubles as "nothing chosen yet".
            if ctx.session.pom_address == range.reset() {
                ctx.raise(ProgrammingFault::InvalidEntry);
                ctx.show(DisplayCommand::ShowAddress {
                    value: ctx.session.pom_address,
                    initial: false,
                    color: Color::Red,
                });
                return None;
            }
            info!("POM ADDRESS: loco {}", ctx.session.pom_address);
            Some(StateId::EnterCvNumber)
        }
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  CV NUMBER: choose the CV
// ═══════════════════════════════════════════════════════════════════════════

fn cv_number_enter(ctx: &mut CvContext) -> Option<StateId> {
    ctx.show(DisplayCommand::ShowNumber {
        value: ctx.session.cv_number,
        initial: true,
        pom: ctx.session.is_pom(),
    });
    None
}

fn cv_number_event(ctx: &mut CvContext, event: &CvEvent) -> Option<StateId> {
    if let Some(next) = exit_requested(ctx, event) {
        return Some(next);
    }

    let pom = ctx.session.is_pom();
    let range = ctx.cv_number_range();
    if let Some(value) = adjust(range, ctx.session.cv_number, event, ctx.config.coarse_step) {
        ctx.session.cv_number = value;
        ctx.show(DisplayCommand::ShowNumber {
            value,
            initial: false,
            pom,
        });
        return None;
    }

    match event {
        CvEvent::Press(PressEvent::Short) if pom => {
            ctx.show(DisplayCommand::RemoveNumber { pom });
            Some(StateId::EnterPomAddress)
        }
        CvEvent::Press(PressEvent::Short) => {
            ctx.emit(RequestKind::Exit);
            Some(StateId::Idle)
        }
        CvEvent::Press(press) if press.is_confirm() => {
            if pom {
                Some(StateId::EnterCvValueChange)
            } else {
                Some(StateId::EnterCvValueRead)
            }
        }
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  VALUE READ: read the current value back from the programming track
// ═══════════════════════════════════════════════════════════════════════════

fn value_read_enter(ctx: &mut CvContext) -> Option<StateId> {
    ctx.status(StatusText::ReadingCv);
    ctx.session.timeout_count = 0;
    ctx.emit(RequestKind::Read);
    info!(
        "VALUE READ: CV{}, giving up after {:.0}s",
        ctx.session.cv_number,
        ctx.config.read_timeout_secs()
    );
    None
}

fn value_read_event(ctx: &mut CvContext, event: &CvEvent) -> Option<StateId> {
    if let Some(next) = exit_requested(ctx, event) {
        return Some(next);
    }

    let CvEvent::Result(result) = event else {
        return None;
    };

    match *result {
        CvResult::Nack | CvResult::ResponseNok => {
            // Carry on with whatever value is already held.
            ctx.raise(ProgrammingFault::Nack);
            Some(StateId::EnterCvValueChange)
        }
        CvResult::Data(value) | CvResult::ResponseReady(value) => {
            ctx.session.cv_value = ctx.cv_value_range().settle(u32::from(value)) as u8;
            info!("VALUE READ: CV{} = {}", ctx.session.cv_number, ctx.session.cv_value);
            Some(StateId::EnterCvValueChange)
        }
        CvResult::Update => {
            ctx.session.timeout_count = ctx.session.timeout_count.saturating_add(1);
            ctx.emit(RequestKind::StatusPoll);
            if ctx.session.timeout_count > ctx.config.read_timeout_ticks {
                ctx.raise(ProgrammingFault::Timeout);
                return Some(StateId::EnterCvValueChange);
            }
            None
        }
        CvResult::ResponseBusy => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  VALUE CHANGE: edit the value to be written
// ═══════════════════════════════════════════════════════════════════════════

fn value_change_enter(ctx: &mut CvContext) -> Option<StateId> {
    let pom = ctx.session.is_pom();
    if !pom {
        ctx.status(StatusText::CvProgramming);
    }
    ctx.show(DisplayCommand::ShowValue {
        value: ctx.session.cv_value,
        initial: true,
        pom,
    });
    None
}

fn value_change_event(ctx: &mut CvContext, event: &CvEvent) -> Option<StateId> {
    if let Some(next) = exit_requested(ctx, event) {
        return Some(next);
    }

    // A byte has no use for the +1000 key.
    if *event == CvEvent::Press(PressEvent::Key(Key::Plus1000)) {
        return None;
    }

    let pom = ctx.session.is_pom();
    let range = ctx.cv_value_range();
    let current = u16::from(ctx.session.cv_value);
    if let Some(value) = adjust(range, current, event, ctx.config.coarse_step) {
        ctx.session.cv_value = value as u8;
        ctx.show(DisplayCommand::ShowValue {
            value: ctx.session.cv_value,
            initial: false,
            pom,
        });
        return None;
    }

    match event {
        CvEvent::Press(PressEvent::Short) => {
            ctx.show(DisplayCommand::RemoveValue { pom });
            Some(StateId::EnterCvNumber)
        }
        CvEvent::Press(press) if press.is_confirm() => Some(StateId::EnterCvWrite),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  CV WRITE: write the value and wait for the result (direct mode only)
// ═══════════════════════════════════════════════════════════════════════════

fn write_enter(ctx: &mut CvContext) -> Option<StateId> {
    if ctx.session.is_pom() {
        // No answer ever comes back for POM: send and return to address entry.
        ctx.emit(RequestKind::PomWrite);
        ctx.show(DisplayCommand::RemoveValue { pom: true });
        ctx.show(DisplayCommand::RemoveNumber { pom: true });
        return Some(StateId::EnterPomAddress);
    }

    ctx.status(StatusText::WritingCv);
    ctx.session.timeout_count = 0;
    ctx.emit(RequestKind::Write);
    info!(
        "CV WRITE: CV{} = {}, retry offered after {:.0}s",
        ctx.session.cv_number,
        ctx.session.cv_value,
        ctx.config.write_timeout_secs()
    );
    None
}

fn write_event(ctx: &mut CvContext, event: &CvEvent) -> Option<StateId> {
    if let Some(next) = exit_requested(ctx, event) {
        return Some(next);
    }

    let CvEvent::Result(result) = event else {
        return None;
    };

    match *result {
        CvResult::Data(_) | CvResult::Nack | CvResult::ResponseNok | CvResult::ResponseReady(_) => {
            if matches!(result, CvResult::Nack | CvResult::ResponseNok) {
                ctx.raise(ProgrammingFault::Nack);
            }
            // Attempt concluded either way; on to the next CV.
            ctx.show(DisplayCommand::RemoveValue { pom: false });
            ctx.status(StatusText::CvProgramming);
            Some(StateId::EnterCvNumber)
        }
        CvResult::Update => {
            ctx.session.timeout_count = ctx.session.timeout_count.saturating_add(1);
            if ctx.session.timeout_count > ctx.config.write_timeout_ticks {
                ctx.raise(ProgrammingFault::Timeout);
                return Some(StateId::EnterCvValueChange);
            }
            None
        }
        CvResult::ResponseBusy => None,
    }
}
