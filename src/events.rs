//! Inbound events and the bounded event queue.
//!
//! Events are produced by:
//! - the outer application (session start / exit)
//! - the input decoder (rotary encoder turns, key presses)
//! - the command-station driver (programming results, periodic `update` ticks)
//!
//! and consumed by the CV service strictly one at a time.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Application │────▶│              │     │              │
//! │ Input       │────▶│  EventQueue  │────▶│  CvService   │
//! │ Driver      │────▶│  (FIFO)      │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use heapless::Deque;

/// Default queue depth.
pub const EVENT_QUEUE_CAP: usize = 16;

/// Kind of programming session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgrammingMode {
    /// Programming track, with read-back.
    #[default]
    CvDirect,
    /// Programming on the main, addressed to a locomotive, write only.
    ProgramOnMain,
}

/// Session lifecycle requests from the outer application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Start(ProgrammingMode),
    ExitRequested,
}

/// Which way the encoder moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    /// Plain turn, fine adjustment.
    Turn,
    /// Turn while pushed in, coarse adjustment.
    PushTurn,
}

/// Rotary encoder motion.  Only the sign of `delta` is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnEvent {
    pub kind: TurnKind,
    pub delta: i8,
}

/// Discrete keys on the keypad variant of the handheld.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Key 0: +1
    Plus1,
    /// Key 1: +10
    Plus10,
    /// Key 2: +100
    Plus100,
    /// Key 3: +1000
    Plus1000,
    /// Key 4: reset the field to its default
    Reset,
    /// Key 5: confirm, same as a long press
    Confirm,
}

impl Key {
    /// Map a keypad index (0..=5) to a key.
    pub fn from_index(idx: u8) -> Option<Self> {
        match idx {
            0 => Some(Self::Plus1),
            1 => Some(Self::Plus10),
            2 => Some(Self::Plus100),
            3 => Some(Self::Plus1000),
            4 => Some(Self::Reset),
            5 => Some(Self::Confirm),
            _ => None,
        }
    }

    /// Step added by keys 0..3.
    pub fn step(self) -> Option<u16> {
        match self {
            Self::Plus1 => Some(crate::numeric::KEY_STEPS[0]),
            Self::Plus10 => Some(crate::numeric::KEY_STEPS[1]),
            Self::Plus100 => Some(crate::numeric::KEY_STEPS[2]),
            Self::Plus1000 => Some(crate::numeric::KEY_STEPS[3]),
            Self::Reset | Self::Confirm => None,
        }
    }
}

/// Discrete control activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressEvent {
    /// Short encoder push: back / cancel.
    Short,
    /// Normal encoder push: treated as a long push.
    Normal,
    /// Long encoder push: proceed.
    Long,
    Key(Key),
    /// Power key: leave programming.
    Power,
}

impl PressEvent {
    /// Presses that proceed to the next screen.
    pub fn is_confirm(self) -> bool {
        matches!(self, Self::Normal | Self::Long | Self::Key(Key::Confirm))
    }
}

/// Results delivered by the command-station driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CvResult {
    /// Read or write not acknowledged.
    Nack,
    /// CV value returned.
    Data(u8),
    /// Periodic tick, also sent with no activity.
    Update,
    /// Command station reported failure.
    ResponseNok,
    /// Command station still working.
    ResponseBusy,
    /// Command station finished, with the CV value.
    ResponseReady(u8),
}

/// Everything the CV FSM reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CvEvent {
    Session(SessionEvent),
    Turn(TurnEvent),
    Press(PressEvent),
    Result(CvResult),
}

impl CvEvent {
    pub const fn turn(delta: i8) -> Self {
        Self::Turn(TurnEvent { kind: TurnKind::Turn, delta })
    }

    pub const fn push_turn(delta: i8) -> Self {
        Self::Turn(TurnEvent { kind: TurnKind::PushTurn, delta })
    }

    /// Power key and the application exit request both leave the session.
    pub fn is_exit(&self) -> bool {
        matches!(
            self,
            Self::Press(PressEvent::Power) | Self::Session(SessionEvent::ExitRequested)
        )
    }
}

impl From<SessionEvent> for CvEvent {
    fn from(e: SessionEvent) -> Self {
        Self::Session(e)
    }
}

impl From<PressEvent> for CvEvent {
    fn from(e: PressEvent) -> Self {
        Self::Press(e)
    }
}

impl From<CvResult> for CvEvent {
    fn from(e: CvResult) -> Self {
        Self::Result(e)
    }
}

// ── Bounded FIFO ──────────────────────────────────────────────

/// Fixed-capacity FIFO that the dispatcher drains one event at a time.
pub struct EventQueue<const N: usize = EVENT_QUEUE_CAP> {
    queue: Deque<CvEvent, N>,
}

impl<const N: usize> EventQueue<N> {
    pub const fn new() -> Self {
        Self { queue: Deque::new() }
    }

    /// Append an event.
    /// Returns `false` if the queue is full (event dropped).
    pub fn push(&mut self, event: CvEvent) -> bool {
        if self.queue.push_back(event).is_err() {
            log::warn!("event queue full, dropping {:?}", event);
            return false;
        }
        true
    }

    /// Pop the oldest event.
    pub fn pop(&mut self) -> Option<CvEvent> {
        self.queue.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
