//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern, event driven:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │  StateTable                                           │
//! │  ┌────────────────────┬────────────────┬───────────┐  │
//! │  │ StateId            │ on_enter       │ on_event  │  │
//! │  ├────────────────────┼────────────────┼───────────┤  │
//! │  │ Idle               │ fn(ctx)->Opt<> │ fn(ctx,e) │  │
//! │  │ EnterPomAddress    │ fn(ctx)->Opt<> │ fn(ctx,e) │  │
//! │  │ EnterCvNumber      │ fn(ctx)->Opt<> │ fn(ctx,e) │  │
//! │  │ EnterCvValueRead   │ fn(ctx)->Opt<> │ fn(ctx,e) │  │
//! │  │ EnterCvValueChange │ fn(ctx)->Opt<> │ fn(ctx,e) │  │
//! │  │ EnterCvWrite       │ fn(ctx)->Opt<> │ fn(ctx,e) │  │
//! │  └────────────────────┴────────────────┴───────────┘  │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! Each event goes to `on_event` of the **current** state.  If it returns
//! `Some(next_id)`, the engine updates the current pointer and runs
//! `on_enter` for the next state, all before `dispatch` returns.  Leaving a
//! screen is the job of the handler that decides to leave it.  An
//! `on_enter` may itself return a follow-up state (the POM write hands
//! straight back to address entry); such chains are bounded by the number
//! of states.

pub mod context;
pub mod states;

use context::CvContext;
use log::{info, warn};

use crate::events::CvEvent;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all CV programming states.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Idle = 0,
    EnterPomAddress = 1,
    EnterCvNumber = 2,
    EnterCvValueRead = 3,
    EnterCvValueChange = 4,
    EnterCvWrite = 5,
}

impl StateId {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 6;

    /// Convert an index back to `StateId`.  Panics on out-of-range in
    /// debug builds; returns `Idle` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::EnterPomAddress,
            2 => Self::EnterCvNumber,
            3 => Self::EnterCvValueRead,
            4 => Self::EnterCvValueChange,
            5 => Self::EnterCvWrite,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Idle
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter`.  Runs once on each transition into the state;
/// returns `Some(next)` to move on immediately.
pub type StateEnterFn = fn(&mut CvContext) -> Option<StateId>;

/// Signature for the per-event handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateEventFn = fn(&mut CvContext, &CvEvent) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateEnterFn>,
    pub on_event: StateEventFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table and the current state.  The [`CvContext`] is
/// owned by the caller and threaded through every handler call.
pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// Index of the currently active state.
    current: usize,
    /// Events dispatched since construction.
    dispatch_count: u64,
    /// Transitions executed since construction.
    transition_count: u64,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        debug_assert!(
            table.iter().enumerate().all(|(i, d)| d.id as usize == i),
            "state table out of order"
        );
        Self {
            table,
            current: initial as usize,
            dispatch_count: 0,
            transition_count: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `dispatch()`.
    pub fn start(&mut self, ctx: &mut CvContext) {
        info!("CV FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            if let Some(next) = enter(ctx) {
                self.transition(next, ctx);
            }
        }
    }

    /// Deliver one event.
    ///
    /// 1. Call `on_event` for the current state.
    /// 2. If it returns `Some(next)`, execute the transition:
    ///    update pointer → `on_enter(next)`, repeated while entries
    ///    request follow-ups.
    ///
    /// Returns the state the FSM ends up in.
    pub fn dispatch(&mut self, event: &CvEvent, ctx: &mut CvContext) -> StateId {
        self.dispatch_count += 1;

        if let Some(next) = (self.table[self.current].on_event)(ctx, event) {
            self.transition(next, ctx);
        }

        self.current_state()
    }

    /// Force an immediate transition regardless of the current handler.
    pub fn force_transition(&mut self, next: StateId, ctx: &mut CvContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    /// Human-readable name of the current state.
    pub fn current_name(&self) -> &'static str {
        self.table[self.current].name
    }

    pub fn dispatch_count(&self) -> u64 {
        self.dispatch_count
    }

    pub fn transitions(&self) -> u64 {
        self.transition_count
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, first: StateId, ctx: &mut CvContext) {
        let mut next = Some(first);
        let mut hops = 0;

        while let Some(next_id) = next {
            if hops == StateId::COUNT {
                warn!(
                    "CV FSM: entry chain did not settle, staying in {}",
                    self.table[self.current].name
                );
                break;
            }
            hops += 1;

            let next_idx = next_id as usize;
            info!(
                "CV FSM transition: {} -> {}",
                self.table[self.current].name, self.table[next_idx].name
            );

            self.current = next_idx;
            self.transition_count += 1;

            // Enter new state
            next = self.table[self.current].on_enter.and_then(|enter| enter(ctx));
        }
    }
}
