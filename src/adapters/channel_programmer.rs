//! Programmer adapter backed by an `embassy-sync` channel.
//!
//! The control loop submits requests without blocking; the command-station
//! driver task drains the same channel and answers with
//! [`CvResult`](crate::events::CvResult) events.
//!
//! ```text
//! ┌──────────────┐  CvProgRequest  ┌──────────────┐
//! │ Control Loop │───────────────▶│ Driver Task  │
//! │   (sync)     │                 │ (XpressNet…) │
//! └──────────────┘                 └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;

use crate::app::ports::ProgrammerPort;
use crate::error::ProgrammerError;
use crate::protocol::CvProgRequest;

/// Channel depth for outbound requests.  One request is outstanding at a
/// time, the extra slots absorb an exit racing a status poll.
pub const REQUEST_DEPTH: usize = 4;

/// Request channel: control loop → driver task.
pub type RequestChannel<M> = Channel<M, CvProgRequest, REQUEST_DEPTH>;

/// [`ProgrammerPort`] that pushes into a shared channel.
pub struct ChannelProgrammer<'a, M: RawMutex, const N: usize = REQUEST_DEPTH> {
    channel: &'a Channel<M, CvProgRequest, N>,
}

impl<'a, M: RawMutex, const N: usize> ChannelProgrammer<'a, M, N> {
    pub fn new(channel: &'a Channel<M, CvProgRequest, N>) -> Self {
        Self { channel }
    }
}

impl<M: RawMutex, const N: usize> ProgrammerPort for ChannelProgrammer<'_, M, N> {
    fn submit(&mut self, request: CvProgRequest) -> Result<(), ProgrammerError> {
        self.channel
            .try_send(request)
            .map_err(|_| ProgrammerError::QueueFull)
    }
}
