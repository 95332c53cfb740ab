//! Simulated command station for the bench and integration tests.
//!
//! Holds a decoder's CV memory and answers track requests by pushing
//! [`CvResult`] events onto the event queue, the way the real driver task
//! would.  POM writes land in a per-locomotive map and are never answered.

use std::collections::HashMap;

use log::{debug, info};

use crate::events::{CvResult, EventQueue};
use crate::protocol::{CvProgRequest, RequestKind};

/// Highest CV the simulated decoder stores.
pub const SIM_CV_COUNT: usize = 1024;

/// How the simulated decoder reacts to track requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimMode {
    /// Answer every read and write.
    #[default]
    Answer,
    /// Refuse every read and write.
    Nack,
    /// Say nothing; the caller's tick counter has to give up.
    Silent,
}

pub struct SimStation {
    mode: SimMode,
    /// Status polls answered with busy before a pending read completes.
    busy_polls: u8,
    /// Busy answers still owed and the value a pending read will return.
    pending_read: Option<(u8, u8)>,
    cvs: Box<[u8; SIM_CV_COUNT]>,
    pom: HashMap<(u16, u16), u8>,
    in_programming: bool,
}

impl SimStation {
    pub fn new() -> Self {
        let mut cvs = Box::new([0u8; SIM_CV_COUNT]);
        // Short address 3 and a typical CV29.
        cvs[0] = 3;
        cvs[28] = 6;
        Self {
            mode: SimMode::Answer,
            busy_polls: 0,
            pending_read: None,
            cvs,
            pom: HashMap::new(),
            in_programming: false,
        }
    }

    pub fn set_mode(&mut self, mode: SimMode) {
        info!("SIM   | decoder mode {:?}", mode);
        self.mode = mode;
    }

    /// Reads answer only after `polls` status polls, each answered busy.
    pub fn set_busy_polls(&mut self, polls: u8) {
        self.busy_polls = polls;
    }

    pub fn cv(&self, cv_number: u16) -> Option<u8> {
        Self::slot(cv_number).map(|i| self.cvs[i])
    }

    pub fn set_cv(&mut self, cv_number: u16, value: u8) {
        if let Some(i) = Self::slot(cv_number) {
            self.cvs[i] = value;
        }
    }

    /// Last value written on the main to `(address, cv_number)`.
    pub fn pom_value(&self, address: u16, cv_number: u16) -> Option<u8> {
        self.pom.get(&(address, cv_number)).copied()
    }

    /// Whether the track is in service mode (a read or write happened and
    /// no exit followed).
    pub fn in_programming(&self) -> bool {
        self.in_programming
    }

    fn slot(cv_number: u16) -> Option<usize> {
        let cv = usize::from(cv_number);
        (1..=SIM_CV_COUNT).contains(&cv).then(|| cv - 1)
    }

    /// Take one request and queue whatever the decoder answers.
    pub fn handle<const N: usize>(&mut self, request: CvProgRequest, queue: &mut EventQueue<N>) {
        debug!("SIM   | {}", request);
        match request.kind {
            RequestKind::Read => {
                self.in_programming = true;
                match self.mode {
                    SimMode::Answer => match (self.cv(request.cv_number), self.busy_polls) {
                        (Some(value), 0) => {
                            queue.push(CvResult::Data(value).into());
                        }
                        (Some(value), polls) => self.pending_read = Some((polls, value)),
                        (None, _) => {
                            queue.push(CvResult::Nack.into());
                        }
                    },
                    SimMode::Nack => {
                        queue.push(CvResult::Nack.into());
                    }
                    SimMode::Silent => {}
                }
            }
            RequestKind::StatusPoll => {
                match self.pending_read.take() {
                    Some((0, value)) => {
                        queue.push(CvResult::ResponseReady(value).into());
                    }
                    Some((polls, value)) => {
                        self.pending_read = Some((polls - 1, value));
                        queue.push(CvResult::ResponseBusy.into());
                    }
                    None => {}
                }
            }
            RequestKind::Write => {
                self.in_programming = true;
                match self.mode {
                    SimMode::Answer if Self::slot(request.cv_number).is_some() => {
                        self.set_cv(request.cv_number, request.cv_value);
                        queue.push(CvResult::ResponseReady(request.cv_value).into());
                    }
                    SimMode::Answer | SimMode::Nack => {
                        queue.push(CvResult::ResponseNok.into());
                    }
                    SimMode::Silent => {}
                }
            }
            RequestKind::PomWrite => {
                self.pom
                    .insert((request.address, request.cv_number), request.cv_value);
            }
            RequestKind::Exit => {
                self.in_programming = false;
                self.pending_read = None;
            }
        }
    }
}

impl Default for SimStation {
    fn default() -> Self {
        Self::new()
    }
}
