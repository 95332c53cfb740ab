//! Recording mock ports for integration tests.
//!
//! Every display call, submitted request and application event is kept in
//! order so tests can assert on the full history.

use cvprog::app::events::AppEvent;
use cvprog::app::ports::{DisplayPort, EventSink, ProgrammerPort};
use cvprog::app::service::CvService;
use cvprog::config::{CvConfig, TargetProfile};
use cvprog::error::{ProgrammerError, ProgrammingFault};
use cvprog::events::{CvEvent, ProgrammingMode, SessionEvent};
use cvprog::fsm::StateId;
use cvprog::fsm::context::{Color, DisplayCommand, StatusText};
use cvprog::protocol::{CvProgRequest, RequestKind};

// ── Display ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MockDisplay {
    pub calls: Vec<DisplayCommand>,
}

#[allow(dead_code)]
impl MockDisplay {
    pub fn last(&self) -> Option<&DisplayCommand> {
        self.calls.last()
    }

    pub fn statuses(&self) -> Vec<StatusText> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DisplayCommand::UpdateStatus { text, .. } => Some(*text),
                _ => None,
            })
            .collect()
    }
}

impl DisplayPort for MockDisplay {
    fn update_status(&mut self, text: StatusText, visible: bool, color: Color) {
        self.calls.push(DisplayCommand::UpdateStatus { text, visible, color });
    }

    fn show_number(&mut self, value: u16, initial: bool, pom: bool) {
        self.calls.push(DisplayCommand::ShowNumber { value, initial, pom });
    }

    fn show_value(&mut self, value: u8, initial: bool, pom: bool) {
        self.calls.push(DisplayCommand::ShowValue { value, initial, pom });
    }

    fn show_address(&mut self, value: u16, initial: bool, color: Color) {
        self.calls.push(DisplayCommand::ShowAddress { value, initial, color });
    }

    fn remove_number(&mut self, pom: bool) {
        self.calls.push(DisplayCommand::RemoveNumber { pom });
    }

    fn remove_value(&mut self, pom: bool) {
        self.calls.push(DisplayCommand::RemoveValue { pom });
    }
}

// ── Programmer ────────────────────────────────────────────────

#[derive(Default)]
pub struct MockProgrammer {
    pub requests: Vec<CvProgRequest>,
}

#[allow(dead_code)]
impl MockProgrammer {
    pub fn kinds(&self) -> Vec<RequestKind> {
        self.requests.iter().map(|r| r.kind).collect()
    }
}

impl ProgrammerPort for MockProgrammer {
    fn submit(&mut self, request: CvProgRequest) -> Result<(), ProgrammerError> {
        self.requests.push(request);
        Ok(())
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct MockSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl MockSink {
    pub fn faults(&self) -> Vec<ProgrammingFault> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Fault(f) => Some(*f),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for MockSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Harness ───────────────────────────────────────────────────

/// Service plus recording ports.
pub struct Bench {
    pub service: CvService,
    pub display: MockDisplay,
    pub programmer: MockProgrammer,
    pub sink: MockSink,
}

#[allow(dead_code)]
impl Bench {
    pub fn new(profile: TargetProfile) -> Self {
        let mut bench = Self {
            service: CvService::new(CvConfig::for_profile(profile)),
            display: MockDisplay::default(),
            programmer: MockProgrammer::default(),
            sink: MockSink::default(),
        };
        bench.service.start(&mut bench.sink);
        bench
    }

    /// Started bench with a session already open in `mode`.
    pub fn session(mode: ProgrammingMode, profile: TargetProfile) -> Self {
        let mut bench = Self::new(profile);
        bench.send(SessionEvent::Start(mode));
        bench
    }

    pub fn send(&mut self, event: impl Into<CvEvent>) -> StateId {
        self.service.dispatch(
            &event.into(),
            &mut self.display,
            &mut self.programmer,
            &mut self.sink,
        )
    }

    pub fn send_n(&mut self, event: impl Into<CvEvent>, count: usize) -> StateId {
        let event = event.into();
        let mut state = self.service.state();
        for _ in 0..count {
            state = self.send(event);
        }
        state
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.display.calls.clear();
        self.programmer.requests.clear();
        self.sink.events.clear();
    }
}
