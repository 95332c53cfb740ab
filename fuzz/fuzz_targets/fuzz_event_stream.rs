//! Fuzz target: arbitrary event streams through `CvService`
//!
//! Decodes the input two bytes at a time into `CvEvent`s and verifies:
//! - No panics in any state
//! - Session fields never leave their configured ranges
//! - At most one request is submitted per dispatch
//!
//! cargo fuzz run fuzz_event_stream

#![no_main]

use libfuzzer_sys::fuzz_target;

use cvprog::app::events::AppEvent;
use cvprog::app::ports::{DisplayPort, EventSink, ProgrammerPort};
use cvprog::app::service::CvService;
use cvprog::config::{CvConfig, TargetProfile};
use cvprog::error::ProgrammerError;
use cvprog::events::{CvEvent, CvResult, Key, PressEvent, ProgrammingMode, SessionEvent};
use cvprog::fsm::context::{Color, StatusText};
use cvprog::protocol::CvProgRequest;

struct Null;

impl DisplayPort for Null {
    fn update_status(&mut self, _: StatusText, _: bool, _: Color) {}
    fn show_number(&mut self, _: u16, _: bool, _: bool) {}
    fn show_value(&mut self, _: u8, _: bool, _: bool) {}
    fn show_address(&mut self, _: u16, _: bool, _: Color) {}
    fn remove_number(&mut self, _: bool) {}
    fn remove_value(&mut self, _: bool) {}
}

impl EventSink for Null {
    fn emit(&mut self, _: &AppEvent) {}
}

#[derive(Default)]
struct CountingProgrammer {
    submitted: usize,
}

impl ProgrammerPort for CountingProgrammer {
    fn submit(&mut self, _: CvProgRequest) -> Result<(), ProgrammerError> {
        self.submitted += 1;
        Ok(())
    }
}

fn decode(tag: u8, arg: u8) -> CvEvent {
    match tag % 16 {
        0 => SessionEvent::Start(ProgrammingMode::CvDirect).into(),
        1 => SessionEvent::Start(ProgrammingMode::ProgramOnMain).into(),
        2 => SessionEvent::ExitRequested.into(),
        3 => CvEvent::turn(arg as i8),
        4 => CvEvent::push_turn(arg as i8),
        5 => PressEvent::Short.into(),
        6 => PressEvent::Normal.into(),
        7 => PressEvent::Long.into(),
        8 => PressEvent::Power.into(),
        9 => PressEvent::Key(Key::from_index(arg % 6).unwrap_or(Key::Plus1)).into(),
        10 => CvResult::Nack.into(),
        11 => CvResult::Data(arg).into(),
        12 => CvResult::Update.into(),
        13 => CvResult::ResponseNok.into(),
        14 => CvResult::ResponseBusy.into(),
        _ => CvResult::ResponseReady(arg).into(),
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&profile, stream)) = data.split_first() else {
        return;
    };
    let profile = if profile & 1 == 0 {
        TargetProfile::Constrained
    } else {
        TargetProfile::Extended
    };
    let config = CvConfig::for_profile(profile);
    let mut service = CvService::new(config.clone());
    service.start(&mut Null);

    for pair in stream.chunks_exact(2) {
        let mut programmer = CountingProgrammer::default();
        service.dispatch(&decode(pair[0], pair[1]), &mut Null, &mut programmer, &mut Null);
        assert!(programmer.submitted <= 1);

        let session = service.session();
        assert!(config.cv_number_range(session.mode).contains(session.cv_number));
        assert!(config.cv_value_range().contains(u16::from(session.cv_value)));
        assert!(config.pom_address_range().contains(session.pom_address));
    }
});
