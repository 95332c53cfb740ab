//! Integration tests for full programming sessions through `CvService`.

use cvprog::app::events::AppEvent;
use cvprog::config::TargetProfile;
use cvprog::error::ProgrammingFault;
use cvprog::events::{CvEvent, CvResult, Key, PressEvent, ProgrammingMode, SessionEvent};
use cvprog::fsm::StateId;
use cvprog::fsm::context::{Color, DisplayCommand, StatusText};
use cvprog::protocol::{CvProgRequest, RequestKind};

use crate::mock_io::Bench;

fn cv_bench() -> Bench {
    Bench::session(ProgrammingMode::CvDirect, TargetProfile::Extended)
}

fn pom_bench() -> Bench {
    Bench::session(ProgrammingMode::ProgramOnMain, TargetProfile::Extended)
}

// ── Direct mode ───────────────────────────────────────────────

#[test]
fn read_cv3_then_edit_value() {
    let mut b = cv_bench();
    assert_eq!(b.service.state(), StateId::EnterCvNumber);
    assert_eq!(b.service.session().cv_number, 1);

    b.send(CvEvent::turn(1));
    b.send(CvEvent::turn(1));
    assert_eq!(b.service.session().cv_number, 3);

    b.clear();
    assert_eq!(b.send(PressEvent::Long), StateId::EnterCvValueRead);
    assert_eq!(b.programmer.requests, vec![CvProgRequest::new(RequestKind::Read, 1, 3, 0)]);
    assert_eq!(b.display.statuses(), vec![StatusText::ReadingCv]);

    assert_eq!(b.send(CvResult::Data(7)), StateId::EnterCvValueChange);
    assert_eq!(b.service.session().cv_value, 7);
    assert_eq!(
        b.display.last(),
        Some(&DisplayCommand::ShowValue { value: 7, initial: true, pom: false })
    );
}

#[test]
fn write_cycle_returns_to_number_entry() {
    let mut b = cv_bench();
    b.send(PressEvent::Key(Key::Plus10));
    b.send(PressEvent::Key(Key::Plus10));
    b.send(PressEvent::Key(Key::Plus1));
    b.send(PressEvent::Key(Key::Plus1));
    b.send(PressEvent::Key(Key::Plus1));
    b.send(PressEvent::Key(Key::Plus1));
    b.send(PressEvent::Key(Key::Plus1));
    b.send(PressEvent::Key(Key::Plus1));
    b.send(PressEvent::Key(Key::Plus1));
    b.send(PressEvent::Key(Key::Plus1));
    assert_eq!(b.service.session().cv_number, 29);

    b.send(PressEvent::Key(Key::Confirm));
    b.send(CvResult::Data(6));
    b.send(CvEvent::turn(-1));
    assert_eq!(b.service.session().cv_value, 5);

    b.clear();
    assert_eq!(b.send(PressEvent::Normal), StateId::EnterCvWrite);
    assert_eq!(b.programmer.requests, vec![CvProgRequest::new(RequestKind::Write, 1, 29, 5)]);
    assert_eq!(b.display.statuses(), vec![StatusText::WritingCv]);

    b.clear();
    assert_eq!(b.send(CvResult::ResponseReady(5)), StateId::EnterCvNumber);
    assert_eq!(
        b.display.calls,
        vec![
            DisplayCommand::RemoveValue { pom: false },
            DisplayCommand::UpdateStatus {
                text: StatusText::CvProgramming,
                visible: true,
                color: Color::Green,
            },
            DisplayCommand::ShowNumber { value: 29, initial: true, pom: false },
        ]
    );
    assert!(b.programmer.requests.is_empty());
}

#[test]
fn read_nack_proceeds_with_held_value() {
    let mut b = cv_bench();
    b.send(PressEvent::Long);
    b.clear();
    assert_eq!(b.send(CvResult::Nack), StateId::EnterCvValueChange);
    assert_eq!(b.service.session().cv_value, 0);
    assert_eq!(b.sink.faults(), vec![ProgrammingFault::Nack]);
}

#[test]
fn busy_responses_keep_waiting() {
    let mut b = cv_bench();
    b.send(PressEvent::Long);
    b.clear();
    assert_eq!(b.send_n(CvResult::ResponseBusy, 5), StateId::EnterCvValueRead);
    assert!(b.programmer.requests.is_empty());
    assert!(b.display.calls.is_empty());
    assert_eq!(b.send(CvResult::ResponseReady(200)), StateId::EnterCvValueChange);
    assert_eq!(b.service.session().cv_value, 200);
}

#[test]
fn short_press_backs_out_one_screen_at_a_time() {
    let mut b = cv_bench();
    b.send(PressEvent::Long);
    b.send(CvResult::Data(1));
    assert_eq!(b.send(PressEvent::Short), StateId::EnterCvNumber);
    b.clear();
    assert_eq!(b.send(PressEvent::Short), StateId::Idle);
    assert_eq!(b.programmer.kinds(), vec![RequestKind::Exit]);
    assert!(!b.service.is_active());
}

// ── POM mode ──────────────────────────────────────────────────

#[test]
fn default_pom_address_is_refused() {
    let mut b = pom_bench();
    assert_eq!(b.service.session().pom_address, 1);
    b.clear();
    assert_eq!(b.send(PressEvent::Long), StateId::EnterPomAddress);
    assert_eq!(
        b.display.last(),
        Some(&DisplayCommand::ShowAddress { value: 1, initial: false, color: Color::Red })
    );
    assert_eq!(b.sink.faults(), vec![ProgrammingFault::InvalidEntry]);
    assert!(!b.sink.events.iter().any(|e| matches!(e, AppEvent::StateChanged { .. })));
}

#[test]
fn pom_write_sends_once_and_returns_to_address() {
    let mut b = pom_bench();
    b.send(PressEvent::Key(Key::Plus1000));
    b.send(PressEvent::Key(Key::Plus100));
    assert_eq!(b.service.session().pom_address, 1101);
    assert_eq!(b.send(PressEvent::Long), StateId::EnterCvNumber);
    b.send(CvEvent::push_turn(1));
    assert_eq!(b.service.session().cv_number, 11);
    assert_eq!(b.send(PressEvent::Long), StateId::EnterCvValueChange);
    b.send(CvEvent::turn(1));

    b.clear();
    assert_eq!(b.send(PressEvent::Long), StateId::EnterPomAddress);
    assert_eq!(
        b.programmer.requests,
        vec![CvProgRequest::new(RequestKind::PomWrite, 1101, 11, 1)]
    );
    assert_eq!(
        b.display.calls,
        vec![
            DisplayCommand::RemoveValue { pom: true },
            DisplayCommand::RemoveNumber { pom: true },
            DisplayCommand::ShowAddress { value: 1101, initial: true, color: Color::Green },
        ]
    );
    assert_eq!(
        b.sink.events.last(),
        Some(&AppEvent::StateChanged {
            from: StateId::EnterCvValueChange,
            to: StateId::EnterPomAddress,
        })
    );
}

#[test]
fn pom_value_screen_has_no_read() {
    let mut b = pom_bench();
    b.send(CvEvent::turn(1));
    b.send(PressEvent::Long);
    b.clear();
    b.send(PressEvent::Long);
    assert!(b.programmer.requests.is_empty());
    assert_eq!(b.service.state(), StateId::EnterCvValueChange);
    assert!(b.display.statuses().is_empty(), "POM keeps its status line");
}

// ── Exit ──────────────────────────────────────────────────────

#[test]
fn exit_request_from_anywhere_resets_session() {
    let mut b = pom_bench();
    b.send(CvEvent::turn(1));
    b.send(PressEvent::Long);
    b.send(CvEvent::turn(1));
    b.clear();
    assert_eq!(b.send(SessionEvent::ExitRequested), StateId::Idle);
    assert_eq!(b.programmer.kinds(), vec![RequestKind::Exit]);
    let session = b.service.session();
    assert_eq!(session.mode, ProgrammingMode::CvDirect);
    assert_eq!((session.cv_number, session.cv_value, session.pom_address), (1, 0, 1));
}

#[test]
fn exit_in_idle_sends_nothing() {
    let mut b = Bench::new(TargetProfile::Extended);
    b.send(PressEvent::Power);
    b.send(SessionEvent::ExitRequested);
    assert!(b.programmer.requests.is_empty());
    assert_eq!(b.service.state(), StateId::Idle);
}
