//! Tick-based deadlines of the read and write states.

use cvprog::config::TargetProfile;
use cvprog::error::ProgrammingFault;
use cvprog::events::{CvResult, PressEvent, ProgrammingMode};
use cvprog::fsm::StateId;
use cvprog::protocol::RequestKind;

use crate::mock_io::Bench;

fn reading(profile: TargetProfile) -> Bench {
    let mut b = Bench::session(ProgrammingMode::CvDirect, profile);
    b.send(PressEvent::Long);
    b.clear();
    b
}

fn writing(profile: TargetProfile) -> Bench {
    let mut b = Bench::session(ProgrammingMode::CvDirect, profile);
    b.send(PressEvent::Long);
    b.send(CvResult::Data(9));
    b.send(PressEvent::Long);
    assert_eq!(b.service.state(), StateId::EnterCvWrite);
    b.clear();
    b
}

#[test]
fn read_gives_up_after_41_ticks() {
    for profile in [TargetProfile::Constrained, TargetProfile::Extended] {
        let mut b = reading(profile);
        assert_eq!(b.service.config().read_timeout_ticks, 40);

        assert_eq!(b.send_n(CvResult::Update, 40), StateId::EnterCvValueRead);
        assert!(b.sink.faults().is_empty());
        assert_eq!(b.send(CvResult::Update), StateId::EnterCvValueChange);
        assert_eq!(b.service.session().cv_value, 0, "value unchanged");
        assert_eq!(b.sink.faults(), vec![ProgrammingFault::Timeout]);
    }
}

#[test]
fn read_polls_status_every_tick() {
    let mut b = reading(TargetProfile::Extended);
    b.send_n(CvResult::Update, 3);
    assert_eq!(
        b.programmer.kinds(),
        vec![RequestKind::StatusPoll, RequestKind::StatusPoll, RequestKind::StatusPoll]
    );
}

#[test]
fn busy_does_not_reset_read_counter() {
    let mut b = reading(TargetProfile::Extended);
    b.send_n(CvResult::Update, 30);
    b.send(CvResult::ResponseBusy);
    assert_eq!(b.send_n(CvResult::Update, 11), StateId::EnterCvValueChange);
}

#[test]
fn write_gives_up_after_21_ticks() {
    for profile in [TargetProfile::Constrained, TargetProfile::Extended] {
        let mut b = writing(profile);
        assert_eq!(b.send_n(CvResult::Update, 20), StateId::EnterCvWrite);
        assert!(b.programmer.requests.is_empty(), "no polling while writing");
        assert_eq!(b.send(CvResult::Update), StateId::EnterCvValueChange);
        assert_eq!(b.service.session().cv_value, 9);
        assert_eq!(b.sink.faults(), vec![ProgrammingFault::Timeout]);
    }
}

#[test]
fn retry_after_write_timeout_restarts_counter() {
    let mut b = writing(TargetProfile::Extended);
    b.send_n(CvResult::Update, 21);
    assert_eq!(b.send(PressEvent::Long), StateId::EnterCvWrite);
    assert_eq!(b.service.session().timeout_count, 0);
    assert_eq!(b.send_n(CvResult::Update, 20), StateId::EnterCvWrite);
}

#[test]
fn ticks_outside_waiting_states_are_ignored() {
    let mut b = Bench::session(ProgrammingMode::CvDirect, TargetProfile::Extended);
    b.clear();
    assert_eq!(b.send_n(CvResult::Update, 100), StateId::EnterCvNumber);
    assert!(b.programmer.requests.is_empty());
    assert!(b.display.calls.is_empty());
    assert_eq!(b.service.session().timeout_count, 0);
}
