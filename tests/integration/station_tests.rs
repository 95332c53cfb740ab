//! Service wired to the channel programmer and the simulated station, the
//! way the bench runs it.

use cvprog::adapters::channel_programmer::{ChannelProgrammer, RequestChannel};
use cvprog::adapters::console_display::LogDisplay;
use cvprog::adapters::log_sink::LogEventSink;
use cvprog::adapters::script::{ScriptLine, parse_script};
use cvprog::adapters::sim_station::SimStation;
use cvprog::app::service::CvService;
use cvprog::config::CvConfig;
use cvprog::events::{CvResult, EventQueue};
use cvprog::fsm::StateId;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;

struct Rig {
    service: CvService,
    display: LogDisplay,
    sink: LogEventSink,
    station: SimStation,
    queue: EventQueue,
}

impl Rig {
    fn new() -> Self {
        let mut sink = LogEventSink::new();
        let mut service = CvService::new(CvConfig::default());
        service.start(&mut sink);
        Self {
            service,
            display: LogDisplay::new(),
            sink,
            station: SimStation::new(),
            queue: EventQueue::new(),
        }
    }

    fn run(&mut self, script: &str) {
        let channel: RequestChannel<NoopRawMutex> = Channel::new();
        let mut programmer = ChannelProgrammer::new(&channel);
        for line in parse_script(script).unwrap() {
            let (event, repeat) = match line {
                ScriptLine::Event(event) => (event, 1),
                ScriptLine::Tick(n) => (CvResult::Update.into(), n),
                ScriptLine::Station(mode) => {
                    self.station.set_mode(mode);
                    continue;
                }
            };
            for _ in 0..repeat {
                self.queue.push(event);
                loop {
                    self.service.process_queue(
                        &mut self.queue,
                        &mut self.display,
                        &mut programmer,
                        &mut self.sink,
                    );
                    while let Ok(request) = channel.try_receive() {
                        self.station.handle(request, &mut self.queue);
                    }
                    if self.queue.is_empty() {
                        break;
                    }
                }
            }
        }
    }
}

#[test]
fn read_answered_by_station() {
    let mut rig = Rig::new();
    rig.run("start cv\nkey 2\nkey 1\nkey 5\n");
    // CV 111 reads 0 from a blank decoder; CV29 reads 6.
    assert_eq!(rig.service.state(), StateId::EnterCvValueChange);
    rig.run("short\nkey 4\npush-turn 1\npush-turn 1\nturn 1\nturn 1\nturn 1\nturn 1\nturn 1\nturn 1\nturn 1\nturn 1\nlong\n");
    assert_eq!(rig.service.session().cv_number, 29);
    assert_eq!(rig.service.session().cv_value, 6);
    assert_eq!(rig.display.screen().value, Some(6));
}

#[test]
fn written_value_lands_in_decoder() {
    let mut rig = Rig::new();
    rig.run("start cv\nturn 1\nturn 1\nlong\nkey 0\nkey 1\nlong\n");
    assert_eq!(rig.service.state(), StateId::EnterCvNumber);
    assert_eq!(rig.station.cv(3), Some(11));
    assert_eq!(rig.sink.faults(), 0);
}

#[test]
fn silent_decoder_times_out() {
    let mut rig = Rig::new();
    rig.run("station silent\nstart cv\nlong\ntick 40\n");
    assert_eq!(rig.service.state(), StateId::EnterCvValueRead);
    rig.run("tick\n");
    assert_eq!(rig.service.state(), StateId::EnterCvValueChange);
    assert_eq!(rig.sink.faults(), 1);
}

#[test]
fn busy_station_answers_through_polls() {
    let mut rig = Rig::new();
    rig.station.set_busy_polls(3);
    // Three busy answers, one per tick; the fourth poll completes the read.
    rig.run("start cv\nlong\ntick 3\n");
    assert_eq!(rig.service.state(), StateId::EnterCvValueRead);
    rig.run("tick\n");
    assert_eq!(rig.service.state(), StateId::EnterCvValueChange);
    assert_eq!(rig.service.session().cv_value, 3);
}

#[test]
fn single_busy_poll_still_delays_read() {
    let mut rig = Rig::new();
    rig.station.set_busy_polls(1);
    rig.run("start cv\nlong\ntick\n");
    assert_eq!(rig.service.state(), StateId::EnterCvValueRead);
    rig.run("tick\n");
    assert_eq!(rig.service.state(), StateId::EnterCvValueChange);
}

#[test]
fn pom_write_reaches_locomotive() {
    let mut rig = Rig::new();
    rig.run("start pom\nkey 0\nkey 0\nlong\npush-turn 1\npush-turn 1\nkey 1\nlong\nkey 2\nlong\n");
    assert_eq!(rig.service.state(), StateId::EnterPomAddress);
    assert_eq!(rig.station.pom_value(3, 31), Some(100));
    assert!(!rig.station.in_programming());
}
