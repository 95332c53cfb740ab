//! Plain-text session scripts for the bench.
//!
//! One command per line, `#` starts a comment:
//!
//! ```text
//! start cv            # or: start pom
//! turn 1              # fine, sign only
//! push-turn -1        # coarse
//! key 2               # keypad: 0..3 add 1/10/100/1000, 4 reset, 5 confirm
//! long                # also: short, normal, power, exit
//! data 7              # also: nack, nok, busy, ready N
//! tick 41             # N update ticks, default 1
//! station silent      # simulated decoder: answer, nack, silent
//! ```

use core::fmt;

use crate::events::{CvEvent, CvResult, Key, PressEvent, ProgrammingMode, SessionEvent};

use super::sim_station::SimMode;

/// One parsed script line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptLine {
    Event(CvEvent),
    /// Deliver this many update ticks.
    Tick(u16),
    Station(SimMode),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptErrorKind {
    UnknownCommand(String),
    MissingArgument(&'static str),
    BadArgument(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    /// 1-based line number.
    pub line: usize,
    pub kind: ScriptErrorKind,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ScriptErrorKind::UnknownCommand(cmd) => {
                write!(f, "line {}: unknown command '{}'", self.line, cmd)
            }
            ScriptErrorKind::MissingArgument(what) => {
                write!(f, "line {}: missing {}", self.line, what)
            }
            ScriptErrorKind::BadArgument(arg) => {
                write!(f, "line {}: bad argument '{}'", self.line, arg)
            }
        }
    }
}

impl std::error::Error for ScriptError {}

/// Parse a whole script.
pub fn parse_script(src: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    let mut lines = Vec::new();
    for (idx, raw) in src.lines().enumerate() {
        match parse_line(raw) {
            Ok(Some(line)) => lines.push(line),
            Ok(None) => {}
            Err(kind) => return Err(ScriptError { line: idx + 1, kind }),
        }
    }
    Ok(lines)
}

/// Parse one line; `None` for blank lines and comments.
pub fn parse_line(raw: &str) -> Result<Option<ScriptLine>, ScriptErrorKind> {
    let text = raw.split('#').next().unwrap_or("").trim();
    let mut words = text.split_whitespace();
    let Some(cmd) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    let event: CvEvent = match cmd {
        "start" => match required(arg, "mode")? {
            "cv" => SessionEvent::Start(ProgrammingMode::CvDirect).into(),
            "pom" => SessionEvent::Start(ProgrammingMode::ProgramOnMain).into(),
            other => return Err(ScriptErrorKind::BadArgument(other.into())),
        },
        "exit" => SessionEvent::ExitRequested.into(),
        "turn" => CvEvent::turn(number(required(arg, "delta")?)?),
        "push-turn" => CvEvent::push_turn(number(required(arg, "delta")?)?),
        "short" => PressEvent::Short.into(),
        "normal" => PressEvent::Normal.into(),
        "long" => PressEvent::Long.into(),
        "power" => PressEvent::Power.into(),
        "key" => {
            let text = required(arg, "key index")?;
            let key = Key::from_index(number(text)?)
                .ok_or_else(|| ScriptErrorKind::BadArgument(text.into()))?;
            PressEvent::Key(key).into()
        }
        "nack" => CvResult::Nack.into(),
        "nok" => CvResult::ResponseNok.into(),
        "busy" => CvResult::ResponseBusy.into(),
        "data" => CvResult::Data(number(required(arg, "value")?)?).into(),
        "ready" => CvResult::ResponseReady(number(required(arg, "value")?)?).into(),
        "tick" => {
            let count = arg.map(number::<u16>).transpose()?.unwrap_or(1);
            return Ok(Some(ScriptLine::Tick(count)));
        }
        "station" => {
            let mode = match required(arg, "station mode")? {
                "answer" => SimMode::Answer,
                "nack" => SimMode::Nack,
                "silent" => SimMode::Silent,
                other => return Err(ScriptErrorKind::BadArgument(other.into())),
            };
            return Ok(Some(ScriptLine::Station(mode)));
        }
        other => return Err(ScriptErrorKind::UnknownCommand(other.into())),
    };
    Ok(Some(ScriptLine::Event(event)))
}

fn required<'a>(arg: Option<&'a str>, what: &'static str) -> Result<&'a str, ScriptErrorKind> {
    arg.ok_or(ScriptErrorKind::MissingArgument(what))
}

fn number<T: core::str::FromStr>(text: &str) -> Result<T, ScriptErrorKind> {
    text.parse()
        .map_err(|_| ScriptErrorKind::BadArgument(text.into()))
}
