//! Display adapter that renders the handheld screen as log lines.
//!
//! Keeps a copy of what is currently visible so the bench can print a
//! summary and tests can look at the screen.

use log::info;

use crate::app::ports::DisplayPort;
use crate::fsm::context::{Color, StatusText};

/// Mirror of the visible fields.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Screen {
    pub status: Option<StatusText>,
    pub number: Option<u16>,
    pub value: Option<u8>,
    pub address: Option<u16>,
    /// Whether the address field is flagged red.
    pub address_alert: bool,
}

#[derive(Debug, Default)]
pub struct LogDisplay {
    screen: Screen,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }
}

fn status_label(text: StatusText) -> &'static str {
    match text {
        StatusText::CvProgramming => "CV programming",
        StatusText::PomProgramming => "POM programming",
        StatusText::ReadingCv => "Reading CV",
        StatusText::WritingCv => "Writing CV",
    }
}

impl DisplayPort for LogDisplay {
    fn update_status(&mut self, text: StatusText, visible: bool, color: Color) {
        self.screen.status = visible.then_some(text);
        info!("LCD   | status '{}' ({:?})", status_label(text), color);
    }

    fn show_number(&mut self, value: u16, initial: bool, pom: bool) {
        self.screen.number = Some(value);
        let layout = if pom { "POM " } else { "" };
        if initial {
            info!("LCD   | {}CV {}", layout, value);
        } else {
            info!("LCD   | {}CV {} (edit)", layout, value);
        }
    }

    fn show_value(&mut self, value: u8, initial: bool, pom: bool) {
        self.screen.value = Some(value);
        let layout = if pom { "POM " } else { "" };
        if initial {
            info!("LCD   | {}value {}", layout, value);
        } else {
            info!("LCD   | {}value {} (edit)", layout, value);
        }
    }

    fn show_address(&mut self, value: u16, initial: bool, color: Color) {
        self.screen.address = Some(value);
        self.screen.address_alert = color == Color::Red;
        info!("LCD   | loco {} ({:?}{})", value, color, if initial { ", first" } else { "" });
    }

    fn remove_number(&mut self, _pom: bool) {
        self.screen.number = None;
        info!("LCD   | CV number cleared");
    }

    fn remove_value(&mut self, _pom: bool) {
        self.screen.value = None;
        info!("LCD   | CV value cleared");
    }
}
