//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter              | Implements      | Connects to                  |
//! |----------------------|-----------------|------------------------------|
//! | `channel_programmer` | ProgrammerPort  | embassy-sync request channel |
//! | `console_display`    | DisplayPort     | log output (screen mirror)   |
//! | `log_sink`           | EventSink       | log output                   |
//! | `sim_station`        | (driver side)   | simulated decoder CV memory  |
//!
//! `script` supports the host bench.

pub mod channel_programmer;
pub mod console_display;
pub mod log_sink;
pub mod script;
pub mod sim_station;
