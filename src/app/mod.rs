//! Application core: pure domain logic, zero I/O.
//!
//! This module wraps the CV programming FSM in a service that the outer
//! application drives.  All interaction with the display and the
//! command-station driver happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
