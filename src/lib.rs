//! CV programming controller for a DCC handheld.
//!
//! Drives the operator through reading and writing decoder configuration
//! variables, either on the programming track (direct mode, with read-back)
//! or on the main (POM, write only).  The core is a table-driven FSM behind
//! port traits; `adapters` holds the host-side implementations used by the
//! bench and the tests.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod fsm;
pub mod numeric;
pub mod protocol;
