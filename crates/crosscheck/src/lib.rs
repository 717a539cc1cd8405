//! Command-line front end for the cross-check analysis engine
//!
//! The binary loads a scenario, runs one analysis and prints either a
//! fixed-precision table or JSON. Everything it does is reachable from this
//! library so it can be tested without spawning a process.

#![warn(clippy::all)]

pub mod commands;
pub mod config;
pub mod logging;
pub mod render;

pub use commands::OutputFormat;
pub use config::{RecordEntry, ScenarioConfig, load_records};
pub use logging::init_logging;
