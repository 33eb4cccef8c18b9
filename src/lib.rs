//! # brightctl Library
//!
//! Internal library for the brightctl binary.
//!
//! This library exists to enable testing of the detection, caching, and retry
//! internals and to provide clean separation between CLI dispatch (main.rs)
//! and application logic.
//!
//! ## Architecture
//!
//! - **Monitors**: `monitor` module parses `ddcutil detect` output into
//!   [`monitor::Monitor`] records with stable identifiers that survive I2C
//!   bus renumbering and reboots
//! - **Caching**: `cache` module persists the sorted monitor list to a
//!   per-user temp file with a short TTL so repeated invocations (one per
//!   keypress) skip the expensive detection pass
//! - **Control**: `ddc` module wraps `ddcutil` getvcp/setvcp calls with
//!   bounded timeouts, retry, and typed error classification
//! - **Configuration**: `config` module for optional TOML-based settings
//! - **Commands**: `commands` module for CLI subcommands (get, set, up,
//!   down, list, detect)
//! - **Infrastructure**: argument parsing, logging, and shared constants

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod cache;
pub mod commands;
pub mod config;
pub mod constants;
pub mod ddc;
pub mod monitor;
pub mod utils;
