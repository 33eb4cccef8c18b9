//! Monitor detection and identification.
//!
//! Parses `ddcutil detect` output into [`Monitor`] records carrying a stable
//! identifier derived from manufacturer, model, and serial number. Stable ids
//! persist across reboots and I2C bus renumbering, unlike raw bus paths.
//!
//! The detect report is a sequence of device blocks, each introduced by an
//! `I2C bus:` line and followed by identity fields in no guaranteed order,
//! interleaved with lines we don't care about:
//!
//! ```text
//! Display 1
//!    I2C bus:  /dev/i2c-4
//!    DRM connector:        card1-DP-3
//!    Mfg id:               DEL
//!    Model:                DELL U3419W
//!    Serial number:        9B6SWP2
//! ```
//!
//! Blocks missing any of the four required fields are dropped; an incomplete
//! block is a malformed device report, not an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::ddc::{self, DdcError, Exec, SystemExec};


static BUS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"I2C bus:\s+(/dev/i2c-\d+)").expect("valid bus regex"));
static MFG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Mfg id:\s+(\w+)").expect("valid mfg regex"));
static MODEL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Model:\s+(.+)").expect("valid model regex"));
static SERIAL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Serial number:\s+(.+)").expect("valid serial regex"));

/// A detected monitor with stable identification.
///
/// The bus path is the monitor's current location, not its identity: it can
/// change across reboots while `stable_id` stays constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monitor {
    pub manufacturer: String,
    pub model: String,
    pub serial: String,
    pub i2c_bus: String,
    pub stable_id: String,
}

impl Monitor {
    fn new(manufacturer: String, model: String, serial: String, i2c_bus: String) -> Self {
        let stable_id = format!("{manufacturer}-{model}-{serial}");
        Self {
            manufacturer,
            model,
            serial,
            i2c_bus,
            stable_id,
        }
    }

    /// Trailing segment of the bus path, e.g. "4" for "/dev/i2c-4".
    fn bus_suffix(&self) -> &str {
        self.i2c_bus.rsplit('-').next().unwrap_or("")
    }
}

/// One device block under construction while scanning the detect report.
#[derive(Default)]
struct PartialBlock {
    i2c_bus: String,
    manufacturer: Option<String>,
    model: Option<String>,
    serial: Option<String>,
}

impl PartialBlock {
    fn start(i2c_bus: String) -> Self {
        Self {
            i2c_bus,
            ..Self::default()
        }
    }

    /// Promote to a full Monitor, or None if any field never appeared.
    fn finalize(self) -> Option<Monitor> {
        Some(Monitor::new(
            self.manufacturer?,
            self.model?,
            self.serial?,
            self.i2c_bus,
        ))
    }
}

/// Run `ddcutil detect` and parse the report into monitors.
///
/// Uses a reduced sleep multiplier to keep the detection pass fast; the
/// full pass is still bounded by the 30-second detection timeout.
pub fn detect_monitors() -> Result<Vec<Monitor>, DdcError> {
    detect_monitors_with(&SystemExec)
}

/// Detection against an arbitrary executor (used by tests).
pub fn detect_monitors_with(exec: &dyn Exec) -> Result<Vec<Monitor>, DdcError> {
    let report = ddc::detect_report(exec)?;
    Ok(parse_detect_output(&report))
}

/// Parse `ddcutil detect` output into monitors sorted by stable id.
///
/// Malformed input never fails: blocks missing required fields are dropped,
/// unrelated lines are skipped, and empty input yields an empty list.
pub fn parse_detect_output(output: &str) -> Vec<Monitor> {
    let mut monitors = Vec::new();
    let mut current: Option<PartialBlock> = None;

    for line in output.lines() {
        // A bus line starts a new device block
        if let Some(captures) = BUS_PATTERN.captures(line) {
            if let Some(monitor) = current.take().and_then(PartialBlock::finalize) {
                monitors.push(monitor);
            }
            current = Some(PartialBlock::start(captures[1].to_string()));
            continue;
        }

        let Some(block) = current.as_mut() else {
            continue;
        };

        // Identity fields may appear in any order; a repeated field line
        // simply overwrites the previous value
        if let Some(captures) = MFG_PATTERN.captures(line) {
            block.manufacturer = Some(captures[1].trim().to_string());
        } else if let Some(captures) = MODEL_PATTERN.captures(line) {
            block.model = Some(captures[1].trim().to_string());
        } else if let Some(captures) = SERIAL_PATTERN.captures(line) {
            block.serial = Some(captures[1].trim().to_string());
        }
    }

    if let Some(monitor) = current.and_then(PartialBlock::finalize) {
        monitors.push(monitor);
    }

    monitors.sort_by(|a, b| a.stable_id.cmp(&b.stable_id));
    disambiguate_ids(&mut monitors);
    monitors
}

/// Append `-bus<N>` to repeated stable ids so the sorted list is unique.
///
/// Single pass only: if three or more monitors share identical identity
/// fields, later duplicates stay unique only when their bus numbers differ
/// after the suffix is applied.
fn disambiguate_ids(monitors: &mut [Monitor]) {
    let mut seen: HashSet<String> = HashSet::new();
    for monitor in monitors.iter_mut() {
        if seen.contains(&monitor.stable_id) {
            monitor.stable_id = format!("{}-bus{}", monitor.stable_id, monitor.bus_suffix());
        }
        seen.insert(monitor.stable_id.clone());
    }
}
