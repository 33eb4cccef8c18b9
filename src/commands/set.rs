//! Set and step commands: absolute and relative brightness changes.

use anyhow::Result;

use crate::args::StepDirection;
use crate::cache::MonitorCache;
use crate::config::Config;
use crate::constants::{BRIGHTNESS_MAX, BRIGHTNESS_MIN, DEFAULT_MAX_RETRIES};
use crate::ddc;

/// Handle the set command: apply an absolute brightness value.
///
/// Range validation happens in the controller before any external call, so
/// an out-of-range value from the command line surfaces as the same typed
/// error a library caller would see.
pub fn handle_set_command(value: i32, monitor: Option<&str>, debug_enabled: bool) -> Result<()> {
    log_version!();

    let config = Config::load()?;
    let cache = MonitorCache::new(config.cache_duration());

    let target = super::select_monitor(&cache, &config, monitor, debug_enabled)?;
    ddc::set_brightness(&target.i2c_bus, value, DEFAULT_MAX_RETRIES)?;

    log_block_start!("Brightness set to {value}% on {}", target.stable_id);
    log_end!();
    Ok(())
}

/// Handle the up/down commands: read the current value, move by the step,
/// clamp to the valid range, and write the result back.
pub fn handle_step_command(
    direction: StepDirection,
    step: Option<u8>,
    monitor: Option<&str>,
    debug_enabled: bool,
) -> Result<()> {
    log_version!();

    let config = Config::load()?;
    let step = i32::from(step.unwrap_or_else(|| config.step()));
    let cache = MonitorCache::new(config.cache_duration());

    let target = super::select_monitor(&cache, &config, monitor, debug_enabled)?;
    let current = i32::from(ddc::get_brightness(&target.i2c_bus, DEFAULT_MAX_RETRIES)?);

    let desired = match direction {
        StepDirection::Up => current + step,
        StepDirection::Down => current - step,
    };
    let clamped = desired.clamp(BRIGHTNESS_MIN, BRIGHTNESS_MAX);

    if clamped == current {
        log_block_start!("Brightness already at {current}% on {}", target.stable_id);
        log_end!();
        return Ok(());
    }

    ddc::set_brightness(&target.i2c_bus, clamped, DEFAULT_MAX_RETRIES)?;

    log_block_start!(
        "Brightness {current}% -> {clamped}% on {}",
        target.stable_id
    );
    log_end!();
    Ok(())
}
