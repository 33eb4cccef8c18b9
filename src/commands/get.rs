//! Get command: print the current brightness for the selected monitor.

use anyhow::Result;

use crate::cache::MonitorCache;
use crate::config::Config;
use crate::constants::DEFAULT_MAX_RETRIES;
use crate::ddc;

/// Handle the get command.
///
/// Prints a bare number on stdout so scripts and status bars can consume the
/// value directly; no version header or decoration.
pub fn handle_get_command(monitor: Option<&str>, debug_enabled: bool) -> Result<()> {
    let config = Config::load()?;
    let cache = MonitorCache::new(config.cache_duration());

    let target = super::select_monitor(&cache, &config, monitor, debug_enabled)?;
    let value = ddc::get_brightness(&target.i2c_bus, DEFAULT_MAX_RETRIES)?;

    println!("{value}");
    Ok(())
}
