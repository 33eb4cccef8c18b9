//! Detect command: force a fresh detection pass, replacing the cache.

use anyhow::Result;

use crate::cache::MonitorCache;
use crate::config::Config;
use crate::monitor;

/// Handle the detect command.
///
/// Invalidates the cache first so a concurrent invocation cannot serve the
/// old list while detection runs, then stores the fresh result.
pub fn handle_detect_command(debug_enabled: bool) -> Result<()> {
    log_version!();

    let config = Config::load()?;
    let cache = MonitorCache::new(config.cache_duration());
    cache.invalidate();

    log_block_start!("Detecting monitors...");
    let monitors = monitor::detect_monitors()?;
    cache.set(&monitors);

    if debug_enabled {
        log_debug!("Cached {} monitor(s)", monitors.len());
    }

    if monitors.is_empty() {
        log_decorated!("No monitors detected");
    } else {
        for (index, monitor) in monitors.iter().enumerate() {
            log_indented!("{}. {} ({})", index + 1, monitor.stable_id, monitor.i2c_bus);
        }
    }
    log_end!();
    Ok(())
}
