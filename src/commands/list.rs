//! List command: show detected monitors with their stable ids.

use anyhow::Result;

use crate::cache::MonitorCache;
use crate::config::Config;

/// Handle the list command.
///
/// With --json, prints the monitor array as JSON on stdout and nothing else.
pub fn handle_list_command(json: bool, debug_enabled: bool) -> Result<()> {
    let config = Config::load()?;
    let cache = MonitorCache::new(config.cache_duration());

    let (monitors, from_cache) = super::load_monitors(&cache, debug_enabled)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&monitors)?);
        return Ok(());
    }

    log_version!();

    if monitors.is_empty() {
        log_block_start!("No monitors detected");
        log_indented!("Check cables and that DDC/CI is enabled in the monitor's menu");
        log_end!();
        return Ok(());
    }

    let source = if from_cache { " (cached)" } else { "" };
    log_block_start!("Detected {} monitor(s){source}", monitors.len());
    for (index, monitor) in monitors.iter().enumerate() {
        log_indented!("{}. {} ({})", index + 1, monitor.stable_id, monitor.i2c_bus);
    }
    log_end!();
    Ok(())
}
