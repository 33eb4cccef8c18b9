//! CLI command handlers.
//!
//! Each subcommand is implemented in its own submodule. The shared logic
//! here is monitor selection: load the monitor list (cache first, detection
//! on a miss), resolve the user's selector against it, and fall back to one
//! forced re-detection when a selector misses a cached list — the cache may
//! describe monitors that have since been unplugged or renumbered.

pub mod detect;
pub mod get;
pub mod help;
pub mod list;
pub mod set;

use anyhow::{Result, anyhow, bail};

use crate::cache::MonitorCache;
use crate::config::Config;
use crate::monitor::{self, Monitor};

/// Load the monitor list, serving the cache while fresh and falling back to
/// a detection pass (which repopulates the cache). Returns whether the list
/// came from the cache.
pub(crate) fn load_monitors(
    cache: &MonitorCache,
    debug_enabled: bool,
) -> Result<(Vec<Monitor>, bool)> {
    if let Some(monitors) = cache.get() {
        if debug_enabled {
            log_debug!("Using cached monitor list ({} found)", monitors.len());
        }
        return Ok((monitors, true));
    }

    if debug_enabled {
        log_debug!("Cache miss, running ddcutil detect");
    }
    let monitors = monitor::detect_monitors()?;
    cache.set(&monitors);
    Ok((monitors, false))
}

/// Resolve the target monitor for a brightness operation.
///
/// The selector is the -m argument, falling back to the configured
/// default_monitor. A selector that misses against a cached list triggers
/// one invalidate-and-redetect pass before giving up.
pub(crate) fn select_monitor(
    cache: &MonitorCache,
    config: &Config,
    selector: Option<&str>,
    debug_enabled: bool,
) -> Result<Monitor> {
    let selector = selector.or(config.default_monitor.as_deref());

    let (monitors, from_cache) = load_monitors(cache, debug_enabled)?;
    match resolve_monitor(&monitors, selector) {
        Ok(monitor) => Ok(monitor),
        Err(_) if from_cache => {
            if debug_enabled {
                log_debug!("Selector missed the cached list, re-detecting");
            }
            cache.invalidate();
            let fresh = monitor::detect_monitors()?;
            cache.set(&fresh);
            resolve_monitor(&fresh, selector)
        }
        Err(e) => Err(e),
    }
}

/// Match a selector (1-based index, stable id, or unambiguous stable-id
/// prefix) against the sorted monitor list.
pub(crate) fn resolve_monitor(monitors: &[Monitor], selector: Option<&str>) -> Result<Monitor> {
    if monitors.is_empty() {
        bail!(
            "No monitors detected. Check that DDC/CI is enabled in your monitor's on-screen menu."
        );
    }

    let Some(selector) = selector else {
        if monitors.len() == 1 {
            return Ok(monitors[0].clone());
        }
        bail!(
            "Multiple monitors detected; select one with -m <index|id>:\n{}",
            candidate_list(monitors)
        );
    };

    if let Ok(index) = selector.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| monitors.get(i))
            .cloned()
            .ok_or_else(|| {
                anyhow!(
                    "Monitor index {} is out of range (1-{}):\n{}",
                    selector,
                    monitors.len(),
                    candidate_list(monitors)
                )
            });
    }

    let matches: Vec<&Monitor> = monitors
        .iter()
        .filter(|m| m.stable_id.starts_with(selector))
        .collect();

    match matches.as_slice() {
        [only] => Ok((*only).clone()),
        [] => bail!(
            "No monitor matches '{}':\n{}",
            selector,
            candidate_list(monitors)
        ),
        _ => bail!(
            "'{}' is ambiguous, it matches {} monitors:\n{}",
            selector,
            matches.len(),
            candidate_list(monitors)
        ),
    }
}

/// Numbered selector listing for error messages.
fn candidate_list(monitors: &[Monitor]) -> String {
    monitors
        .iter()
        .enumerate()
        .map(|(index, m)| format!("  {}. {} ({})", index + 1, m.stable_id, m.i2c_bus))
        .collect::<Vec<_>>()
        .join("\n")
}
