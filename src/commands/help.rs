//! Help and version output.

/// Display general help.
pub fn display_help() {
    log_version!();
    log_block_start!("Usage: brightctl [OPTIONS] <COMMAND>");
    log_block_start!("Commands:");
    log_indented!("get, g              Print current brightness (bare number)");
    log_indented!("set, s <value>      Set brightness to an absolute value (0-100)");
    log_indented!("up, u [<step>]      Raise brightness by <step> percent");
    log_indented!("down [<step>]       Lower brightness by <step> percent");
    log_indented!("list, l [--json]    List detected monitors with stable ids");
    log_indented!("detect              Re-detect monitors, replacing the cache");
    log_block_start!("Options:");
    log_indented!("-m, --monitor <sel> Target monitor: 1-based index or stable-id prefix");
    log_indented!("-d, --debug         Show cache and detection details");
    log_indented!("-h, --help          Show this help");
    log_indented!("-V, --version       Show version");
    log_block_start!("Configuration: ~/.config/brightctl/brightctl.toml (optional)");
    log_indented!("step, cache_duration, default_monitor");
    log_end!();
}

/// Display version information.
pub fn display_version() {
    log_version!();
    log_block_start!("DDC/CI brightness control for external monitors via ddcutil");
    log_end!();
}
