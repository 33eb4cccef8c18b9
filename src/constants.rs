//! Shared constants for timeouts, retries, and configuration bounds.

use std::time::Duration;

/// Name of the external DDC/CI control binary.
pub const DDCUTIL_BIN: &str = "ddcutil";

/// VCP feature code for brightness (MCCS 0x10).
pub const VCP_BRIGHTNESS: u8 = 0x10;

/// Sleep multiplier passed to `ddcutil detect` to cut inter-step delays.
pub const DETECT_SLEEP_MULTIPLIER: &str = ".1";

/// Timeout for a full `ddcutil detect` pass.
pub const DETECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for a single getvcp/setvcp invocation.
pub const VCP_TIMEOUT: Duration = Duration::from_secs(5);

/// Backoff between retries of a failed (but retriable) ddcutil call.
pub const RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// Default number of attempts for a brightness operation.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default cache TTL in seconds.
pub const DEFAULT_CACHE_DURATION_SECS: u64 = 60;
pub const MINIMUM_CACHE_DURATION_SECS: u64 = 5;
pub const MAXIMUM_CACHE_DURATION_SECS: u64 = 3600;

/// Default brightness step for the up/down commands, in percent.
pub const DEFAULT_STEP: u8 = 10;
pub const MINIMUM_STEP: u8 = 1;
pub const MAXIMUM_STEP: u8 = 50;

/// Inclusive brightness range accepted by setvcp.
pub const BRIGHTNESS_MIN: i32 = 0;
pub const BRIGHTNESS_MAX: i32 = 100;
