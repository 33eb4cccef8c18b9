//! ddcutil invocation with bounded timeouts, retry, and error classification.
//!
//! Every operation here is a synchronous, blocking call that runs one
//! `ddcutil` subprocess per attempt. Failures are classified into the closed
//! set of [`DdcError`] variants by inspecting the exit status and diagnostic
//! text: permission problems, an unsupported feature, and a missing binary
//! fail immediately, while timeouts and unrecognized non-zero exits are
//! retried up to the attempt limit.
//!
//! No coordination is attempted between concurrent invocations targeting the
//! same monitor; the I2C bus serializes physical access.

use std::io;
use std::process::{Command, Stdio};
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use wait_timeout::ChildExt;

use crate::constants::{
    BRIGHTNESS_MAX, BRIGHTNESS_MIN, DDCUTIL_BIN, DETECT_SLEEP_MULTIPLIER, DETECT_TIMEOUT,
    RETRY_BACKOFF, VCP_BRIGHTNESS, VCP_TIMEOUT,
};
use crate::utils::current_user;

#[cfg(test)]
mod tests;

static BUS_NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"i2c-(\d+)").expect("valid bus number regex"));
static CURRENT_VALUE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"current value\s*=\s*(\d+)").expect("valid value regex"));

/// Typed failures for external ddcutil calls.
///
/// Variants carry enough context to be actionable on their own: permission
/// and missing-tool errors include remediation text, timeouts and command
/// failures name the affected bus or captured diagnostics.
#[derive(Debug, Error)]
pub enum DdcError {
    /// Brightness outside the accepted range; checked before any external call.
    #[error("brightness value must be 0-100, got {0}")]
    ValueOutOfRange(i32),

    /// Bus identifier without a parsable bus number; never retried.
    #[error("invalid I2C bus format: {0}")]
    InvalidBusPath(String),

    /// The kernel refused access to the I2C device; never retried.
    #[error(
        "permission denied accessing {bus}. Add user to i2c group: sudo usermod -aG i2c {user}\nThen log out and log back in."
    )]
    PermissionDenied { bus: String, user: String },

    /// The monitor rejected the brightness feature code; never retried.
    #[error("monitor on {bus} does not support DDC/CI brightness control (VCP 0x{code:02x})")]
    FeatureUnsupported { bus: String, code: u8 },

    /// ddcutil is not installed; never retried.
    #[error("ddcutil not found. Install with: sudo apt install ddcutil")]
    ToolMissing,

    /// Every attempt ran out the per-call deadline.
    #[error("ddcutil {command} timed out on {bus}")]
    Timeout { command: &'static str, bus: String },

    /// The command succeeded but its output did not contain a current value.
    #[error("failed to parse brightness from: {0}")]
    ParseFailure(String),

    /// Unclassified non-zero exit, surfaced after retries with diagnostics.
    #[error("ddcutil {command} failed: {stderr}")]
    CommandFailed { command: &'static str, stderr: String },

    /// `ddcutil detect` exited non-zero.
    #[error("ddcutil detect failed: {stderr}")]
    DetectFailed { stderr: String },

    /// `ddcutil detect` ran out its deadline.
    #[error("ddcutil detect timed out after {} seconds", DETECT_TIMEOUT.as_secs())]
    DetectTimeout,
}

/// Outcome of one external ddcutil invocation.
#[derive(Debug)]
pub enum ExecOutcome {
    /// The process ran to completion within the deadline.
    Completed {
        success: bool,
        stdout: String,
        stderr: String,
    },
    /// The deadline expired and the child was killed.
    TimedOut,
    /// The binary is not present on PATH.
    ToolMissing,
    /// Spawning or reaping failed for another reason.
    Io(io::Error),
}

/// Seam between the retry/classification logic and the operating system.
///
/// Production code uses [`SystemExec`]; tests substitute a mock to exercise
/// retry bounds and classification without a real ddcutil.
#[cfg_attr(test, mockall::automock)]
pub trait Exec {
    fn run(&self, args: &[String], timeout: Duration) -> ExecOutcome;
}

/// Runs ddcutil as a real subprocess.
pub struct SystemExec;

impl Exec for SystemExec {
    fn run(&self, args: &[String], timeout: Duration) -> ExecOutcome {
        let mut child = match Command::new(DDCUTIL_BIN)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return ExecOutcome::ToolMissing,
            Err(e) => return ExecOutcome::Io(e),
        };

        match child.wait_timeout(timeout) {
            Ok(Some(_)) => match child.wait_with_output() {
                Ok(output) => ExecOutcome::Completed {
                    success: output.status.success(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                },
                Err(e) => ExecOutcome::Io(e),
            },
            Ok(None) => {
                // Deadline expired: kill and reap before reporting the timeout
                let _ = child.kill();
                let _ = child.wait();
                ExecOutcome::TimedOut
            }
            Err(e) => ExecOutcome::Io(e),
        }
    }
}

/// Get the current brightness (0-100) for a monitor bus path.
pub fn get_brightness(i2c_bus: &str, max_retries: u32) -> Result<u8, DdcError> {
    get_brightness_with(&SystemExec, i2c_bus, max_retries)
}

/// Set brightness for a monitor bus path. The value is range-checked before
/// any external call is attempted.
pub fn set_brightness(i2c_bus: &str, value: i32, max_retries: u32) -> Result<(), DdcError> {
    set_brightness_with(&SystemExec, i2c_bus, value, max_retries)
}

/// getvcp against an arbitrary executor (used by tests).
pub fn get_brightness_with(
    exec: &dyn Exec,
    i2c_bus: &str,
    max_retries: u32,
) -> Result<u8, DdcError> {
    let bus_number = extract_bus_number(i2c_bus)?;
    let args = vec![
        "--bus".to_string(),
        bus_number.to_string(),
        "getvcp".to_string(),
        format!("0x{VCP_BRIGHTNESS:02x}"),
    ];

    for attempt in 1..=max_retries {
        match exec.run(&args, VCP_TIMEOUT) {
            ExecOutcome::Completed {
                success: true,
                stdout,
                ..
            } => return parse_current_value(&stdout),
            ExecOutcome::Completed {
                success: false,
                stderr,
                ..
            } => {
                classify_failure(i2c_bus, &stderr, true)?;
                if attempt == max_retries {
                    return Err(DdcError::CommandFailed {
                        command: "getvcp",
                        stderr: stderr.trim().to_string(),
                    });
                }
                std::thread::sleep(RETRY_BACKOFF);
            }
            ExecOutcome::TimedOut => {
                if attempt == max_retries {
                    return Err(DdcError::Timeout {
                        command: "getvcp",
                        bus: i2c_bus.to_string(),
                    });
                }
            }
            ExecOutcome::ToolMissing => return Err(DdcError::ToolMissing),
            ExecOutcome::Io(e) => {
                if attempt == max_retries {
                    return Err(DdcError::CommandFailed {
                        command: "getvcp",
                        stderr: e.to_string(),
                    });
                }
                std::thread::sleep(RETRY_BACKOFF);
            }
        }
    }

    // Reachable only with max_retries == 0
    Err(DdcError::CommandFailed {
        command: "getvcp",
        stderr: format!("gave up after {max_retries} attempts"),
    })
}

/// setvcp against an arbitrary executor (used by tests).
pub fn set_brightness_with(
    exec: &dyn Exec,
    i2c_bus: &str,
    value: i32,
    max_retries: u32,
) -> Result<(), DdcError> {
    if !(BRIGHTNESS_MIN..=BRIGHTNESS_MAX).contains(&value) {
        return Err(DdcError::ValueOutOfRange(value));
    }
    let bus_number = extract_bus_number(i2c_bus)?;
    let args = vec![
        "--bus".to_string(),
        bus_number.to_string(),
        "setvcp".to_string(),
        format!("0x{VCP_BRIGHTNESS:02x}"),
        value.to_string(),
    ];

    for attempt in 1..=max_retries {
        match exec.run(&args, VCP_TIMEOUT) {
            ExecOutcome::Completed { success: true, .. } => return Ok(()),
            ExecOutcome::Completed {
                success: false,
                stderr,
                ..
            } => {
                // Unlike the get path, an "invalid/unsupported" reply to a
                // write is left to the generic retry-then-fail handling
                classify_failure(i2c_bus, &stderr, false)?;
                if attempt == max_retries {
                    return Err(DdcError::CommandFailed {
                        command: "setvcp",
                        stderr: stderr.trim().to_string(),
                    });
                }
                std::thread::sleep(RETRY_BACKOFF);
            }
            ExecOutcome::TimedOut => {
                if attempt == max_retries {
                    return Err(DdcError::Timeout {
                        command: "setvcp",
                        bus: i2c_bus.to_string(),
                    });
                }
            }
            ExecOutcome::ToolMissing => return Err(DdcError::ToolMissing),
            ExecOutcome::Io(e) => {
                if attempt == max_retries {
                    return Err(DdcError::CommandFailed {
                        command: "setvcp",
                        stderr: e.to_string(),
                    });
                }
                std::thread::sleep(RETRY_BACKOFF);
            }
        }
    }

    Err(DdcError::CommandFailed {
        command: "setvcp",
        stderr: format!("gave up after {max_retries} attempts"),
    })
}

/// Run `ddcutil detect` once and return its stdout for parsing.
pub fn detect_report(exec: &dyn Exec) -> Result<String, DdcError> {
    let args = vec![
        "detect".to_string(),
        "--sleep-multiplier".to_string(),
        DETECT_SLEEP_MULTIPLIER.to_string(),
    ];
    match exec.run(&args, DETECT_TIMEOUT) {
        ExecOutcome::Completed {
            success: true,
            stdout,
            ..
        } => Ok(stdout),
        ExecOutcome::Completed {
            success: false,
            stderr,
            ..
        } => Err(DdcError::DetectFailed {
            stderr: stderr.trim().to_string(),
        }),
        ExecOutcome::TimedOut => Err(DdcError::DetectTimeout),
        ExecOutcome::ToolMissing => Err(DdcError::ToolMissing),
        ExecOutcome::Io(e) => Err(DdcError::DetectFailed {
            stderr: e.to_string(),
        }),
    }
}

/// Map a non-zero exit's stderr to a fatal error, or return Ok for outcomes
/// worth retrying. The unsupported-feature check applies to reads only.
fn classify_failure(i2c_bus: &str, stderr: &str, check_unsupported: bool) -> Result<(), DdcError> {
    let lower = stderr.to_lowercase();

    if lower.contains("permission denied") || lower.contains("errno 13") {
        return Err(DdcError::PermissionDenied {
            bus: i2c_bus.to_string(),
            user: current_user(),
        });
    }

    if check_unsupported && (lower.contains("invalid") || lower.contains("unsupported")) {
        return Err(DdcError::FeatureUnsupported {
            bus: i2c_bus.to_string(),
            code: VCP_BRIGHTNESS,
        });
    }

    Ok(())
}

/// Numeric bus number from an I2C bus path like "/dev/i2c-4".
fn extract_bus_number(i2c_bus: &str) -> Result<u32, DdcError> {
    BUS_NUMBER_PATTERN
        .captures(i2c_bus)
        .and_then(|captures| captures[1].parse().ok())
        .ok_or_else(|| DdcError::InvalidBusPath(i2c_bus.to_string()))
}

/// Pull the `current value = N` field out of getvcp output.
fn parse_current_value(stdout: &str) -> Result<u8, DdcError> {
    CURRENT_VALUE_PATTERN
        .captures(stdout)
        .and_then(|captures| captures[1].parse().ok())
        .ok_or_else(|| DdcError::ParseFailure(stdout.trim().to_string()))
}
