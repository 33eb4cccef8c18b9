use super::*;
use crate::constants::{DETECT_TIMEOUT, VCP_TIMEOUT};
use mockall::Sequence;

const GETVCP_OUTPUT: &str = "VCP code 0x10 (Brightness                    ): current value =    42, max value =   100\n";

fn completed(success: bool, stdout: &str, stderr: &str) -> ExecOutcome {
    ExecOutcome::Completed {
        success,
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    }
}

#[test]
fn get_parses_current_value() {
    let mut mock = MockExec::new();
    mock.expect_run()
        .withf(|args, timeout| {
            args == ["--bus", "4", "getvcp", "0x10"] && *timeout == VCP_TIMEOUT
        })
        .times(1)
        .returning(|_, _| completed(true, GETVCP_OUTPUT, ""));

    let value = get_brightness_with(&mock, "/dev/i2c-4", 3).unwrap();
    assert_eq!(value, 42);
}

#[test]
fn get_times_out_after_exactly_max_retries() {
    let mut mock = MockExec::new();
    mock.expect_run()
        .times(3)
        .returning(|_, _| ExecOutcome::TimedOut);

    let err = get_brightness_with(&mock, "/dev/i2c-4", 3).unwrap_err();
    assert!(matches!(err, DdcError::Timeout { .. }));
    assert!(err.to_string().contains("/dev/i2c-4"));
}

#[test]
fn permission_denied_is_not_retried() {
    let mut mock = MockExec::new();
    mock.expect_run()
        .times(1)
        .returning(|_, _| completed(false, "", "open failed: Permission denied"));

    let err = get_brightness_with(&mock, "/dev/i2c-4", 3).unwrap_err();
    assert!(matches!(err, DdcError::PermissionDenied { .. }));
    assert!(err.to_string().contains("i2c group"));
}

#[test]
fn errno_13_also_classifies_as_permission_denied() {
    let mut mock = MockExec::new();
    mock.expect_run()
        .times(1)
        .returning(|_, _| completed(false, "", "ioctl failed, Errno 13"));

    let err = set_brightness_with(&mock, "/dev/i2c-4", 50, 3).unwrap_err();
    assert!(matches!(err, DdcError::PermissionDenied { .. }));
}

#[test]
fn unsupported_feature_fails_fast_on_get() {
    let mut mock = MockExec::new();
    mock.expect_run()
        .times(1)
        .returning(|_, _| completed(false, "", "Unsupported VCP feature code: 0x10"));

    let err = get_brightness_with(&mock, "/dev/i2c-4", 3).unwrap_err();
    assert!(matches!(err, DdcError::FeatureUnsupported { .. }));
}

#[test]
fn set_path_retries_through_unsupported_text() {
    // Only the read path classifies invalid/unsupported; a write keeps the
    // generic retry-then-fail handling
    let mut mock = MockExec::new();
    mock.expect_run()
        .times(3)
        .returning(|_, _| completed(false, "", "Unsupported VCP feature code: 0x10"));

    let err = set_brightness_with(&mock, "/dev/i2c-4", 50, 3).unwrap_err();
    assert!(matches!(err, DdcError::CommandFailed { .. }));
}

#[test]
fn generic_failure_retries_then_surfaces_diagnostics() {
    let mut mock = MockExec::new();
    mock.expect_run()
        .times(3)
        .returning(|_, _| completed(false, "", "DDC communication failed\n"));

    let err = get_brightness_with(&mock, "/dev/i2c-4", 3).unwrap_err();
    match err {
        DdcError::CommandFailed { command, stderr } => {
            assert_eq!(command, "getvcp");
            assert_eq!(stderr, "DDC communication failed");
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
}

#[test]
fn transient_failure_recovers_on_retry() {
    let mut seq = Sequence::new();
    let mut mock = MockExec::new();
    mock.expect_run()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| completed(false, "", "DDC communication failed"));
    mock.expect_run()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| completed(true, GETVCP_OUTPUT, ""));

    assert_eq!(get_brightness_with(&mock, "/dev/i2c-4", 3).unwrap(), 42);
}

#[test]
fn tool_missing_is_not_retried() {
    let mut mock = MockExec::new();
    mock.expect_run()
        .times(1)
        .returning(|_, _| ExecOutcome::ToolMissing);

    let err = get_brightness_with(&mock, "/dev/i2c-4", 3).unwrap_err();
    assert!(matches!(err, DdcError::ToolMissing));
    assert!(err.to_string().contains("Install with"));
}

#[test]
fn unparsable_success_output_is_not_retried() {
    let mut mock = MockExec::new();
    mock.expect_run()
        .times(1)
        .returning(|_, _| completed(true, "nothing useful here", ""));

    let err = get_brightness_with(&mock, "/dev/i2c-4", 3).unwrap_err();
    assert!(matches!(err, DdcError::ParseFailure(_)));
}

#[test]
fn set_rejects_out_of_range_before_any_call() {
    // No expectations: touching the executor would fail the test
    let mock = MockExec::new();

    let err = set_brightness_with(&mock, "/dev/i2c-4", 101, 3).unwrap_err();
    assert!(matches!(err, DdcError::ValueOutOfRange(101)));

    let err = set_brightness_with(&mock, "/dev/i2c-4", -1, 3).unwrap_err();
    assert!(matches!(err, DdcError::ValueOutOfRange(-1)));
}

#[test]
fn unparsable_bus_path_fails_before_any_call() {
    let mock = MockExec::new();

    let err = get_brightness_with(&mock, "/dev/backlight", 3).unwrap_err();
    assert!(matches!(err, DdcError::InvalidBusPath(_)));

    let err = set_brightness_with(&mock, "not-a-bus", 50, 3).unwrap_err();
    assert!(matches!(err, DdcError::InvalidBusPath(_)));
}

#[test]
fn set_sends_value_and_returns_without_parsing() {
    let mut mock = MockExec::new();
    mock.expect_run()
        .withf(|args, _| args == ["--bus", "4", "setvcp", "0x10", "75"])
        .times(1)
        .returning(|_, _| completed(true, "", ""));

    set_brightness_with(&mock, "/dev/i2c-4", 75, 3).unwrap();
}

#[test]
fn detect_report_returns_stdout() {
    let mut mock = MockExec::new();
    mock.expect_run()
        .withf(|args, timeout| {
            args == ["detect", "--sleep-multiplier", ".1"] && *timeout == DETECT_TIMEOUT
        })
        .times(1)
        .returning(|_, _| completed(true, "Display 1\n", ""));

    assert_eq!(detect_report(&mock).unwrap(), "Display 1\n");
}

#[test]
fn detect_failures_are_typed() {
    let mut mock = MockExec::new();
    mock.expect_run()
        .times(1)
        .returning(|_, _| completed(false, "", "ddc open failed"));
    assert!(matches!(
        detect_report(&mock).unwrap_err(),
        DdcError::DetectFailed { .. }
    ));

    let mut mock = MockExec::new();
    mock.expect_run()
        .times(1)
        .returning(|_, _| ExecOutcome::TimedOut);
    assert!(matches!(
        detect_report(&mock).unwrap_err(),
        DdcError::DetectTimeout
    ));
}

#[test]
fn bus_number_extraction() {
    assert_eq!(extract_bus_number("/dev/i2c-4").unwrap(), 4);
    assert_eq!(extract_bus_number("/dev/i2c-12").unwrap(), 12);
    assert!(extract_bus_number("/dev/fb0").is_err());
    assert!(extract_bus_number("").is_err());
}

#[test]
fn current_value_extraction() {
    assert_eq!(parse_current_value("current value = 0").unwrap(), 0);
    assert_eq!(
        parse_current_value("VCP code 0x10 (Brightness ): current value = 42, max value = 100")
            .unwrap(),
        42
    );
    assert!(parse_current_value("max value = 100").is_err());
}
