use super::*;
use crate::spy::{exit, not_launched, ok, timed_out, SpyRunner};
use inputsw_core::SiliconGeneration;

const TIMEOUT: Duration = Duration::from_secs(10);

fn mac() -> PlatformInfo {
    PlatformInfo::new(OsFamily::MacOs, SiliconGeneration::M2OrLater)
}

fn windows() -> PlatformInfo {
    PlatformInfo::new(OsFamily::Windows, SiliconGeneration::NotApplicable)
}

const M1DDC: &str = "/opt/homebrew/bin/m1ddc";
const CMM: &str = r"C:\Tools\ControlMyMonitor.exe";

// ── build_switch_command ─────────────────────────────────────────

#[test]
fn macos_command_sets_input() {
    let inv = build_switch_command(&mac(), 15, "Primary", Path::new(M1DDC)).unwrap();
    assert!(!inv.shell);
    assert_eq!(inv.args, vec!["set", "input", "15"]);
    assert!(inv.command_line().contains("set input 15"));
}

#[test]
fn macos_command_ignores_monitor_id() {
    let inv = build_switch_command(&mac(), 17, "DELL U2720Q", Path::new(M1DDC)).unwrap();
    assert!(!inv.command_line().contains("DELL"));
}

#[test]
fn windows_command_uses_set_value_with_vcp_96() {
    let inv = build_switch_command(&windows(), 17, "Primary", Path::new(CMM)).unwrap();
    assert!(inv.shell);
    assert!(inv.command_line().contains(r#"/SetValue "Primary" 96 17"#));
    assert_eq!(
        inv.command_line(),
        r#""C:\Tools\ControlMyMonitor.exe" /SetValue "Primary" 96 17"#
    );
}

#[test]
fn windows_monitor_id_quotes_are_stripped() {
    let inv = build_switch_command(&windows(), 15, r#"My "Desk" Monitor"#, Path::new(CMM)).unwrap();
    assert!(inv
        .command_line()
        .contains(r#"/SetValue "My Desk Monitor" 96 15"#));
}

#[test]
fn unsupported_platform_has_no_command() {
    let platform = PlatformInfo::new(OsFamily::Unsupported, SiliconGeneration::NotApplicable);
    let err = build_switch_command(&platform, 15, "Primary", Path::new("x")).unwrap_err();
    assert!(matches!(err, SwitchError::UnsupportedPlatform { .. }));
}

// ── switch_input: success ────────────────────────────────────────

#[test]
fn zero_exit_is_success_with_trimmed_output() {
    let runner = SpyRunner::new().then(ok("  done\n"));
    let result = switch_input(&mac(), 15, "Primary", Path::new(M1DDC), &runner, TIMEOUT);

    assert!(result.is_success());
    assert_eq!(result.outcome, DispatchOutcome::Success);
    assert_eq!(result.message, "Switched to input 15");
    assert_eq!(result.raw_output.as_deref(), Some("done"));
    assert_eq!(result.title(), "Input switched");
}

#[test]
fn empty_stdout_gives_no_raw_output() {
    let runner = SpyRunner::new().then(ok("\n"));
    let result = switch_input(&mac(), 15, "Primary", Path::new(M1DDC), &runner, TIMEOUT);
    assert!(result.is_success());
    assert_eq!(result.raw_output, None);
}

#[test]
fn dispatch_runs_exactly_once_with_given_timeout() {
    let runner = SpyRunner::new().then(ok(""));
    switch_input(&windows(), 18, "Primary", Path::new(CMM), &runner, TIMEOUT);

    assert_eq!(runner.call_count(), 1);
    assert_eq!(runner.timeout(0), TIMEOUT);
    assert!(runner.invocation(0).shell);
}

// ── switch_input: failures ───────────────────────────────────────

#[test]
fn ddc_failure_gives_cable_and_setting_guidance() {
    let runner = SpyRunner::new().then(exit(1, "DDC communication failed: timeout"));
    let result = switch_input(&mac(), 15, "Primary", Path::new(M1DDC), &runner, TIMEOUT);

    assert_eq!(
        result.outcome,
        DispatchOutcome::Failure(FailureReason::DdcCommunication)
    );
    assert!(result.message.contains("cable"));
    assert!(result.message.contains("DDC/CI is enabled"));
    assert_eq!(
        result.raw_output.as_deref(),
        Some("DDC communication failed: timeout")
    );
    assert_eq!(result.title(), "Failed to switch input");
}

#[test]
fn no_displays_gives_connectivity_hint() {
    let runner = SpyRunner::new().then(exit(1, "Error: No displays found\n"));
    let result = switch_input(&mac(), 17, "Primary", Path::new(M1DDC), &runner, TIMEOUT);

    assert_eq!(
        result.outcome,
        DispatchOutcome::Failure(FailureReason::NoDisplays)
    );
    assert!(result.message.contains("connected"));
}

#[test]
fn unknown_error_text_passes_through() {
    let runner = SpyRunner::new().then(exit(2, "  Monitor \"X\" not found  "));
    let result = switch_input(&windows(), 17, "X", Path::new(CMM), &runner, TIMEOUT);

    assert_eq!(
        result.outcome,
        DispatchOutcome::Failure(FailureReason::Unclassified)
    );
    assert_eq!(result.message, "Monitor \"X\" not found");
}

#[test]
fn nonzero_exit_without_output_mentions_status() {
    let runner = SpyRunner::new().then(exit(5, ""));
    let result = switch_input(&windows(), 15, "Primary", Path::new(CMM), &runner, TIMEOUT);

    assert!(!result.is_success());
    assert_eq!(result.message, "exited with status 5");
}

#[test]
fn timeout_is_reported_as_timeout() {
    let runner = SpyRunner::new().then(timed_out(10));
    let result = switch_input(&mac(), 15, "Primary", Path::new(M1DDC), &runner, TIMEOUT);

    assert_eq!(result.outcome, DispatchOutcome::Failure(FailureReason::Timeout));
    assert!(result.message.contains("10 seconds"));
    assert_eq!(result.title(), "Command timed out");
}

#[test]
fn launch_error_is_reported_as_launch_failure() {
    let runner = SpyRunner::new().then(not_launched(M1DDC));
    let result = switch_input(&mac(), 15, "Primary", Path::new(M1DDC), &runner, TIMEOUT);

    assert_eq!(result.outcome, DispatchOutcome::Failure(FailureReason::Launch));
    assert!(result.message.contains(M1DDC));
}

#[test]
fn failure_is_not_retried() {
    let runner = SpyRunner::new()
        .then(exit(1, "DDC communication failed"))
        .then(ok(""));
    let result = switch_input(&mac(), 15, "Primary", Path::new(M1DDC), &runner, TIMEOUT);

    assert!(!result.is_success());
    assert_eq!(runner.call_count(), 1);
}

#[test]
fn unsupported_platform_spawns_nothing() {
    let runner = SpyRunner::new();
    let platform = PlatformInfo::new(OsFamily::Unsupported, SiliconGeneration::NotApplicable);
    let result = switch_input(&platform, 15, "Primary", Path::new("x"), &runner, TIMEOUT);

    assert!(!result.is_success());
    assert_eq!(runner.call_count(), 0);
}

// ── classify_failure ─────────────────────────────────────────────

#[test]
fn classify_prefers_no_displays_marker() {
    let (reason, _) = classify_failure("No displays found; DDC communication failed");
    assert_eq!(reason, FailureReason::NoDisplays);
}

#[test]
fn classify_is_case_sensitive_to_known_markers() {
    let (reason, message) = classify_failure("ddc communication failed");
    assert_eq!(reason, FailureReason::Unclassified);
    assert_eq!(message, "ddc communication failed");
}
