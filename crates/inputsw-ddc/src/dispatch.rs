//! Builds and runs the "Input Source Select" command.
//!
//! One attempt per call. A DDC/CI write that reports an error may still
//! have switched the monitor, so blindly repeating it is not safe; the
//! user re-triggers instead.
//!
//! Failure messages come from matching known substrings in the tool's
//! error text. The markers are those printed by m1ddc 1.x and
//! ControlMyMonitor 1.3x; anything else is passed through unchanged as
//! [`FailureReason::Unclassified`].

use crate::vcp::VCP_INPUT_SOURCE;
use inputsw_core::{
    CommandRunner, ExecError, Invocation, OsFamily, PlatformInfo, SwitchError,
};
use log::{info, warn};
use std::path::Path;
use std::time::Duration;

const NO_DISPLAYS_MARKER: &str = "No displays found";
const DDC_FAILED_MARKER: &str = "DDC communication failed";

const NO_DISPLAYS_HINT: &str =
    "No displays found. Make sure the monitor is connected, powered on and awake.";
const DDC_FAILED_HINT: &str = "DDC communication failed. Check the cable (some adapters and docks \
     don't pass DDC/CI through) and make sure DDC/CI is enabled in the monitor's on-screen menu.";

/// Why a dispatch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    NoDisplays,
    DdcCommunication,
    Timeout,
    /// The tool could not be started.
    Launch,
    Unclassified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Success,
    Failure(FailureReason),
}

/// Result of one command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    pub outcome: DispatchOutcome,
    pub message: String,
    /// Trimmed stdout on success, the raw error text on failure.
    pub raw_output: Option<String>,
}

impl DispatchResult {
    fn success(message: String, raw_output: Option<String>) -> Self {
        Self {
            outcome: DispatchOutcome::Success,
            message,
            raw_output,
        }
    }

    fn failure(reason: FailureReason, message: String, raw_output: Option<String>) -> Self {
        Self {
            outcome: DispatchOutcome::Failure(reason),
            message,
            raw_output,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == DispatchOutcome::Success
    }

    /// Headline for a notification.
    pub fn title(&self) -> &'static str {
        match self.outcome {
            DispatchOutcome::Success => "Input switched",
            DispatchOutcome::Failure(FailureReason::Timeout) => "Command timed out",
            DispatchOutcome::Failure(_) => "Failed to switch input",
        }
    }
}

/// Build the platform-specific command that selects `input_value`.
///
/// - macOS: `<exe> set input <value>`
/// - Windows: `"<exe>" /SetValue "<monitor>" 96 <value>` through `cmd`
pub fn build_switch_command(
    platform: &PlatformInfo,
    input_value: u32,
    monitor_id: &str,
    exe_path: &Path,
) -> Result<Invocation, SwitchError> {
    match platform.os_family {
        OsFamily::MacOs => Ok(Invocation::direct(
            exe_path,
            ["set".to_string(), "input".to_string(), input_value.to_string()],
        )),
        OsFamily::Windows => Ok(Invocation::shell(
            exe_path,
            [
                "/SetValue".to_string(),
                quote_monitor_id(monitor_id),
                u32::from(VCP_INPUT_SOURCE).to_string(),
                input_value.to_string(),
            ],
        )),
        OsFamily::Unsupported => Err(SwitchError::UnsupportedPlatform {
            os: std::env::consts::OS.to_string(),
        }),
    }
}

/// Quote a ControlMyMonitor monitor identifier for `cmd`.
/// Embedded quotes can't be escaped there, so they are dropped.
pub(crate) fn quote_monitor_id(monitor_id: &str) -> String {
    format!("\"{}\"", monitor_id.replace('"', ""))
}

/// Switch the monitor to `input_value`.
pub fn switch_input(
    platform: &PlatformInfo,
    input_value: u32,
    monitor_id: &str,
    exe_path: &Path,
    runner: &dyn CommandRunner,
    timeout: Duration,
) -> DispatchResult {
    match build_switch_command(platform, input_value, monitor_id, exe_path) {
        Ok(invocation) => execute_switch(&invocation, input_value, runner, timeout),
        Err(e) => DispatchResult::failure(FailureReason::Unclassified, e.to_string(), None),
    }
}

/// Run an already-built switch command once and classify the result.
pub fn execute_switch(
    invocation: &Invocation,
    input_value: u32,
    runner: &dyn CommandRunner,
    timeout: Duration,
) -> DispatchResult {
    info!("Switching to input {}: {}", input_value, invocation.command_line());

    let result = match runner.run(invocation, timeout) {
        Ok(output) if output.success() => {
            let stdout = output.stdout.trim();
            DispatchResult::success(
                format!("Switched to input {}", input_value),
                (!stdout.is_empty()).then(|| stdout.to_string()),
            )
        }
        Ok(output) => {
            let text = output.error_text();
            let (reason, message) = classify_failure(&text);
            DispatchResult::failure(reason, message, Some(text))
        }
        Err(ExecError::Timeout { after }) => DispatchResult::failure(
            FailureReason::Timeout,
            SwitchError::Timeout {
                secs: after.as_secs(),
            }
            .to_string(),
            None,
        ),
        Err(e @ ExecError::Spawn { .. }) => {
            DispatchResult::failure(FailureReason::Launch, e.to_string(), None)
        }
        Err(e) => {
            let text = e.to_string();
            let (reason, message) = classify_failure(&text);
            DispatchResult::failure(reason, message, Some(text))
        }
    };

    match result.outcome {
        DispatchOutcome::Success => info!("{}", result.message),
        DispatchOutcome::Failure(reason) => warn!("Switch failed ({:?}): {}", reason, result.message),
    }
    result
}

/// Map tool error text to a reason and a user-facing message.
pub fn classify_failure(error_text: &str) -> (FailureReason, String) {
    if error_text.contains(NO_DISPLAYS_MARKER) {
        (FailureReason::NoDisplays, NO_DISPLAYS_HINT.to_string())
    } else if error_text.contains(DDC_FAILED_MARKER) {
        (FailureReason::DdcCommunication, DDC_FAILED_HINT.to_string())
    } else {
        (FailureReason::Unclassified, error_text.trim().to_string())
    }
}

#[cfg(test)]
#[path = "tests/dispatch_tests.rs"]
mod tests;
