//! Read-only queries that help users find their monitor's input codes.
//!
//! Discovery is best-effort throughout: a failing sub-query degrades to a
//! placeholder or an omitted value, never to an error.

use crate::dispatch::quote_monitor_id;
use crate::vcp::{input_source_label, COMMON_INPUT_SOURCES, VCP_INPUT_SOURCE};
use chrono::{DateTime, Local};
use inputsw_core::{CommandRunner, Invocation, OsFamily, PlatformInfo, ProcessOutput};
use log::{debug, warn};
use std::fmt::Write;
use std::path::Path;
use std::time::Duration;

const DISPLAY_LIST_UNAVAILABLE: &str = "(display list unavailable)";
const MONITOR_LIST_UNAVAILABLE: &str = "(monitor list unavailable)";

/// Everything discovery learned. Display-only.
#[derive(Debug, Clone)]
pub struct DiscoveryReport {
    pub platform: PlatformInfo,
    pub monitor_id: String,
    pub current_input: Option<u32>,
    pub raw_output: String,
    pub generated_at: DateTime<Local>,
}

/// Query the current input value and the tool's monitor listing.
pub fn discover(
    platform: &PlatformInfo,
    monitor_id: &str,
    exe_path: &Path,
    runner: &dyn CommandRunner,
    timeout: Duration,
) -> DiscoveryReport {
    let (current_input, raw_output) = match platform.os_family {
        OsFamily::MacOs => discover_macos(exe_path, runner, timeout),
        OsFamily::Windows => discover_windows(monitor_id, exe_path, runner, timeout),
        OsFamily::Unsupported => (
            None,
            "Discovery is not available on this platform.".to_string(),
        ),
    };

    DiscoveryReport {
        platform: *platform,
        monitor_id: monitor_id.to_string(),
        current_input,
        raw_output,
        generated_at: Local::now(),
    }
}

fn discover_macos(
    exe_path: &Path,
    runner: &dyn CommandRunner,
    timeout: Duration,
) -> (Option<u32>, String) {
    let current = run_quietly(runner, &Invocation::direct(exe_path, ["get", "input"]), timeout)
        .filter(ProcessOutput::success)
        .and_then(|out| out.stdout.trim().parse::<u32>().ok());

    let listing = run_quietly(runner, &Invocation::direct(exe_path, ["display", "list"]), timeout)
        .filter(ProcessOutput::success)
        .map(|out| out.stdout.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DISPLAY_LIST_UNAVAILABLE.to_string());

    (current, listing)
}

fn discover_windows(
    monitor_id: &str,
    exe_path: &Path,
    runner: &dyn CommandRunner,
    timeout: Duration,
) -> (Option<u32>, String) {
    let listing = run_quietly(runner, &Invocation::shell(exe_path, ["/smonitors"]), timeout)
        .filter(ProcessOutput::success)
        .map(|out| out.stdout.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| MONITOR_LIST_UNAVAILABLE.to_string());

    // Older ControlMyMonitor builds lack /GetValue; its failure just omits the value.
    let get_value = Invocation::shell(
        exe_path,
        [
            "/GetValue".to_string(),
            quote_monitor_id(monitor_id),
            u32::from(VCP_INPUT_SOURCE).to_string(),
        ],
    );
    let current = run_quietly(runner, &get_value, timeout).and_then(|out| get_value_result(&out));

    (current, listing)
}

/// Read a `/GetValue` answer. ControlMyMonitor reports the value through
/// its exit code; a value printed on stdout takes precedence.
fn get_value_result(out: &ProcessOutput) -> Option<u32> {
    if let Ok(value) = out.stdout.trim().parse::<u32>() {
        return Some(value);
    }
    if out.stdout.trim().is_empty() && out.stderr.trim().is_empty() {
        return out.code.filter(|&code| code > 0).map(|code| code as u32);
    }
    debug!("GetValue unavailable: {}", out.error_text());
    None
}

/// Run a query, logging and swallowing execution errors.
fn run_quietly(
    runner: &dyn CommandRunner,
    invocation: &Invocation,
    timeout: Duration,
) -> Option<ProcessOutput> {
    match runner.run(invocation, timeout) {
        Ok(out) => {
            if !out.success() {
                debug!("{} exited with {:?}", invocation.command_line(), out.code);
            }
            Some(out)
        }
        Err(e) => {
            warn!("{} failed: {}", invocation.command_line(), e);
            None
        }
    }
}

impl DiscoveryReport {
    /// Format the report for display.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "═══ Monitor Input Discovery ═══\n");

        let _ = writeln!(out, "── Current Input ──");
        if self.platform.os_family == OsFamily::Windows {
            let _ = writeln!(out, "  Monitor: {}", self.monitor_id);
        }
        match self.current_input {
            Some(value) => match input_source_label(value) {
                Some(label) => {
                    let _ = writeln!(out, "  Value:   {} (commonly {})", value, label);
                }
                None => {
                    let _ = writeln!(out, "  Value:   {}", value);
                }
            },
            None => {
                let _ = writeln!(out, "  Value:   unavailable (the tool did not report one)");
            }
        }

        let _ = writeln!(out, "\n── Tool Output ──");
        for line in self.raw_output.lines() {
            let _ = writeln!(out, "  {}", line);
        }

        let _ = writeln!(out, "\n── Common Input Codes (VCP 0x{:02X}) ──", VCP_INPUT_SOURCE);
        for (code, label) in COMMON_INPUT_SOURCES {
            let _ = writeln!(out, "  {:<4}{}", code, label);
        }
        let _ = writeln!(
            out,
            "\n  Codes are manufacturer-specific; this table is only a starting point.\n  \
             Switch the monitor to each input by hand, run discover, and copy the\n  \
             reported value into displayport_input / hdmi_input."
        );

        let _ = writeln!(
            out,
            "\nGenerated {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        );
        out
    }
}

#[cfg(test)]
#[path = "tests/discover_tests.rs"]
mod tests;
