//! Host platform classification.
//!
//! m1ddc's feature set depends on the Apple Silicon generation: the
//! built-in HDMI port of M1 machines can't be driven over DDC/CI, M2 and
//! later can. On macOS the CPU brand string from `sysctl` tells us which
//! generation we're on. Classification never fails; anything unexpected
//! becomes [`SiliconGeneration::Unknown`].

use crate::exec::{CommandRunner, Invocation, SystemRunner};
use log::debug;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;

/// Ceiling for the `sysctl` probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    MacOs,
    Windows,
    Unsupported,
}

impl OsFamily {
    /// OS family of the running host.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            OsFamily::MacOs
        } else if cfg!(windows) {
            OsFamily::Windows
        } else {
            OsFamily::Unsupported
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsFamily::MacOs => f.write_str("macOS"),
            OsFamily::Windows => f.write_str("Windows"),
            OsFamily::Unsupported => write!(f, "unsupported ({})", std::env::consts::OS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiliconGeneration {
    Intel,
    M1,
    M2OrLater,
    Unknown,
    /// Not a Mac.
    NotApplicable,
}

impl fmt::Display for SiliconGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SiliconGeneration::Intel => "Intel",
            SiliconGeneration::M1 => "Apple M1",
            SiliconGeneration::M2OrLater => "Apple M2 or later",
            SiliconGeneration::Unknown => "unknown",
            SiliconGeneration::NotApplicable => "n/a",
        })
    }
}

/// What the host can do. Derived once per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformInfo {
    pub os_family: OsFamily,
    pub silicon: SiliconGeneration,
    pub supports_builtin_hdmi_switch: bool,
}

impl PlatformInfo {
    pub fn new(os_family: OsFamily, silicon: SiliconGeneration) -> Self {
        Self {
            os_family,
            silicon,
            supports_builtin_hdmi_switch: silicon == SiliconGeneration::M2OrLater,
        }
    }
}

/// Classify the running host.
pub fn classify() -> PlatformInfo {
    classify_with(OsFamily::current(), &SystemRunner)
}

/// Classify a host of family `os`, probing the CPU through `runner`.
pub fn classify_with(os: OsFamily, runner: &dyn CommandRunner) -> PlatformInfo {
    match os {
        OsFamily::MacOs => PlatformInfo::new(OsFamily::MacOs, probe_silicon(runner)),
        other => PlatformInfo::new(other, SiliconGeneration::NotApplicable),
    }
}

fn probe_silicon(runner: &dyn CommandRunner) -> SiliconGeneration {
    let probe = Invocation::direct("sysctl", ["-n", "machdep.cpu.brand_string"]);
    match runner.run(&probe, PROBE_TIMEOUT) {
        Ok(output) if output.success() => {
            let silicon = parse_silicon(&output.stdout);
            debug!("CPU brand {:?} -> {}", output.stdout.trim(), silicon);
            silicon
        }
        Ok(output) => {
            debug!("sysctl failed: {}", output.error_text());
            SiliconGeneration::Unknown
        }
        Err(e) => {
            debug!("sysctl probe error: {}", e);
            SiliconGeneration::Unknown
        }
    }
}

/// Map a CPU brand string to a silicon generation.
pub fn parse_silicon(brand: &str) -> SiliconGeneration {
    static APPLE_M: OnceLock<Regex> = OnceLock::new();

    if brand.contains("Intel") {
        return SiliconGeneration::Intel;
    }
    let re = APPLE_M.get_or_init(|| Regex::new(r"Apple M(\d+)").expect("valid regex"));
    if let Some(caps) = re.captures(brand) {
        return match caps[1].parse::<u32>() {
            Ok(1) => SiliconGeneration::M1,
            Ok(n) if n >= 2 => SiliconGeneration::M2OrLater,
            _ => SiliconGeneration::Unknown,
        };
    }
    if brand.contains("Apple") {
        // Newer chips with an unfamiliar brand format.
        return SiliconGeneration::M2OrLater;
    }
    SiliconGeneration::Unknown
}

#[cfg(test)]
#[path = "tests/platform_tests.rs"]
mod tests;
