//! Prerequisite checks run before any DDC/CI command is issued.
//!
//! Blocking checks always run before the M1 soft warning, so a host that
//! would only get a warning still fails if its input codes don't parse.
//! Nothing here spawns a process; the only side effects are read-only
//! filesystem lookups.

use crate::config::{parse_input_code, Config};
use crate::error::SwitchError;
use crate::platform::{OsFamily, PlatformInfo, SiliconGeneration};
use log::debug;
use std::path::{Path, PathBuf};

/// Name of the macOS DDC/CI tool looked up on disk.
pub const M1DDC_BINARY: &str = "m1ddc";

/// Homebrew install locations checked before `PATH`.
const M1DDC_CANDIDATE_DIRS: &[&str] = &["/opt/homebrew/bin", "/usr/local/bin"];

/// Shown on M1 Macs, where m1ddc can't drive the built-in HDMI port.
pub const M1_HDMI_WARNING: &str = "The built-in HDMI port is not supported on M1 Macs. \
     Displays connected through USB-C/Thunderbolt adapters work.";

/// Whether a command may be issued, and why not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Ready,
    /// Dispatch may proceed, but the user should see `reason`.
    SoftWarning { reason: String },
    /// Dispatch must not happen.
    BlockingFailure { title: String, detail: String },
}

impl ValidationOutcome {
    pub fn blocking(err: &SwitchError) -> Self {
        ValidationOutcome::BlockingFailure {
            title: err.title().to_string(),
            detail: err.to_string(),
        }
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self, ValidationOutcome::BlockingFailure { .. })
    }
}

/// Decide whether `config` is usable on `platform`.
pub fn validate(platform: &PlatformInfo, config: &Config) -> ValidationOutcome {
    let outcome = match check(platform, config) {
        Err(e) => ValidationOutcome::blocking(&e),
        Ok(_) if platform.os_family == OsFamily::MacOs
            && platform.silicon == SiliconGeneration::M1 =>
        {
            ValidationOutcome::SoftWarning {
                reason: M1_HDMI_WARNING.to_string(),
            }
        }
        Ok(_) => ValidationOutcome::Ready,
    };
    debug!("validation: {:?}", outcome);
    outcome
}

/// Run every blocking check, returning the resolved tool path.
pub fn check(platform: &PlatformInfo, config: &Config) -> Result<PathBuf, SwitchError> {
    let tool = resolve_tool(platform, config)?;
    parse_input_code("displayport_input", &config.displayport_input)?;
    parse_input_code("hdmi_input", &config.hdmi_input)?;
    Ok(tool)
}

/// Locate the external tool for `platform`.
pub fn resolve_tool(platform: &PlatformInfo, config: &Config) -> Result<PathBuf, SwitchError> {
    match platform.os_family {
        OsFamily::Unsupported => Err(SwitchError::UnsupportedPlatform {
            os: std::env::consts::OS.to_string(),
        }),
        OsFamily::MacOs => {
            if platform.silicon == SiliconGeneration::Intel {
                return Err(SwitchError::UnsupportedHardware);
            }
            resolve_macos_tool(config)
        }
        OsFamily::Windows => resolve_windows_tool(config),
    }
}

fn resolve_macos_tool(config: &Config) -> Result<PathBuf, SwitchError> {
    let configured = config.macos_tool_path.trim();
    if !configured.is_empty() {
        return existing_file(configured);
    }

    let path_dirs = std::env::var_os("PATH")
        .map(|p| std::env::split_paths(&p).collect::<Vec<_>>())
        .unwrap_or_default();
    let dirs = M1DDC_CANDIDATE_DIRS
        .iter()
        .map(PathBuf::from)
        .chain(path_dirs);

    search_tool(M1DDC_BINARY, dirs).ok_or(SwitchError::ToolNotInstalled)
}

fn resolve_windows_tool(config: &Config) -> Result<PathBuf, SwitchError> {
    let configured = config.windows_tool_path.trim();
    if configured.is_empty() {
        return Err(SwitchError::ToolNotConfigured);
    }
    existing_file(configured)
}

fn existing_file(path: &str) -> Result<PathBuf, SwitchError> {
    let candidate = PathBuf::from(path);
    if candidate.is_file() {
        Ok(candidate)
    } else {
        Err(SwitchError::ToolNotFound {
            path: path.to_string(),
        })
    }
}

/// First `dir/name` that exists as a file.
pub fn search_tool<I>(name: &str, dirs: I) -> Option<PathBuf>
where
    I: IntoIterator,
    I::Item: AsRef<Path>,
{
    dirs.into_iter()
        .map(|dir| dir.as_ref().join(name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
#[path = "tests/validate_tests.rs"]
mod tests;
