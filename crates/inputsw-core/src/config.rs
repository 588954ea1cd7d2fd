//! Configuration management: TOML file with sensible defaults.
//!
//! Config file location, first match wins:
//! 1. `$MONITOR_INPUT_SWITCH_CONFIG`
//! 2. `%APPDATA%\monitor-input-switch\config.toml` (Windows)
//! 3. `$XDG_CONFIG_HOME/monitor-input-switch/config.toml`
//! 4. `$HOME/.config/monitor-input-switch/config.toml`
//!
//! Falls back to compiled-in defaults if the file is missing or malformed.

use crate::error::SwitchError;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "MONITOR_INPUT_SWITCH_CONFIG";

const APP_DIR: &str = "monitor-input-switch";

/// Path to the config directory.
pub fn config_dir() -> PathBuf {
    if cfg!(windows) {
        let app_data = std::env::var("APPDATA")
            .unwrap_or_else(|_| r"C:\Users\Default\AppData\Roaming".to_string());
        return PathBuf::from(app_data).join(APP_DIR);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join(APP_DIR);
    }
    let home = std::env::var_os("HOME").unwrap_or_else(|| ".".into());
    PathBuf::from(home).join(".config").join(APP_DIR)
}

/// Full path to the config file, honouring the environment override.
pub fn config_path() -> PathBuf {
    match std::env::var_os(CONFIG_ENV_VAR).filter(|v| !v.is_empty()) {
        Some(path) => PathBuf::from(path),
        None => config_dir().join("config.toml"),
    }
}

/// Which configured input a switch targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTarget {
    DisplayPort,
    Hdmi,
    /// A raw VCP 0x60 value supplied directly.
    Code(u32),
}

impl std::fmt::Display for InputTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputTarget::DisplayPort => f.write_str("DisplayPort"),
            InputTarget::Hdmi => f.write_str("HDMI"),
            InputTarget::Code(code) => write!(f, "input {}", code),
        }
    }
}

/// User configuration with defaults for every field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// VCP 0x60 value selecting the DisplayPort input.
    /// Kept as text so a bad value is reported instead of failing the load.
    pub displayport_input: String,

    /// VCP 0x60 value selecting the HDMI input.
    pub hdmi_input: String,

    /// Full path to `ControlMyMonitor.exe` (Windows only).
    pub windows_tool_path: String,

    /// Path to `m1ddc` (macOS only). Empty means search the usual
    /// Homebrew locations and `PATH`.
    pub macos_tool_path: String,

    /// Monitor identifier passed to ControlMyMonitor.
    pub monitor_id: String,

    /// Hard ceiling for each external tool call, in seconds.
    pub command_timeout_secs: u64,

    /// Enable debug logging.
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            displayport_input: "15".to_string(),
            hdmi_input: "17".to_string(),
            windows_tool_path: String::new(),
            macos_tool_path: String::new(),
            monitor_id: "Primary".to_string(),
            command_timeout_secs: 10,
            verbose: false,
        }
    }
}

impl Config {
    /// Load config from the default location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Load config from `path`, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(cfg) => {
                    info!("Config loaded from {}", path.display());
                    cfg
                }
                Err(e) => {
                    warn!(
                        "Config parse error in {}: {}, using defaults",
                        path.display(),
                        e
                    );
                    Self::default()
                }
            },
            Err(_) => {
                info!("No config file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write the default config to `path` (creates parent directories).
    pub fn write_default(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        Self::default().write_to(path)
    }

    /// Write this config to `path` with explanatory comments.
    pub fn write_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if !dir.exists() {
                std::fs::create_dir_all(dir)?;
            }
        }
        std::fs::write(path, Self::to_toml_commented(self))?;
        info!("Config written to {}", path.display());
        Ok(())
    }

    /// Resolve `target` to the numeric VCP 0x60 value.
    pub fn input_code(&self, target: InputTarget) -> Result<u32, SwitchError> {
        match target {
            InputTarget::DisplayPort => {
                parse_input_code("displayport_input", &self.displayport_input)
            }
            InputTarget::Hdmi => parse_input_code("hdmi_input", &self.hdmi_input),
            InputTarget::Code(code) => Ok(code),
        }
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs.max(1))
    }

    /// Serialize config to a TOML string with helpful comments.
    fn to_toml_commented(cfg: &Config) -> String {
        format!(
            r##"# Monitor Input Switch configuration
# Changes take effect on the next command.

# ─── Input Codes ─────────────────────────────────────────────────────
# VCP 0x60 values for each input. Common values: 15 = DisplayPort,
# 17 = HDMI-1, 18 = HDMI-2. Run `monitor-input-switch discover` to read
# the value your monitor reports.
displayport_input = "{displayport_input}"
hdmi_input = "{hdmi_input}"

# ─── External Tools ──────────────────────────────────────────────────
# Windows: full path to ControlMyMonitor.exe (required).
windows_tool_path = "{windows_tool_path}"

# macOS: path to m1ddc. Leave empty to search Homebrew and PATH.
macos_tool_path = "{macos_tool_path}"

# Monitor identifier for ControlMyMonitor ("Primary", a device name,
# or a serial number).
monitor_id = "{monitor_id}"

# ─── Timing ──────────────────────────────────────────────────────────
# Seconds to wait for the external tool before giving up.
command_timeout_secs = {command_timeout_secs}

# ─── Debug ───────────────────────────────────────────────────────────
verbose = {verbose}
"##,
            displayport_input = escape_toml_string(&cfg.displayport_input),
            hdmi_input = escape_toml_string(&cfg.hdmi_input),
            windows_tool_path = escape_toml_string(&cfg.windows_tool_path),
            macos_tool_path = escape_toml_string(&cfg.macos_tool_path),
            monitor_id = escape_toml_string(&cfg.monitor_id),
            command_timeout_secs = cfg.command_timeout_secs,
            verbose = cfg.verbose,
        )
    }
}

/// Parse a configured input code as a non-negative integer.
pub fn parse_input_code(field: &str, raw: &str) -> Result<u32, SwitchError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| SwitchError::InvalidConfiguration {
            field: field.to_string(),
            value: raw.to_string(),
        })
}

/// Escape a string for safe inclusion inside a TOML basic string (`"..."`).
///
/// Windows tool paths are full of backslashes, so this matters more than
/// it looks.
fn escape_toml_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
