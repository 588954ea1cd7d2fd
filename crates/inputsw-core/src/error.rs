//! Failure taxonomy for prerequisite checks and tool execution.

use thiserror::Error;

/// Everything that can stop an input switch from happening.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwitchError {
    /// Host OS is neither macOS nor Windows.
    #[error("Input switching is only supported on Apple Silicon macOS and Windows (this host runs {os}).")]
    UnsupportedPlatform { os: String },

    /// Intel Macs can't drive DDC/CI through m1ddc.
    #[error("m1ddc only works on Apple Silicon Macs. Intel Macs are not supported.")]
    UnsupportedHardware,

    /// m1ddc could not be found on macOS.
    #[error("m1ddc was not found. Install it with `brew install m1ddc` or set `macos_tool_path` in the config.")]
    ToolNotInstalled,

    /// No ControlMyMonitor path configured on Windows.
    #[error("Set `windows_tool_path` to ControlMyMonitor.exe (download: https://www.nirsoft.net/utils/control_my_monitor.html).")]
    ToolNotConfigured,

    /// A configured tool path does not exist on disk.
    #[error("No file exists at the configured path: {path}")]
    ToolNotFound { path: String },

    /// An input code in the config is not a non-negative integer.
    #[error("`{field}` must be a non-negative integer, got \"{value}\".")]
    InvalidConfiguration { field: String, value: String },

    /// The external tool ran and reported an error.
    #[error("{message}")]
    ExternalToolFailure { message: String },

    /// The external tool did not finish in time.
    #[error("The external tool did not respond within {secs} seconds.")]
    Timeout { secs: u64 },
}

impl SwitchError {
    /// Short headline suitable for a notification title.
    pub fn title(&self) -> &'static str {
        match self {
            SwitchError::UnsupportedPlatform { .. } => "Unsupported platform",
            SwitchError::UnsupportedHardware => "Requires Apple Silicon",
            SwitchError::ToolNotInstalled => "m1ddc not installed",
            SwitchError::ToolNotConfigured => "Path not configured",
            SwitchError::ToolNotFound { .. } => "Tool not found at path",
            SwitchError::InvalidConfiguration { .. } => "Invalid numeric value",
            SwitchError::ExternalToolFailure { .. } => "Failed to switch input",
            SwitchError::Timeout { .. } => "Command timed out",
        }
    }
}
