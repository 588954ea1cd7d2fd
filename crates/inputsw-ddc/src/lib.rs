//! Monitor input switching via external DDC/CI tools.
//!
//! Nothing in this crate talks to the display hardware directly. Commands
//! are built for `m1ddc` (Apple Silicon macOS) or `ControlMyMonitor.exe`
//! (Windows) and executed through an [`inputsw_core::CommandRunner`].
//!
//! - [`vcp`]: the VCP code and reference input values
//! - [`dispatch`]: builds and runs the "set input" command
//! - [`discover`]: queries the current input and lists monitors
//! - [`workflow`]: validation followed by dispatch or discovery

pub mod discover;
pub mod dispatch;
pub mod vcp;
pub mod workflow;

pub use discover::{discover, DiscoveryReport};
pub use dispatch::{switch_input, DispatchOutcome, DispatchResult, FailureReason};
pub use workflow::{discover_with, prepare_switch, switch_to, Blocked, PreparedSwitch, SwitchReport};

#[cfg(test)]
#[path = "tests/spy.rs"]
pub(crate) mod spy;
