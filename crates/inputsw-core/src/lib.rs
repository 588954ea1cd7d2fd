//! Shared building blocks for the monitor input switcher.
//!
//! - [`config`]: TOML configuration with defaults for every field
//! - [`platform`]: host OS and Apple Silicon generation detection
//! - [`validate`]: decides whether a DDC/CI command may be issued
//! - [`exec`]: bounded external process execution behind a trait
//! - [`error`]: the failure taxonomy shared by every crate

pub mod config;
pub mod error;
pub mod exec;
pub mod platform;
pub mod validate;

pub use config::Config;
pub use error::SwitchError;
pub use exec::{CommandRunner, ExecError, Invocation, ProcessOutput, SystemRunner};
pub use platform::{OsFamily, PlatformInfo, SiliconGeneration};
pub use validate::ValidationOutcome;
