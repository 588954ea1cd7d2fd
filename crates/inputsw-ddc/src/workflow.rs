//! Validation followed by dispatch or discovery.
//!
//! A blocked switch returns before any process is spawned.

use crate::discover::{discover, DiscoveryReport};
use crate::dispatch::{build_switch_command, execute_switch, DispatchResult};
use inputsw_core::config::InputTarget;
use inputsw_core::validate::{resolve_tool, validate};
use inputsw_core::{CommandRunner, Config, Invocation, PlatformInfo, SwitchError, ValidationOutcome};

/// Why nothing was run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blocked {
    pub title: String,
    pub detail: String,
}

impl From<&SwitchError> for Blocked {
    fn from(err: &SwitchError) -> Self {
        Self {
            title: err.title().to_string(),
            detail: err.to_string(),
        }
    }
}

/// A validated switch, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSwitch {
    pub target: InputTarget,
    pub input_value: u32,
    /// Soft warning from validation, if any.
    pub warning: Option<String>,
    pub invocation: Invocation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchReport {
    Blocked(Blocked),
    Dispatched {
        target: InputTarget,
        warning: Option<String>,
        result: DispatchResult,
    },
}

/// Validate and build the switch command without running it.
pub fn prepare_switch(
    target: InputTarget,
    platform: &PlatformInfo,
    config: &Config,
) -> Result<PreparedSwitch, Blocked> {
    let warning = match validate(platform, config) {
        ValidationOutcome::BlockingFailure { title, detail } => {
            return Err(Blocked { title, detail })
        }
        ValidationOutcome::SoftWarning { reason } => Some(reason),
        ValidationOutcome::Ready => None,
    };

    let tool = resolve_tool(platform, config).map_err(|e| Blocked::from(&e))?;
    let input_value = config.input_code(target).map_err(|e| Blocked::from(&e))?;
    let invocation = build_switch_command(platform, input_value, &config.monitor_id, &tool)
        .map_err(|e| Blocked::from(&e))?;

    Ok(PreparedSwitch {
        target,
        input_value,
        warning,
        invocation,
    })
}

/// Validate, then switch to `target` with a single attempt.
pub fn switch_to(
    target: InputTarget,
    platform: &PlatformInfo,
    config: &Config,
    runner: &dyn CommandRunner,
) -> SwitchReport {
    match prepare_switch(target, platform, config) {
        Err(blocked) => SwitchReport::Blocked(blocked),
        Ok(prepared) => SwitchReport::Dispatched {
            target,
            result: execute_switch(
                &prepared.invocation,
                prepared.input_value,
                runner,
                config.command_timeout(),
            ),
            warning: prepared.warning,
        },
    }
}

/// Locate the tool, then run discovery.
///
/// Input codes are not checked here: discovery is how users find them.
pub fn discover_with(
    platform: &PlatformInfo,
    config: &Config,
    runner: &dyn CommandRunner,
) -> Result<DiscoveryReport, Blocked> {
    let tool = resolve_tool(platform, config).map_err(|e| Blocked::from(&e))?;
    Ok(discover(
        platform,
        &config.monitor_id,
        &tool,
        runner,
        config.command_timeout(),
    ))
}

#[cfg(test)]
#[path = "tests/workflow_tests.rs"]
mod tests;
