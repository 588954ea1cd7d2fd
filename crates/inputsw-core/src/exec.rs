//! External process execution with a hard timeout.
//!
//! Every call to `m1ddc`, `ControlMyMonitor.exe` or `sysctl` goes through
//! the [`CommandRunner`] trait so callers can be exercised against a
//! recording runner in tests. [`SystemRunner`] is the real implementation:
//! it spawns the child, drains both pipes on helper threads and polls for
//! exit until the deadline, killing the child if it overruns.

use log::debug;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;

/// How often `SystemRunner` checks whether the child has exited.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// A fully built external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Run through the platform shell (`cmd /S /C` on Windows, `sh -c`
    /// elsewhere). Shell arguments are passed verbatim, so any quoting
    /// must already be part of the argument text.
    pub shell: bool,
}

impl Invocation {
    /// Execute `program` directly with `args`.
    pub fn direct<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            shell: false,
        }
    }

    /// Execute `program` through the command shell.
    pub fn shell<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            shell: true,
            ..Self::direct(program, args)
        }
    }

    /// The command line as it would be typed into a terminal.
    pub fn command_line(&self) -> String {
        let program = self.program.display().to_string();
        let mut line = if self.shell || program.contains(char::is_whitespace) {
            format!("\"{}\"", program)
        } else {
            program
        };
        for arg in &self.args {
            line.push(' ');
            if !self.shell && arg.contains(char::is_whitespace) {
                line.push('"');
                line.push_str(arg);
                line.push('"');
            } else {
                line.push_str(arg);
            }
        }
        line
    }
}

/// Captured result of a process that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Best description of what went wrong: stderr, else stdout, else the
    /// exit status.
    pub fn error_text(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        match self.code {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Errors raised before a process produced an exit status.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The program could not be started at all.
    #[error("Failed to launch {program}: {source}")]
    Spawn { program: String, source: io::Error },

    /// Waiting on the child failed.
    #[error("I/O error while waiting for process: {0}")]
    Io(#[from] io::Error),

    /// The child outlived its deadline and was killed.
    #[error("Command timed out after {} seconds", .after.as_secs())]
    Timeout { after: Duration },
}

/// Runs external commands. Implemented by [`SystemRunner`] and by test spies.
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation, timeout: Duration) -> Result<ProcessOutput, ExecError>;
}

/// Spawns real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation, timeout: Duration) -> Result<ProcessOutput, ExecError> {
        debug!("exec: {} (timeout {:?})", invocation.command_line(), timeout);

        let mut child = build_command(invocation)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ExecError::Spawn {
                program: invocation.program.display().to_string(),
                source,
            })?;

        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let code = wait_with_deadline(&mut child, timeout)?;
        let output = ProcessOutput {
            code,
            stdout: collect(stdout),
            stderr: collect(stderr),
        };
        debug!("exec: exit {:?}", output.code);
        Ok(output)
    }
}

/// Poll `child` until it exits or `timeout` elapses.
fn wait_with_deadline(child: &mut Child, timeout: Duration) -> Result<Option<i32>, ExecError> {
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status.code());
        }
        if started.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ExecError::Timeout { after: timeout });
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

#[cfg(windows)]
fn build_command(invocation: &Invocation) -> Command {
    use std::os::windows::process::CommandExt;

    if invocation.shell {
        let mut cmd = Command::new("cmd");
        cmd.args(["/S", "/C"])
            .raw_arg(format!("\"{}\"", invocation.command_line()));
        cmd
    } else {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        cmd
    }
}

#[cfg(not(windows))]
fn build_command(invocation: &Invocation) -> Command {
    if invocation.shell {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(invocation.command_line());
        cmd
    } else {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        cmd
    }
}

#[cfg(test)]
#[path = "tests/exec_tests.rs"]
mod tests;
