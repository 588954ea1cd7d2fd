//! Recording `CommandRunner` for tests.

use inputsw_core::{CommandRunner, ExecError, Invocation, ProcessOutput};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

pub(crate) type Reply = Result<ProcessOutput, ExecError>;

/// Answers calls from a queue of scripted replies (exit 0 with empty
/// output once the queue runs dry) and records every invocation.
#[derive(Default)]
pub(crate) struct SpyRunner {
    replies: RefCell<VecDeque<Reply>>,
    calls: RefCell<Vec<(Invocation, Duration)>>,
}

impl SpyRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn then(self, reply: Reply) -> Self {
        self.replies.borrow_mut().push_back(reply);
        self
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub(crate) fn command_lines(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|(inv, _)| inv.command_line())
            .collect()
    }

    pub(crate) fn invocation(&self, index: usize) -> Invocation {
        self.calls.borrow()[index].0.clone()
    }

    pub(crate) fn timeout(&self, index: usize) -> Duration {
        self.calls.borrow()[index].1
    }
}

impl CommandRunner for SpyRunner {
    fn run(&self, invocation: &Invocation, timeout: Duration) -> Result<ProcessOutput, ExecError> {
        self.calls.borrow_mut().push((invocation.clone(), timeout));
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| ok(""))
    }
}

pub(crate) fn ok(stdout: &str) -> Reply {
    Ok(ProcessOutput {
        code: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    })
}

pub(crate) fn exit(code: i32, stderr: &str) -> Reply {
    Ok(ProcessOutput {
        code: Some(code),
        stdout: String::new(),
        stderr: stderr.to_string(),
    })
}

pub(crate) fn timed_out(secs: u64) -> Reply {
    Err(ExecError::Timeout {
        after: Duration::from_secs(secs),
    })
}

pub(crate) fn not_launched(program: &str) -> Reply {
    Err(ExecError::Spawn {
        program: program.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
    })
}
