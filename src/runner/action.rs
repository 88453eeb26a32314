//! Action execution
//!
//! An action is one command line. It is optionally env-expanded, split with
//! POSIX shell-word rules, and spawned directly as a child process - there
//! is no intermediate shell. A statement that wants shell features invokes
//! `bash -c "..."` explicitly.

use crate::error::ActionError;
use crate::logger::Logger;
use crate::runner::cancel::CancellationToken;
use crate::runner::interpolate;
use std::io::{self, BufReader, PipeReader, Read};
use std::process::{Command, Stdio};

/// Stdin source shared by every action spawned in one workflow
///
/// Defaults to the process's own stdin. A piped source duplicates its
/// reader per spawn, so successive actions consume one shared stream.
#[derive(Debug, Default)]
pub struct ActionStdin(Option<PipeReader>);

impl ActionStdin {
    pub fn inherit() -> Self {
        ActionStdin(None)
    }

    pub fn piped(reader: PipeReader) -> Self {
        ActionStdin(Some(reader))
    }

    fn to_stdio(&self) -> io::Result<Stdio> {
        match &self.0 {
            None => Ok(Stdio::inherit()),
            Some(reader) => Ok(reader.try_clone()?.into()),
        }
    }
}

/// Where an action's stdout goes
pub enum ActionOutput<'a> {
    /// Stream chunks through the logger's raw output sink
    Logger(&'a dyn Logger),
    /// Collect the full output in a buffer (env substitution)
    Capture(&'a mut String),
    /// Drop the output
    Discard,
}

/// A single command line ready to execute
pub struct Action<'a> {
    statement: &'a str,
    expand_env: bool,
    working_dir: Option<&'a str>,
    stdin: Option<&'a ActionStdin>,
    stdout: ActionOutput<'a>,
    cancel: Option<&'a CancellationToken>,
}

impl<'a> Action<'a> {
    pub fn new(statement: &'a str) -> Self {
        Action {
            statement,
            expand_env: true,
            working_dir: None,
            stdin: None,
            stdout: ActionOutput::Discard,
            cancel: None,
        }
    }

    pub fn with_env_expansion(mut self, expand_env: bool) -> Self {
        self.expand_env = expand_env;
        self
    }

    pub fn with_working_dir(mut self, working_dir: Option<&'a str>) -> Self {
        self.working_dir = working_dir;
        self
    }

    pub fn with_stdin(mut self, stdin: &'a ActionStdin) -> Self {
        self.stdin = Some(stdin);
        self
    }

    pub fn with_stdout(mut self, stdout: ActionOutput<'a>) -> Self {
        self.stdout = stdout;
        self
    }

    pub fn with_cancellation(mut self, cancel: &'a CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Spawn the action and wait for it to finish, streaming its stdout
    ///
    /// The cancellation token is consulted once, after the wait: a fired
    /// token yields `Cancelled` regardless of the exit status, since the
    /// child shares the process group and the signal already reached it.
    pub fn execute(mut self) -> Result<(), ActionError> {
        let statement = if self.expand_env {
            interpolate::expand_env(self.statement)
        } else {
            self.statement.to_string()
        };

        let words = shell_words::split(&statement).map_err(|e| ActionError::Parse {
            statement: statement.clone(),
            reason: e.to_string(),
        })?;
        let Some((program, args)) = words.split_first() else {
            return Err(ActionError::Parse {
                statement,
                reason: "empty statement".to_string(),
            });
        };

        let mut command = Command::new(program);
        command
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        if let Some(dir) = self.working_dir.filter(|d| !d.is_empty()) {
            command.current_dir(dir);
        }
        match self.stdin {
            Some(source) => {
                let stdio = source.to_stdio().map_err(|e| ActionError::Spawn {
                    statement: statement.clone(),
                    source: e,
                })?;
                command.stdin(stdio);
            }
            None => {
                command.stdin(Stdio::inherit());
            }
        }

        let mut child = command.spawn().map_err(|e| ActionError::Spawn {
            statement: statement.clone(),
            source: e,
        })?;

        // stream stdout until the child closes it
        if let Some(stdout) = child.stdout.take() {
            let mut reader = BufReader::new(stdout);
            let mut buf = [0u8; 256];
            loop {
                let n = reader.read(&mut buf).map_err(ActionError::Output)?;
                if n == 0 {
                    break;
                }
                let chunk = String::from_utf8_lossy(&buf[..n]);
                match &mut self.stdout {
                    ActionOutput::Logger(logger) => logger.output(&chunk),
                    ActionOutput::Capture(captured) => captured.push_str(&chunk),
                    ActionOutput::Discard => {}
                }
            }
        }

        let status = child.wait().map_err(ActionError::Output)?;

        if self.cancel.is_some_and(CancellationToken::is_fired) {
            return Err(ActionError::Cancelled);
        }
        if !status.success() {
            return Err(ActionError::Failed(status));
        }
        Ok(())
    }
}
