//! `ProcessHandle`: wire a launched process's three standard streams to a
//! [`lineflow_selector::Selector`] via a [`Config`].
//!
//! Construction composes `argv = shell.program :: shell.options ++
//! [commandText]`, launches the child with all three streams piped, wraps
//! stdout/stderr with `lineflow_core::line_io::reader_to_sequence` and
//! stdin with `writer_consumer`, then builds the three Config routes
//! (stdout critical, stderr and stdin non-critical) into a Selector that
//! the caller drives to completion via [`ProcessHandle::selector`].

mod config;
mod error;
mod shell;

pub use config::{Charset, Config, LineTransformer};
pub use error::{ProcessError, Result};
pub use shell::Shell;

use lineflow_core::line_io::{reader_to_sequence, writer_consumer};
use lineflow_core::{Item, LineConsumer, LineSequence};
use lineflow_core::DEFAULT_QUEUE_CAPACITY;
use lineflow_selector::{Route, Selector};
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};

/// A launched process, its three stream adapters, and the Selector built
/// from them. Lifecycle: created -> running -> one of {exited, destroyed}.
pub struct ProcessHandle {
    child: Mutex<Child>,
    stdout: Arc<LineSequence>,
    stderr: Arc<LineSequence>,
    stdin_consumer: Arc<Mutex<LineConsumer>>,
    selector: Mutex<Option<Selector>>,
    shell: Shell,
    command_text: String,
}

impl ProcessHandle {
    /// Launch `shell.program shell.options... commandText`, wrap its three
    /// streams, and build the Selector described by `config`.
    pub fn new(shell: Shell, command_text: impl Into<String>, config: Config) -> Result<Self> {
        let command_text = command_text.into();

        let mut cmd = Command::new(&shell.program);
        cmd.args(&shell.options);
        cmd.arg(&command_text);
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(ProcessError::LaunchFailure)?;

        let child_stdin = child.stdin.take().expect("stdin was requested as piped");
        let child_stdout = child.stdout.take().expect("stdout was requested as piped");
        let child_stderr = child.stderr.take().expect("stderr was requested as piped");

        tracing::debug!(
            program = %shell.program,
            pid = child.id(),
            "spawned process"
        );

        let stdout = Arc::new(reader_to_sequence(child_stdout, DEFAULT_QUEUE_CAPACITY));
        let stderr = Arc::new(reader_to_sequence(child_stderr, DEFAULT_QUEUE_CAPACITY));
        let stdin_consumer = Arc::new(Mutex::new(writer_consumer(child_stdin)));

        let routes = vec![
            Route::new(
                Arc::clone(&stdout),
                wrap_transform(config.stdout_transformer, config.stdout_consumer),
                true,
            ),
            Route::new(
                Arc::clone(&stderr),
                wrap_transform(config.stderr_transformer, config.stderr_consumer),
                false,
            ),
            Route::new(config.stdin, forward_to(Arc::clone(&stdin_consumer)), false),
        ];
        let selector = Selector::new(routes)?;

        Ok(Self {
            child: Mutex::new(child),
            stdout,
            stderr,
            stdin_consumer,
            selector: Mutex::new(Some(selector)),
            shell,
            command_text,
        })
    }

    /// The child's raw stdout sequence, before `Config`'s transform.
    pub fn stdout(&self) -> Arc<LineSequence> {
        Arc::clone(&self.stdout)
    }

    /// The child's raw stderr sequence, before `Config`'s transform.
    pub fn stderr(&self) -> Arc<LineSequence> {
        Arc::clone(&self.stderr)
    }

    /// The line consumer writing to the child's stdin.
    pub fn stdin(&self) -> Arc<Mutex<LineConsumer>> {
        Arc::clone(&self.stdin_consumer)
    }

    /// Take ownership of the Selector built from `Config`'s three routes.
    /// Returns `None` if already taken — the Selector is the handle an
    /// orchestrator drives to run the pipeline to completion, and it can
    /// only be driven once.
    pub fn selector(&self) -> Option<Selector> {
        self.selector.lock().unwrap_or_else(|p| p.into_inner()).take()
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    pub fn command_text(&self) -> &str {
        &self.command_text
    }

    /// Block until the child process exits; return its exit code.
    pub fn wait_for(&self) -> Result<i32> {
        let mut child = self.child.lock().unwrap_or_else(|p| p.into_inner());
        let status = child.wait().map_err(lineflow_core::Error::IoFailure)?;
        Ok(status.code().unwrap_or_else(|| {
            tracing::warn!("process terminated by signal; reporting exit code 1");
            1
        }))
    }

    /// The exit code if the child has already exited; `NotExited` otherwise.
    pub fn exit_value(&self) -> Result<i32> {
        let mut child = self.child.lock().unwrap_or_else(|p| p.into_inner());
        match child.try_wait().map_err(lineflow_core::Error::IoFailure)? {
            Some(status) => Ok(status.code().unwrap_or(1)),
            None => Err(ProcessError::NotExited),
        }
    }

    /// Signal the OS process, then close stdin, stdout, and stderr in that
    /// fixed order, suppressing secondary errors so every close step runs
    /// even if an earlier one failed.
    pub fn destroy(&self) {
        {
            let mut child = self.child.lock().unwrap_or_else(|p| p.into_inner());
            if let Err(e) = child.kill() {
                tracing::warn!(error = %e, "failed to signal child process; it may already have exited");
            }
        }
        {
            let mut consumer = self.stdin_consumer.lock().unwrap_or_else(|p| p.into_inner());
            (consumer)(Item::End);
        }
        self.stdout.close();
        self.stderr.close();
    }

    /// Best-effort OS process id.
    #[cfg(unix)]
    pub fn get_pid(&self) -> Result<u32> {
        Ok(self.child.lock().unwrap_or_else(|p| p.into_inner()).id())
    }

    #[cfg(not(unix))]
    pub fn get_pid(&self) -> Result<u32> {
        Err(ProcessError::PidUnavailable)
    }

    /// Alias for [`ProcessHandle::get_pid`].
    pub fn id(&self) -> Result<u32> {
        self.get_pid()
    }
}

fn wrap_transform(transformer: LineTransformer, mut consumer: LineConsumer) -> LineConsumer {
    Box::new(move |item| match item {
        Item::Value(line) => {
            if let Some(transformed) = transformer(line) {
                consumer(Item::Value(transformed));
            }
        }
        Item::End => consumer(Item::End),
    })
}

fn forward_to(consumer: Arc<Mutex<LineConsumer>>) -> LineConsumer {
    Box::new(move |item| {
        let mut consumer = consumer.lock().unwrap_or_else(|p| p.into_inner());
        (consumer)(item);
    })
}
