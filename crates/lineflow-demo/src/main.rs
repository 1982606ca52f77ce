//! Minimal CLI entry point: run one shell command and print its stdout,
//! line by line, as it arrives.
//!
//! The spec this binary demonstrates explicitly excludes a user-facing
//! command-construction DSL, so the `Shell` is hardcoded to `sh -c` and the
//! only input taken from argv is the opaque command text itself.

use anyhow::{Context, Result};
use lineflow_process::{Config, ProcessHandle, Shell};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    let command_text = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "echo hello from lineflow".to_string());

    let config = Config::default().with_stdout_consumer(Box::new(|item| {
        if let Some(line) = item.into_value() {
            println!("{line}");
        }
    }));

    let handle = ProcessHandle::new(Shell::sh(), command_text, config)
        .context("failed to launch process")?;

    let outcome = handle
        .selector()
        .expect("selector is taken exactly once, right here")
        .run();

    if let Some(error) = outcome.first_error {
        return Err(error).context("pipeline failed");
    }

    let exit_code = handle.wait_for().context("failed waiting for process")?;
    tracing::debug!(exit_code, "process exited");
    std::process::exit(exit_code);
}
