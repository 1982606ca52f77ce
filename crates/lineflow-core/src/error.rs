//! Error kinds shared by every lineflow crate.
//!
//! Mirrors the error-kind table from the design: `IOFailure` and
//! `PipelineFailure` both carry a worker failure back to whoever is driving
//! the pipeline, and `Interrupted` marks a blocking call that was cut short
//! by a close rather than a real fault.

/// A failure surfaced while pumping lines through a sequence, queue, or
/// consumer.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Reading or writing a process stream failed mid-pipeline.
    #[error("I/O failure on a process stream: {0}")]
    IoFailure(#[from] std::io::Error),

    /// A user callback or transformer panicked or returned an error.
    #[error("pipeline callback failed: {0}")]
    PipelineFailure(String),

    /// A blocking call was interrupted by a close. Not reported up to
    /// callers as a failure; converted to a clean close-on-exit instead.
    #[error("blocking call was interrupted")]
    Interrupted,
}

pub type Result<T> = std::result::Result<T, Error>;
