//! Process-specific failure modes, extending the shared error-kind table
//! with the cases only a launched OS process can hit.

#[derive(thiserror::Error, Debug)]
pub enum ProcessError {
    /// The child process could not be started at all.
    #[error("failed to launch process: {0}")]
    LaunchFailure(#[source] std::io::Error),

    /// A read/write on a process stream, or a user callback, failed
    /// mid-pipeline.
    #[error(transparent)]
    Pipeline(#[from] lineflow_core::Error),

    /// `exit_value()` was called before the child process exited.
    #[error("process has not exited yet")]
    NotExited,

    /// The process id could not be obtained on this platform.
    #[error("process id is unavailable on this platform")]
    PidUnavailable,

    /// No route in the built Selector was marked critical. Unreachable in
    /// practice since `ProcessHandle::new` always marks stdout critical,
    /// kept so `SelectorError` has somewhere to go if that ever changes.
    #[error(transparent)]
    Selector(#[from] lineflow_selector::SelectorError),
}

pub type Result<T> = std::result::Result<T, ProcessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_exited_has_fixed_message() {
        assert_eq!(
            ProcessError::NotExited.to_string(),
            "process has not exited yet"
        );
    }

    #[test]
    fn pid_unavailable_has_fixed_message() {
        assert_eq!(
            ProcessError::PidUnavailable.to_string(),
            "process id is unavailable on this platform"
        );
    }

    #[test]
    fn pipeline_wraps_core_error_display() {
        let err: ProcessError = lineflow_core::Error::Interrupted.into();
        assert_eq!(err.to_string(), "blocking call was interrupted");
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProcessError>();
    }
}
