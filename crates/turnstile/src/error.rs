//! Error types for gate submissions

/// Errors that can occur when submitting work to a [`Gate`](crate::Gate)
///
/// Failures raised by the work item itself are not represented here: a
/// panicking work item unwinds through the gate untouched once the lock has
/// been released.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    /// No work item was supplied
    ///
    /// Returned before any lock interaction; the gate is left untouched.
    #[error("no work item was supplied")]
    MissingWork,
}

/// Result of a gate submission
pub type GateResult<T> = Result<T, GateError>;
