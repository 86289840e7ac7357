//! Error types for knob configuration.

use thiserror::Error;

/// Errors surfaced by the knob configuration surface.
///
/// Most setters reject invalid input silently by leaving the previous value
/// in place. The wheel partition count is the one field that reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KnobError {
    #[error("Mouse wheel bar partitions has to be greater than zero (got {0})")]
    WheelPartitionsOutOfRange(i32),
}

/// Result type for knob configuration operations.
pub type KnobResult<T> = Result<T, KnobError>;
