//! Success and failure messages for operation feedback.

use std::fmt;

use crate::error::WaypointError;

/// A one-line outcome message, prefixed with `Success:` or `Error:`.
///
/// Front ends use this for refusals that are part of normal operation
/// (deleting a task others depend on, editing a completed task) so the
/// caller sees an explanation rather than a failed request.
pub struct OperationStatus {
    pub message: String,
    pub success: bool,
}

impl OperationStatus {
    /// Create a new success status.
    pub fn success(message: String) -> Self {
        Self {
            message,
            success: true,
        }
    }

    /// Create a new failure status.
    pub fn failure(message: String) -> Self {
        Self {
            message,
            success: false,
        }
    }

    /// Failure status carrying the error's message.
    pub fn from_error(error: &WaypointError) -> Self {
        Self::failure(error.to_string())
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", if self.success { "Success:" } else { "Error:" }, self.message)
    }
}
