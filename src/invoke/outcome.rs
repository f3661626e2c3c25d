//! Classified results of one invocation.

use std::time::Duration;

use crate::error::InvokeError;

/// Exactly one of these is produced per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    /// Exited 0 before the deadline. `stdout` is trimmed.
    Success {
        stdout: String,
        stderr: String,
        exit_code: i32,
    },
    /// Still running at the deadline and killed.
    Timeout { elapsed: Duration },
    /// The executable could not be located; nothing was spawned.
    NotFound { executable: String },
    /// Exited with a non-zero code, or was killed by a signal (`-1`).
    NonZeroExit { exit_code: i32, stderr: String },
}

impl InvocationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, InvocationOutcome::Success { .. })
    }

    /// Convert into the captured stdout, or the matching [`InvokeError`].
    pub fn into_result(self) -> Result<String, InvokeError> {
        match self {
            InvocationOutcome::Success { stdout, .. } => Ok(stdout),
            InvocationOutcome::Timeout { elapsed } => Err(InvokeError::Timeout(elapsed.as_secs())),
            InvocationOutcome::NotFound { executable } => Err(InvokeError::NotFound(executable)),
            InvocationOutcome::NonZeroExit { exit_code, stderr } => {
                let stderr = match stderr.trim() {
                    "" => "Unknown error occurred".to_string(),
                    s => s.to_string(),
                };
                Err(InvokeError::NonZeroExit {
                    code: exit_code,
                    stderr,
                })
            }
        }
    }
}
