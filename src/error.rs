//! Error types for summoner modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors a caller can see from one external invocation.
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("Process timed out after {0} seconds")]
    Timeout(u64),

    #[error("Executable '{0}' not found. Make sure it is installed and in your PATH.")]
    NotFound(String),

    #[error("Process exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("Interrupted by user")]
    Interrupted,

    #[error("Could not decode assistant output: {0}")]
    MalformedOutput(String),

    #[error("All retry attempts failed: {0}")]
    RetriesExhausted(#[source] Box<InvokeError>),
}

impl InvokeError {
    /// Whether trying the same invocation again could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, InvokeError::Timeout(_) | InvokeError::NonZeroExit { .. })
    }
}

/// Errors from transcript persistence.
#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("Failed to create transcript directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write transcript: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("Failed to move transcript into place at {}: {source}", path.display())]
    PersistFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize transcript: {0}")]
    SerializationFailed(#[source] serde_json::Error),
}

/// Errors that end a conversation run early.
#[derive(Error, Debug)]
pub enum ConversationError {
    #[error("{speaker} failed in round {round}: {source}")]
    Turn {
        speaker: String,
        round: u32,
        #[source]
        source: InvokeError,
        /// Where the partial transcript went, if it could be written.
        transcript: Option<PathBuf>,
    },

    #[error(transparent)]
    Transcript(#[from] TranscriptError),
}
