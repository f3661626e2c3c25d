//! summoner - relay prompts to AI-assistant CLIs.
//!
//! # Overview
//!
//! summoner shells out to an assistant CLI (`codex` or `gemini`), either one
//! prompt at a time from an interactive loop or as a turn-taking conversation
//! between two instances with different personalities. Conversations are
//! saved as Markdown or JSON transcripts.
//!
//! All process handling goes through [`invoke::ProcessInvoker`], which never
//! builds a shell command line and always returns a classified outcome.

pub mod backend;
pub mod config;
pub mod conversation;
pub mod error;
pub mod invoke;
pub mod repl;
pub mod retry;
pub mod transcript;

// Re-export commonly used types
pub use backend::{Assistant, Backend};
pub use conversation::{ConversationDriver, Interrupt, Personality, Speaker, Turn};
pub use error::{ConversationError, InvokeError, TranscriptError};
pub use invoke::{InvocationOutcome, InvocationRequest, InvokerConfig, ProcessInvoker, SystemInvoker};
pub use transcript::{Transcript, TranscriptFormat, TranscriptWriter};
