//! Conversation transcripts: naming, rendering and persistence.

pub mod naming;
pub mod render;
pub mod writer;

use chrono::{DateTime, Local};
use clap::ValueEnum;
use serde::Serialize;

use crate::conversation::{Speaker, Turn};

pub use naming::{sanitize_label, transcript_file_name};
pub use render::render_markdown;
pub use writer::TranscriptWriter;

/// How a conversation run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TranscriptStatus {
    Completed,
    Interrupted,
    Failed,
}

impl TranscriptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptStatus::Completed => "Completed",
            TranscriptStatus::Interrupted => "Interrupted",
            TranscriptStatus::Failed => "Failed",
        }
    }
}

/// The persisted record of one conversation run.
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub project: String,
    pub participants: Vec<Speaker>,
    pub started_at: DateTime<Local>,
    pub status: TranscriptStatus,
    pub turns: Vec<Turn>,
}

/// On-disk transcript format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TranscriptFormat {
    #[default]
    Markdown,
    Json,
}

impl TranscriptFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            TranscriptFormat::Markdown => "md",
            TranscriptFormat::Json => "json",
        }
    }
}
