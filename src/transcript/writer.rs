//! Write transcripts to disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::TranscriptError;

use super::naming::transcript_file_name;
use super::render::render_markdown;
use super::{Transcript, TranscriptFormat};

/// Writes one run's transcript to a path fixed at construction.
///
/// - Creates the output directory if it doesn't exist
/// - Writes to a temp file in the same directory, then renames over the target
/// - Repeated writes replace the previous content
#[derive(Debug, Clone)]
pub struct TranscriptWriter {
    dir: PathBuf,
    path: PathBuf,
    format: TranscriptFormat,
}

impl TranscriptWriter {
    pub fn new(
        dir: impl Into<PathBuf>,
        project: &str,
        format: TranscriptFormat,
        generated_at: DateTime<Local>,
    ) -> Self {
        let dir = dir.into();
        let path = dir.join(transcript_file_name(project, &generated_at, format));
        Self { dir, path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, transcript: &Transcript) -> Result<PathBuf, TranscriptError> {
        let content = match self.format {
            TranscriptFormat::Markdown => render_markdown(transcript),
            TranscriptFormat::Json => {
                let mut json = serde_json::to_string_pretty(transcript)
                    .map_err(TranscriptError::SerializationFailed)?;
                json.push('\n');
                json
            }
        };

        std::fs::create_dir_all(&self.dir).map_err(|source| TranscriptError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(TranscriptError::WriteFailed)?;
        tmp.write_all(content.as_bytes())
            .map_err(TranscriptError::WriteFailed)?;
        tmp.flush().map_err(TranscriptError::WriteFailed)?;
        tmp.persist(&self.path)
            .map_err(|e| TranscriptError::PersistFailed {
                path: self.path.clone(),
                source: e.error,
            })?;

        info!(
            path = %self.path.display(),
            turns = transcript.turns.len(),
            status = transcript.status.as_str(),
            "transcript written"
        );
        Ok(self.path.clone())
    }
}
