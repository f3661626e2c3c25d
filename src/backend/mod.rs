//! Assistant CLI backends.
//!
//! A backend knows how to shape the argument vector for its CLI and how to
//! pull the reply text out of what the CLI prints.

pub mod codex;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use serde::Serialize;
use tracing::debug;

use crate::config::Credential;
use crate::error::InvokeError;
use crate::invoke::{InvocationRequest, ProcessInvoker};

/// Timeout for the `--version` installation probe.
const PROBE_TIMEOUT_SECS: u64 = 10;

/// Supported assistant CLIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Codex,
    Gemini,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Codex => "Codex",
            Backend::Gemini => "Gemini",
        }
    }

    /// Name of the executable looked up on the search path.
    pub fn executable(&self) -> &'static str {
        match self {
            Backend::Codex => "codex",
            Backend::Gemini => "gemini",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Backend::Codex => "o3",
            Backend::Gemini => "gemini-2.5-pro",
        }
    }

    /// Environment variable holding the API key for headless use.
    pub fn credential_var(&self) -> &'static str {
        match self {
            Backend::Codex => "OPENAI_API_KEY",
            Backend::Gemini => "GEMINI_API_KEY",
        }
    }

    pub fn install_hint(&self) -> &'static str {
        match self {
            Backend::Codex => "npm install -g @openai/codex",
            Backend::Gemini => "npm install -g @google/gemini-cli",
        }
    }

    /// Argument vector for a single non-interactive prompt.
    ///
    /// The prompt is always the last, standalone argument.
    pub fn prompt_args(&self, model: &str, prompt: &str) -> Vec<String> {
        match self {
            Backend::Codex => vec![
                "--full-auto".to_string(),
                "-q".to_string(),
                "-m".to_string(),
                model.to_string(),
                prompt.to_string(),
            ],
            Backend::Gemini => vec![
                "-m".to_string(),
                model.to_string(),
                "-p".to_string(),
                prompt.to_string(),
            ],
        }
    }

    /// Turn trimmed stdout into the reply shown to the user.
    ///
    /// Output with no readable character at all (only bytes that failed to
    /// decode) is reported as [`InvokeError::MalformedOutput`].
    pub fn extract_reply(&self, stdout: &str) -> Result<String, InvokeError> {
        if is_undecodable(stdout) {
            return Err(InvokeError::MalformedOutput(format!(
                "{} produced {} bytes of non-text output",
                self.executable(),
                stdout.len()
            )));
        }

        Ok(match self {
            Backend::Codex => codex::extract_reply(stdout),
            Backend::Gemini => stdout.trim().to_string(),
        })
    }

    /// Check the CLI is installed and answers `--version`.
    ///
    /// Returns the version line it printed.
    pub async fn probe<I>(&self, invoker: &I) -> Result<String, InvokeError>
    where
        I: ProcessInvoker + ?Sized,
    {
        let request =
            InvocationRequest::new(self.executable(), Duration::from_secs(PROBE_TIMEOUT_SECS))
                .arg("--version");

        let stdout = invoker.invoke(&request).await.into_result()?;
        Ok(stdout.lines().next().unwrap_or_default().to_string())
    }
}

fn is_undecodable(stdout: &str) -> bool {
    !stdout.trim().is_empty()
        && stdout
            .chars()
            .all(|c| c == char::REPLACEMENT_CHARACTER || c.is_whitespace())
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configured assistant: backend, model, timeout and optional credential.
#[derive(Debug, Clone)]
pub struct Assistant {
    backend: Backend,
    model: String,
    timeout: Duration,
    credential: Option<Credential>,
    working_dir: Option<PathBuf>,
}

impl Assistant {
    pub fn new(backend: Backend, timeout: Duration) -> Self {
        Self {
            backend,
            model: backend.default_model().to_string(),
            timeout,
            credential: None,
            working_dir: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_credential(mut self, credential: Option<Credential>) -> Self {
        self.credential = credential;
        self
    }

    pub fn with_working_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.working_dir = dir;
        self
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build the request for one prompt.
    pub fn request(&self, prompt: &str) -> InvocationRequest {
        let mut request = InvocationRequest::new(self.backend.executable(), self.timeout)
            .args(self.backend.prompt_args(&self.model, prompt));
        if let Some(dir) = &self.working_dir {
            request = request.in_dir(dir.clone());
        }
        if let Some(credential) = &self.credential {
            request = request.env(credential.var(), credential.value());
        }
        request
    }

    /// Send one prompt and return the extracted reply.
    pub async fn ask<I>(&self, invoker: &I, prompt: &str) -> Result<String, InvokeError>
    where
        I: ProcessInvoker + ?Sized,
    {
        let request = self.request(prompt);
        debug!(backend = %self.backend, model = %self.model, "sending prompt");
        let stdout = invoker.invoke(&request).await.into_result()?;
        self.backend.extract_reply(&stdout)
    }
}
