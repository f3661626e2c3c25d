//! Invocation requests.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// A single command to run: executable, argv, optional working directory and
/// a timeout.
///
/// Built by value and never mutated once handed to an invoker. Arguments are
/// opaque strings and reach the child process exactly as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    executable: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    timeout: Duration,
    env: Vec<(String, String)>,
}

impl InvocationRequest {
    pub fn new(executable: impl Into<String>, timeout: Duration) -> Self {
        Self {
            executable: executable.into(),
            args: Vec::new(),
            working_dir: None,
            timeout,
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Set a variable in the child's environment only.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn env_vars(&self) -> &[(String, String)] {
        &self.env
    }

    /// Human-readable rendering for status lines.
    ///
    /// Display only. The invoker never parses this string back.
    pub fn display_command(&self) -> String {
        let mut line = self.executable.clone();
        for arg in &self.args {
            line.push(' ');
            if arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'') {
                line.push_str(&format!("{:?}", arg));
            } else {
                line.push_str(arg);
            }
        }
        line
    }
}
