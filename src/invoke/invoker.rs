//! Process invoker: resolve, spawn, wait with timeout, classify.

use std::env;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Instant;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::launcher::{CommandLauncher, Launcher};
use super::outcome::InvocationOutcome;
use super::request::InvocationRequest;

/// Process-wide state the invoker needs, captured once and injected.
#[derive(Debug, Clone, Default)]
pub struct InvokerConfig {
    /// Directories searched for bare executable names. With `None`, only names
    /// containing a path separator can be resolved.
    pub search_path: Option<OsString>,
    /// Working directory used when a request does not set one.
    pub working_dir: Option<PathBuf>,
    /// Extra variables set on every child. Request variables win on conflict.
    pub env: Vec<(String, String)>,
}

impl InvokerConfig {
    /// Snapshot `PATH` and the current directory of this process.
    pub fn from_process() -> Self {
        Self {
            search_path: env::var_os("PATH"),
            working_dir: env::current_dir().ok(),
            env: Vec::new(),
        }
    }
}

/// Trait for running one external command.
///
/// Implementations never fail: every problem is reported as an
/// [`InvocationOutcome`] variant.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProcessInvoker: Send + Sync {
    async fn invoke(&self, request: &InvocationRequest) -> InvocationOutcome;
}

/// Invoker backed by real child processes.
///
/// Holds no per-call state; every invocation is independent.
pub struct SystemInvoker<L = CommandLauncher> {
    config: InvokerConfig,
    launcher: L,
}

impl SystemInvoker<CommandLauncher> {
    pub fn new(config: InvokerConfig) -> Self {
        Self::with_launcher(config, CommandLauncher)
    }
}

impl<L: Launcher> SystemInvoker<L> {
    pub fn with_launcher(config: InvokerConfig, launcher: L) -> Self {
        Self { config, launcher }
    }

    pub fn config(&self) -> &InvokerConfig {
        &self.config
    }

    fn effective_dir<'a>(&'a self, request: &'a InvocationRequest) -> Option<&'a Path> {
        request.working_dir().or(self.config.working_dir.as_deref())
    }

    /// Locate the executable using the `which` crate.
    ///
    /// Names containing a separator are resolved against the working directory.
    fn resolve(&self, request: &InvocationRequest) -> Option<PathBuf> {
        let cwd = self.effective_dir(request).unwrap_or_else(|| Path::new("."));
        which::which_in(request.executable(), self.config.search_path.as_ref(), cwd).ok()
    }

    fn build_command(&self, program: &Path, request: &InvocationRequest) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(request.arguments())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = self.effective_dir(request) {
            cmd.current_dir(dir);
        }
        for (key, value) in self.config.env.iter().chain(request.env_vars()) {
            cmd.env(key, value);
        }
        cmd
    }
}

#[async_trait]
impl<L: Launcher> ProcessInvoker for SystemInvoker<L> {
    async fn invoke(&self, request: &InvocationRequest) -> InvocationOutcome {
        let Some(program) = self.resolve(request) else {
            debug!(executable = request.executable(), "executable not found");
            return InvocationOutcome::NotFound {
                executable: request.executable().to_string(),
            };
        };

        let mut cmd = self.build_command(&program, request);
        debug!(
            program = %program.display(),
            args = request.arguments().len(),
            timeout_secs = request.timeout().as_secs(),
            "launching process"
        );

        let started = Instant::now();
        let child = match self.launcher.spawn(&mut cmd) {
            Ok(child) => child,
            Err(e) => return classify_spawn_error(request.executable(), e),
        };

        // Dropping the wait future on timeout drops the child, and
        // kill_on_drop terminates it.
        match timeout(request.timeout(), child.wait_with_output()).await {
            Err(_) => {
                let elapsed = started.elapsed();
                warn!(
                    executable = request.executable(),
                    "process timed out after {:.1}s and was killed",
                    elapsed.as_secs_f64()
                );
                InvocationOutcome::Timeout { elapsed }
            }
            Ok(Err(e)) => {
                warn!(executable = request.executable(), "failed waiting on process: {}", e);
                InvocationOutcome::NonZeroExit {
                    exit_code: -1,
                    stderr: e.to_string(),
                }
            }
            Ok(Ok(output)) => {
                let outcome = classify_output(output);
                debug!(
                    executable = request.executable(),
                    success = outcome.is_success(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "process finished"
                );
                outcome
            }
        }
    }
}

/// Fold a spawn failure into an outcome.
///
/// A missing or non-executable program counts as not found; anything else is
/// reported as a failed run.
fn classify_spawn_error(executable: &str, error: io::Error) -> InvocationOutcome {
    match error.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
            debug!(executable, "spawn failed: {}", error);
            InvocationOutcome::NotFound {
                executable: executable.to_string(),
            }
        }
        _ => {
            warn!(executable, "spawn failed: {}", error);
            InvocationOutcome::NonZeroExit {
                exit_code: -1,
                stderr: error.to_string(),
            }
        }
    }
}

fn classify_output(output: Output) -> InvocationOutcome {
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        InvocationOutcome::Success {
            stdout,
            stderr,
            exit_code: 0,
        }
    } else {
        InvocationOutcome::NonZeroExit {
            exit_code: output.status.code().unwrap_or(-1),
            stderr,
        }
    }
}
