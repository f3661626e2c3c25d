//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::io;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::{Child, Command};

use summoner::conversation::{Interrupt, Speaker};
use summoner::invoke::{CommandLauncher, Launcher};
use summoner::{InvocationOutcome, InvocationRequest, ProcessInvoker};

/// Create a temporary directory for test output.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Launcher that counts spawn attempts before delegating to the real one.
#[derive(Default)]
pub struct RecordingLauncher {
    spawns: AtomicU32,
}

impl RecordingLauncher {
    pub fn spawn_count(&self) -> u32 {
        self.spawns.load(Ordering::SeqCst)
    }
}

impl Launcher for RecordingLauncher {
    fn spawn(&self, command: &mut Command) -> io::Result<Child> {
        self.spawns.fetch_add(1, Ordering::SeqCst);
        CommandLauncher.spawn(command)
    }
}

impl Launcher for &RecordingLauncher {
    fn spawn(&self, command: &mut Command) -> io::Result<Child> {
        (**self).spawn(command)
    }
}

/// Decides the outcome of the n-th call (1-based) given the prompt argument.
pub type Script = Box<dyn Fn(u32, &str) -> InvocationOutcome + Send + Sync>;

/// Invoker that answers from a script instead of spawning anything and keeps
/// every request it was given.
pub struct ScriptedInvoker {
    script: Script,
    calls: AtomicU32,
    requests: Mutex<Vec<InvocationRequest>>,
    /// Raised just before the given call returns, simulating Ctrl-C mid-invocation.
    interrupt_on_call: Option<(u32, Interrupt)>,
}

impl ScriptedInvoker {
    pub fn new(script: impl Fn(u32, &str) -> InvocationOutcome + Send + Sync + 'static) -> Self {
        Self {
            script: Box::new(script),
            calls: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
            interrupt_on_call: None,
        }
    }

    /// Replies `"<n>: reply"` to every call.
    pub fn echoing() -> Self {
        Self::new(|n, _| success(&format!("{}: reply", n)))
    }

    pub fn interrupt_during_call(mut self, call: u32, interrupt: Interrupt) -> Self {
        self.interrupt_on_call = Some((call, interrupt));
        self
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.arguments().last().cloned().unwrap_or_default())
            .collect()
    }
}

#[async_trait]
impl ProcessInvoker for ScriptedInvoker {
    async fn invoke(&self, request: &InvocationRequest) -> InvocationOutcome {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.requests.lock().unwrap().push(request.clone());

        let prompt = request.arguments().last().cloned().unwrap_or_default();
        let outcome = (self.script)(n, &prompt);

        if let Some((call, interrupt)) = &self.interrupt_on_call {
            if *call == n {
                interrupt.raise();
            }
        }
        outcome
    }
}

pub fn success(stdout: &str) -> InvocationOutcome {
    InvocationOutcome::Success {
        stdout: stdout.to_string(),
        stderr: String::new(),
        exit_code: 0,
    }
}

pub fn timeout_outcome() -> InvocationOutcome {
    InvocationOutcome::Timeout {
        elapsed: Duration::from_secs(120),
    }
}

pub fn two_speakers() -> [Speaker; 2] {
    [Speaker::new("Codex Alpha"), Speaker::new("Codex Beta")]
}
