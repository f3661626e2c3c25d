//! The spawn seam.

use std::io;

use tokio::process::{Child, Command};

/// Starts a fully configured command.
///
/// This abstraction lets tests observe or refuse spawn attempts.
#[cfg_attr(test, mockall::automock)]
pub trait Launcher: Send + Sync {
    fn spawn(&self, command: &mut Command) -> io::Result<Child>;
}

/// Launcher that spawns the real process.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandLauncher;

impl Launcher for CommandLauncher {
    fn spawn(&self, command: &mut Command) -> io::Result<Child> {
        command.spawn()
    }
}
