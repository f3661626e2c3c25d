//! External process invocation.
//!
//! One request in, one classified outcome out. Arguments are handed to the
//! spawn primitive as a pre-split vector and never pass through a shell.

pub mod invoker;
pub mod launcher;
pub mod outcome;
pub mod request;

pub use invoker::{InvokerConfig, ProcessInvoker, SystemInvoker};
pub use launcher::{CommandLauncher, Launcher};
pub use outcome::InvocationOutcome;
pub use request::InvocationRequest;
