//! User-initiated cancellation.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// A one-way flag shared between the Ctrl-C listener and whoever needs to
/// stop between turns. Once raised it stays raised.
#[derive(Debug, Clone)]
pub struct Interrupt {
    tx: Arc<watch::Sender<bool>>,
}

impl Interrupt {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn raise(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_raised(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the flag is raised.
    pub async fn raised(&self) {
        let mut rx = self.tx.subscribe();
        let result = rx.wait_for(|raised| *raised).await.map(|_| ());
        if result.is_err() {
            // Unreachable while `self` holds the sender.
            std::future::pending::<()>().await;
        }
    }

    /// Raise this flag on the first Ctrl-C. A second Ctrl-C exits the process.
    pub fn listen_for_ctrl_c(&self) -> JoinHandle<()> {
        let interrupt = self.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl-C: {}", e);
                return;
            }
            debug!("Ctrl-C received");
            interrupt.raise();

            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nForced exit.");
                std::process::exit(130);
            }
        })
    }
}

impl Default for Interrupt {
    fn default() -> Self {
        Self::new()
    }
}
