//! Cooperative cancellation for a mirror run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Exit status used when the user interrupts the run (128 + SIGINT).
pub const INTERRUPTED_EXIT_CODE: u8 = 130;

/// Shared interrupt flag.
///
/// Checked between dispatches, and awaitable so that in-flight waits
/// (semaphore permits, sequential seed fetches, task joins) can be
/// abandoned as soon as the user presses Ctrl-C.
#[derive(Debug, Default)]
pub struct Interrupt {
    triggered: AtomicBool,
    notify: Notify,
}

impl Interrupt {
    /// Creates an untriggered interrupt.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the run as interrupted and wakes every waiter.
    pub fn trigger(&self) {
        self.triggered.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    /// Returns true once [`trigger`](Self::trigger) has been called.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Resolves once the interrupt has been triggered.
    pub async fn wait(&self) {
        // Register before checking the flag so a trigger racing with this
        // call is never missed.
        let notified = self.notify.notified();
        if self.is_triggered() {
            return;
        }
        notified.await;
    }
}

/// Spawns a task that triggers `interrupt` on the first Ctrl-C.
///
/// A second Ctrl-C exits the process immediately.
pub fn spawn_ctrl_c_listener(interrupt: Arc<Interrupt>) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            debug!("ctrl-c handler unavailable; interrupt disabled");
            return;
        }
        warn!("Interrupt received, stopping downloads");
        interrupt.trigger();

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(i32::from(INTERRUPTED_EXIT_CODE));
        }
    })
}
