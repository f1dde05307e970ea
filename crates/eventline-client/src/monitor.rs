use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

/// Decides whether the consume loop should keep running.
///
/// Checked once per outer loop iteration, never mid-session; a blocked read
/// is only cut short by the connection itself ending.
pub trait StreamMonitor: Send + Sync {
    fn should_continue(&self) -> bool;
}

/// Monitor driven by a shared stop flag.
#[derive(Default)]
pub struct ShutdownFlag {
    stopped: Arc<AtomicBool>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle that can stop the loop from another task, e.g. a ctrl-c
    /// handler. The loop finishes its current session first.
    pub fn handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            stopped: self.stopped.clone(),
        }
    }
}

impl StreamMonitor for ShutdownFlag {
    fn should_continue(&self) -> bool {
        !self.stopped.load(Ordering::Relaxed)
    }
}

#[derive(Clone)]
pub struct ShutdownHandle {
    stopped: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }
}

/// Monitor that allows a fixed number of sessions, then stops the loop.
///
/// Useful for bounded consumption runs, and as a give-up policy for callers
/// that do not want indefinite reconnects on a subscription that keeps
/// failing.
pub struct SessionBudget {
    remaining: AtomicU32,
}

impl SessionBudget {
    pub fn new(sessions: u32) -> Self {
        Self {
            remaining: AtomicU32::new(sessions),
        }
    }
}

impl StreamMonitor for SessionBudget {
    fn should_continue(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok()
    }
}
