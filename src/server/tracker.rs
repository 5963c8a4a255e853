//! Shared active-connection accounting and the adaptive idle timeout.

use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Process-wide count of open connections.
///
/// The counter is only reachable through [`acquire`], which hands out a
/// [`ConnectionPermit`]; releasing happens when the permit drops. That
/// makes the increment/decrement pairing hold on every exit path of a
/// connection task, including panics, and leaves a double decrement
/// unrepresentable.
///
/// [`acquire`]: ConnectionTracker::acquire
#[derive(Debug, Clone)]
pub struct ConnectionTracker {
    active: Arc<Mutex<usize>>,
    idle_budget: Duration,
}

impl ConnectionTracker {
    /// `idle_budget` is the fixed process-wide time budget shared across
    /// all idle connections.
    pub fn new(idle_budget: Duration) -> Self {
        Self {
            active: Arc::new(Mutex::new(0)),
            idle_budget,
        }
    }

    /// Registers one connection and returns its permit.
    pub fn acquire(&self) -> ConnectionPermit {
        let mut active = lock(&self.active);
        *active += 1;

        ConnectionPermit {
            active: Arc::clone(&self.active),
        }
    }

    /// Current number of open connections.
    pub fn active(&self) -> usize {
        *lock(&self.active)
    }

    /// Per-read idle timeout: `budget / max(1, active)`.
    ///
    /// Idle slots shrink as load grows, so under a burst idle connections
    /// are reaped faster. With no active connections the full budget
    /// applies; there is no division by zero.
    pub fn idle_timeout(&self) -> Duration {
        let active = self.active().max(1);
        self.idle_budget.div_f64(active as f64)
    }
}

/// One connection's slot in the tracker; dropping it releases the slot.
#[derive(Debug)]
pub struct ConnectionPermit {
    active: Arc<Mutex<usize>>,
}

impl Drop for ConnectionPermit {
    fn drop(&mut self) {
        let mut active = lock(&self.active);
        *active = active.saturating_sub(1);
    }
}

// A poisoned lock only means another connection task panicked between
// lock and unlock; the count itself is still a plain integer, so recover
// the guard rather than propagating the poison.
fn lock(active: &Mutex<usize>) -> std::sync::MutexGuard<'_, usize> {
    match active.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
