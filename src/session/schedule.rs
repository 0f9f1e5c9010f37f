use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Shared cancellation flag. Clones observe the same flag, so a worker thread
/// holding a clone sees cancellation made on the UI side.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// True if both handles refer to the same flag.
    pub fn same_as(&self, other: &CancelToken) -> bool {
        Arc::ptr_eq(&self.cancelled, &other.cancelled)
    }
}

struct Pending<A> {
    due: Instant,
    action: A,
    token: CancelToken,
}

/// At most one delayed action. Scheduling a new one cancels the previous.
pub struct Scheduled<A> {
    pending: Option<Pending<A>>,
}

impl<A> Default for Scheduled<A> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<A> Scheduled<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, action: A, delay: Duration, now: Instant) -> CancelToken {
        self.cancel();
        let token = CancelToken::new();
        self.pending = Some(Pending {
            due: now + delay,
            action,
            token: token.clone(),
        });
        token
    }

    pub fn cancel(&mut self) {
        if let Some(p) = self.pending.take() {
            p.token.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|p| !p.token.is_cancelled())
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .filter(|p| !p.token.is_cancelled())
            .map(|p| p.due.saturating_duration_since(now))
    }

    /// Take the action if it is due. Cancelled tasks are dropped, never fired.
    pub fn poll(&mut self, now: Instant) -> Option<A> {
        let p = self.pending.as_ref()?;
        if p.token.is_cancelled() {
            self.pending = None;
            return None;
        }
        if now < p.due {
            return None;
        }
        self.pending.take().map(|p| p.action)
    }
}
