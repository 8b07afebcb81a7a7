//! Request-scoped cancelable deadline threaded through store operations.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::StoreError;

/// Cancellation token plus an optional absolute deadline.
///
/// Cloning shares the token: cancelling any clone cancels all of them.
/// Store operations never extend the caller's deadline; they only narrow
/// it to their own configured timeout.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context with no deadline that is never cancelled unless asked to.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Uses an existing token, e.g. one tied to server shutdown.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Derives a child scope bounded by both this context and `timeout`.
    pub fn derive(&self, timeout: Duration) -> Scope {
        let own = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(parent) if parent < own => parent,
            _ => own,
        };
        Scope {
            cancel: self.cancel.child_token(),
            deadline,
            timeout,
        }
    }
}

/// A derived deadline for a single operation.
#[derive(Debug)]
pub struct Scope {
    cancel: CancellationToken,
    deadline: Instant,
    timeout: Duration,
}

impl Scope {
    /// Runs `fut` until it completes, the deadline passes, or the scope is
    /// cancelled. The latter two abandon `fut` and yield a transport error.
    pub async fn run<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(StoreError::cancelled()),
            res = tokio::time::timeout_at(self.deadline, fut) => {
                res.unwrap_or_else(|_| Err(StoreError::timeout(self.timeout)))
            }
        }
    }
}
