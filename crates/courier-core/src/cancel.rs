//! Cooperative cancellation forwarded from caller to handler.
//!
//! The dispatcher never cancels anything itself. Callers own a
//! [`CancellationToken`] and hand a read-only [`CancellationSignal`] to
//! [`Dispatcher::dispatch`](crate::app::Dispatcher::dispatch); handlers decide
//! where (and whether) to observe it.

use tokio_util::sync::CancellationToken;

/// Read-only view of a caller's cancellation token.
///
/// Cloning is cheap and every clone observes the same state.
#[derive(Debug, Clone)]
pub struct CancellationSignal {
    token: CancellationToken,
}

/// Error a handler may return after observing cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("operation cancelled")]
pub struct Cancelled;

impl CancellationSignal {
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    /// A signal nobody can trigger.
    pub fn never() -> Self {
        Self::new(CancellationToken::new())
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes once the caller cancels. Pends forever for [`never`](Self::never).
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// `Err(Cancelled)` if cancellation was requested, for use with `?`.
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.token.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

impl Default for CancellationSignal {
    fn default() -> Self {
        Self::never()
    }
}

impl From<CancellationToken> for CancellationSignal {
    fn from(token: CancellationToken) -> Self {
        Self::new(token)
    }
}

impl From<&CancellationToken> for CancellationSignal {
    fn from(token: &CancellationToken) -> Self {
        Self::new(token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn signal_follows_the_callers_token() {
        let token = CancellationToken::new();
        let signal = CancellationSignal::from(&token);
        let clone = signal.clone();

        assert!(!signal.is_cancelled());
        assert_eq!(signal.check(), Ok(()));

        token.cancel();

        assert!(signal.is_cancelled());
        assert!(clone.is_cancelled());
        assert_eq!(clone.check(), Err(Cancelled));
    }

    #[test]
    fn never_is_never_cancelled() {
        let signal = CancellationSignal::never();
        assert!(!signal.is_cancelled());
        assert!(signal.check().is_ok());
    }

    #[tokio::test]
    async fn cancelled_resolves_after_cancel() {
        let token = CancellationToken::new();
        let signal = CancellationSignal::new(token.clone());

        let waiter = tokio::spawn(async move { signal.cancelled().await });
        tokio::time::sleep(Duration::from_millis(5)).await;
        token.cancel();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("cancelled() should resolve")
            .unwrap();
    }
}
