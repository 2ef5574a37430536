//! Cancellation scoped to a view.
//!
//! A view creates one [`ViewScope`] when it mounts and cancels it (or drops
//! it) when the user navigates away. Requests run through the scope resolve
//! to [`ApiError::Cancelled`] from that point on, so a late response can never
//! overwrite the store with data for a view that is gone.

use std::future::Future;

use tokio::sync::watch;
use tracing::debug;

use crate::services::api::ApiError;

#[derive(Debug)]
pub struct ViewScope {
    cancelled: watch::Sender<bool>,
}

impl ViewScope {
    pub fn new() -> Self {
        let (cancelled, _) = watch::channel(false);
        Self { cancelled }
    }

    /// Cancel every request running in this scope, now and later
    pub fn cancel(&self) {
        debug!("Cancelling view scope");
        self.cancelled.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }

    /// Detached handle that outlives borrows of the scope
    pub fn token(&self) -> ScopeToken {
        ScopeToken {
            cancelled: self.cancelled.subscribe(),
        }
    }

    /// Await `request` unless the scope is cancelled first
    pub async fn run<T, F>(&self, request: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        self.token().run(request).await
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of a [`ViewScope`]; cancelled when the scope is cancelled
/// or dropped.
#[derive(Debug, Clone)]
pub struct ScopeToken {
    cancelled: watch::Receiver<bool>,
}

impl ScopeToken {
    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow() || self.cancelled.has_changed().is_err()
    }

    pub async fn run<T, F>(mut self, request: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        if self.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        tokio::select! {
            biased;
            // Resolves on cancel, or with an error once the scope is dropped
            _ = self.cancelled.wait_for(|cancelled| *cancelled) => Err(ApiError::Cancelled),
            result = request => result,
        }
    }
}
