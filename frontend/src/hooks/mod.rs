//! # View Loaders
//!
//! The call sites that sit between views and the API client. Each loader:
//!
//! 1. marks the UI as loading,
//! 2. awaits the request inside the view's [`ViewScope`],
//! 3. on success commits the result to the [`AppStore`](crate::state::AppStore),
//! 4. on failure logs the error, raises one failure notification for its
//!    category and leaves the store exactly as it was.
//!
//! A cancelled request raises no notification and never reaches the store.
//! Errors are also returned so callers can branch on them.

pub mod use_groups;
pub mod use_profile;
pub mod use_transactions;
pub mod use_users;

use std::future::Future;

use tracing::{debug, error};

use crate::services::{ApiError, ViewScope};
use crate::state::{FailureKind, UiState};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The operation needs a current user and there is none
    #[error("No user is logged in")]
    NotLoggedIn,
}

impl LoadError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, LoadError::Api(ApiError::Cancelled))
    }
}

/// Holds `UiState::loading` up; clears it on drop, including when the loader
/// future itself is dropped mid-flight.
struct Loading<'a>(&'a mut UiState);

impl<'a> Loading<'a> {
    fn start(ui: &'a mut UiState) -> Self {
        ui.loading = true;
        Self(ui)
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        self.0.loading = false;
    }
}

/// Run `request` in `scope`, keeping `ui` in step with its outcome
async fn guarded<T, F>(
    scope: &ViewScope,
    ui: &mut UiState,
    kind: FailureKind,
    request: F,
) -> Result<T, LoadError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    let loading = Loading::start(ui);
    let result = scope.run(request).await;
    drop(loading);

    match result {
        Ok(value) => Ok(value),
        Err(ApiError::Cancelled) => {
            debug!("{:?} skipped: view scope cancelled", kind);
            Err(ApiError::Cancelled.into())
        }
        Err(e) => {
            error!("{:?} failed: {}", kind, e);
            ui.notify_failure(kind);
            Err(e.into())
        }
    }
}
