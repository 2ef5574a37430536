//! # Group Ledger Frontend
//!
//! Client-side core for tracking shared group expenses.
//!
//! ```text
//! views (external)
//!     ↓
//! hooks     view loaders: API call + store commit + notification
//!     ↓
//! services  API client, view scopes, logging
//! state     application store, UI state
//!     ↓
//! shared    DTOs exchanged with the backend
//! ```

pub mod hooks;
pub mod services;
pub mod state;

pub use hooks::LoadError;
pub use services::{ApiClient, ApiError, ViewScope};
pub use state::{AppStore, FailureKind, Notification, UiState};
