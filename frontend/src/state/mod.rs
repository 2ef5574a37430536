//! # State Module
//!
//! - [`app_state`]: the application store (current user, groups, transactions)
//! - [`ui_state`]: loading flag and notifications

pub mod app_state;
pub mod ui_state;

pub use app_state::AppStore;
pub use ui_state::{FailureKind, Notification, UiState};
