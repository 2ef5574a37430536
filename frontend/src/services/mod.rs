pub mod api;
pub mod logging;
pub mod scope;

pub use api::{ApiClient, ApiError, DEFAULT_BASE_URL};
pub use scope::{ScopeToken, ViewScope};
