//! Users page and session selection.
//!
//! The user directory is page-local: `load_users` hands the list back to the
//! caller instead of putting it in the store.

use shared::{CreateUserRequest, EntityId, User};
use tracing::info;

use super::{guarded, LoadError};
use crate::services::{ApiClient, ViewScope};
use crate::state::{AppStore, FailureKind, UiState};

pub async fn load_users(
    api: &ApiClient,
    scope: &ViewScope,
    ui: &mut UiState,
) -> Result<Vec<User>, LoadError> {
    let users = guarded(scope, ui, FailureKind::LoadUsers, api.users().get_all()).await?;
    info!("Loaded {} users", users.len());
    Ok(users)
}

pub async fn create_user(
    api: &ApiClient,
    scope: &ViewScope,
    ui: &mut UiState,
    request: CreateUserRequest,
) -> Result<User, LoadError> {
    let user = guarded(scope, ui, FailureKind::CreateUser, api.users().create(request)).await?;
    info!("Created user {} ({})", user.id, user.email);
    ui.notify_success("User created");
    Ok(user)
}

/// Fetch `user_id` and make it the store's current user
pub async fn select_current_user(
    api: &ApiClient,
    scope: &ViewScope,
    store: &mut AppStore,
    ui: &mut UiState,
    user_id: &EntityId,
) -> Result<User, LoadError> {
    let user = guarded(
        scope,
        ui,
        FailureKind::SelectUser,
        api.users().get_user_by_id(user_id),
    )
    .await?;

    store.set_current_user(Some(user.clone()));
    Ok(user)
}
