//! Groups page: listing, creating, editing and deleting groups.

use futures::future::try_join_all;
use shared::{EntityId, Group, GroupDetails, GroupPatch, UpdateGroupRequest};
use tracing::{info, warn};

use super::{guarded, LoadError};
use crate::services::{ApiClient, ApiError, ViewScope};
use crate::state::{AppStore, FailureKind, UiState};

/// Replace the store's groups with `GET /groups`
pub async fn load_groups(
    api: &ApiClient,
    scope: &ViewScope,
    store: &mut AppStore,
    ui: &mut UiState,
) -> Result<(), LoadError> {
    let groups = guarded(scope, ui, FailureKind::LoadGroups, api.groups().get_all()).await?;
    info!("Loaded {} groups", groups.len());
    store.set_groups(groups);
    Ok(())
}

/// Load every group together with its transactions.
///
/// The per-group fetches run concurrently. If any of them fails the whole
/// load fails and the store keeps its previous groups; on success the store
/// receives one combined update with every `transactions` embed filled.
pub async fn load_groups_with_transactions(
    api: &ApiClient,
    scope: &ViewScope,
    store: &mut AppStore,
    ui: &mut UiState,
) -> Result<(), LoadError> {
    let request = async {
        let groups = api.groups().get_all().await?;
        let transactions = try_join_all(
            groups
                .iter()
                .map(|group| api.groups().get_group_transactions(&group.id)),
        )
        .await?;

        Ok::<_, ApiError>(groups
            .into_iter()
            .zip(transactions)
            .map(|(mut group, transactions)| {
                group.transactions = Some(transactions);
                group
            })
            .collect::<Vec<_>>())
    };

    let groups = guarded(scope, ui, FailureKind::LoadGroups, request).await?;
    info!("Loaded {} groups with transactions", groups.len());
    store.set_groups(groups);
    Ok(())
}

/// Create a group owned by the current user and append it to the store
pub async fn create_group(
    api: &ApiClient,
    scope: &ViewScope,
    store: &mut AppStore,
    ui: &mut UiState,
    details: GroupDetails,
) -> Result<Group, LoadError> {
    let Some(creator_id) = store.current_user().map(|user| user.id.clone()) else {
        warn!("Refusing to create group '{}' without a current user", details.name);
        return Err(LoadError::NotLoggedIn);
    };

    let group = guarded(
        scope,
        ui,
        FailureKind::CreateGroup,
        api.groups().create(details, &creator_id),
    )
    .await?;

    info!("Created group {} ({})", group.id, group.name);
    store.add_group(group.clone());
    ui.notify_success("Group created");
    Ok(group)
}

/// Send `request` to the backend, then mirror the same fields locally
pub async fn update_group(
    api: &ApiClient,
    scope: &ViewScope,
    store: &mut AppStore,
    ui: &mut UiState,
    group_id: &EntityId,
    request: UpdateGroupRequest,
) -> Result<Group, LoadError> {
    let group = guarded(
        scope,
        ui,
        FailureKind::UpdateGroup,
        api.groups().update(group_id, request.clone()),
    )
    .await?;

    store.update_group(group_id, GroupPatch::from(request));
    ui.notify_success("Group updated");
    Ok(group)
}

pub async fn rename_group(
    api: &ApiClient,
    scope: &ViewScope,
    store: &mut AppStore,
    ui: &mut UiState,
    group_id: &EntityId,
    name: impl Into<String>,
) -> Result<Group, LoadError> {
    let request = UpdateGroupRequest {
        name: Some(name.into()),
        description: None,
    };
    update_group(api, scope, store, ui, group_id, request).await
}

/// Delete remotely first; the local entry is only removed once the backend
/// has confirmed.
pub async fn delete_group(
    api: &ApiClient,
    scope: &ViewScope,
    store: &mut AppStore,
    ui: &mut UiState,
    group_id: &EntityId,
) -> Result<(), LoadError> {
    guarded(scope, ui, FailureKind::DeleteGroup, api.groups().delete(group_id)).await?;

    info!("Deleted group {}", group_id);
    store.delete_group(group_id);
    ui.notify_success("Group deleted");
    Ok(())
}

/// Add `user_id` to the group, then refresh the group's member embed.
///
/// The two steps report separately: once the POST succeeds the member is
/// added, so a failed refresh raises `LoadGroups` and leaves the store as it
/// was rather than reporting the add as failed.
pub async fn add_member(
    api: &ApiClient,
    scope: &ViewScope,
    store: &mut AppStore,
    ui: &mut UiState,
    group_id: &EntityId,
    user_id: &EntityId,
) -> Result<(), LoadError> {
    guarded(
        scope,
        ui,
        FailureKind::AddMember,
        api.groups().add_user_to_group(group_id, user_id),
    )
    .await?;
    info!("Added user {} to group {}", user_id, group_id);
    ui.notify_success("Member added");

    let users = guarded(
        scope,
        ui,
        FailureKind::LoadGroups,
        api.groups().get_group_users(group_id),
    )
    .await?;
    info!("Group {} now has {} members", group_id, users.len());
    store.update_group(
        group_id,
        GroupPatch {
            users: Some(users),
            ..GroupPatch::default()
        },
    );
    Ok(())
}
