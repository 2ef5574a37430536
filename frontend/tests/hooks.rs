mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Path,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use common::{group_json, serve, transaction_json, unreachable_base_url, user_json, Recorder};
use group_ledger_frontend::hooks::{use_groups, use_profile, use_transactions, use_users};
use group_ledger_frontend::{
    ApiClient, AppStore, FailureKind, LoadError, Notification, UiState, ViewScope,
};
use serde_json::{json, Value};
use shared::{EntityId, Group, GroupDetails, TransactionType, UpdateTransactionRequest, User};

fn store_with_groups() -> AppStore {
    let mut store = AppStore::new();
    store.set_groups(vec![
        serde_json::from_value::<Group>(group_json("1", "Trip")).unwrap(),
        serde_json::from_value::<Group>(group_json("2", "House")).unwrap(),
    ]);
    store
}

fn logged_in_store() -> AppStore {
    let mut store = AppStore::new();
    store.set_current_user(Some(serde_json::from_value::<User>(user_json("42", "Ana")).unwrap()));
    store
}

#[tokio::test]
async fn test_failed_user_load_notifies_and_keeps_store() {
    let api = ApiClient::with_base_url(unreachable_base_url().await);
    let scope = ViewScope::new();
    let store = store_with_groups();
    let mut ui = UiState::new();
    let groups_before = store.groups();
    let transactions_before = store.transactions();

    let result = use_users::load_users(&api, &scope, &mut ui).await;

    assert!(matches!(result, Err(LoadError::Api(_))));
    assert_eq!(ui.notifications(), &[Notification::Failure(FailureKind::LoadUsers)]);
    assert!(!ui.loading);
    assert!(Arc::ptr_eq(&groups_before, &store.groups()));
    assert!(Arc::ptr_eq(&transactions_before, &store.transactions()));
}

#[tokio::test]
async fn test_load_groups_with_transactions_fills_embeds() {
    let routes = Router::new()
        .route(
            "/groups",
            get(|| async { Json(json!([group_json("1", "Trip"), group_json("2", "House")])) }),
        )
        .route(
            "/groups/:id/transactions",
            get(|Path(id): Path<String>| async move {
                let transactions = if id == "1" {
                    json!([
                        transaction_json("t1", "1", "expense", 30.0),
                        transaction_json("t2", "1", "income", 100.0)
                    ])
                } else {
                    json!([])
                };
                Json(transactions)
            }),
        );
    let api = ApiClient::with_base_url(serve(routes).await);
    let scope = ViewScope::new();
    let mut store = AppStore::new();
    let mut ui = UiState::new();

    use_groups::load_groups_with_transactions(&api, &scope, &mut store, &mut ui)
        .await
        .unwrap();

    let groups = store.groups();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].transaction_count(), 2);
    assert_eq!(groups[1].transactions, Some(vec![]));
    assert_eq!(store.revision(), 1);
    assert!(ui.notifications().is_empty());
}

#[tokio::test]
async fn test_one_failed_group_fetch_fails_the_whole_load() {
    let routes = Router::new()
        .route(
            "/groups",
            get(|| async { Json(json!([group_json("1", "Trip"), group_json("3", "Broken")])) }),
        )
        .route(
            "/groups/:id/transactions",
            get(|Path(id): Path<String>| async move {
                if id == "3" {
                    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "boom" })))
                } else {
                    (StatusCode::OK, Json(json!([])))
                }
            }),
        );
    let api = ApiClient::with_base_url(serve(routes).await);
    let scope = ViewScope::new();
    let mut store = store_with_groups();
    let mut ui = UiState::new();
    let before = store.groups();
    let revision = store.revision();

    let result = use_groups::load_groups_with_transactions(&api, &scope, &mut store, &mut ui).await;

    assert!(result.is_err());
    assert!(Arc::ptr_eq(&before, &store.groups()));
    assert_eq!(store.revision(), revision);
    assert_eq!(ui.failures().collect::<Vec<_>>(), vec![FailureKind::LoadGroups]);
}

#[tokio::test]
async fn test_create_group_requires_current_user() {
    let recorder = Recorder::default();
    let routes = Router::new().route(
        "/groups",
        post({
            let recorder = recorder.clone();
            move |Json(body): Json<Value>| async move {
                recorder.record("POST", "/groups", Some(body));
                Json(group_json("1", "Trip"))
            }
        }),
    );
    let api = ApiClient::with_base_url(serve(routes).await);
    let scope = ViewScope::new();
    let mut store = AppStore::new();
    let mut ui = UiState::new();

    let details = GroupDetails {
        name: "Trip".to_string(),
        description: None,
    };
    let result = use_groups::create_group(&api, &scope, &mut store, &mut ui, details).await;

    assert!(matches!(result, Err(LoadError::NotLoggedIn)));
    assert!(recorder.requests().is_empty());
    assert!(store.groups().is_empty());
}

#[tokio::test]
async fn test_create_group_appends_to_store() {
    let recorder = Recorder::default();
    let routes = Router::new().route(
        "/groups",
        post({
            let recorder = recorder.clone();
            move |Json(body): Json<Value>| async move {
                recorder.record("POST", "/groups", Some(body));
                (
                    StatusCode::CREATED,
                    Json(json!({ "id": "1", "name": "Trip", "description": "Beach" })),
                )
            }
        }),
    );
    let api = ApiClient::with_base_url(serve(routes).await);
    let scope = ViewScope::new();
    let mut store = logged_in_store();
    let mut ui = UiState::new();

    let details = GroupDetails {
        name: "Trip".to_string(),
        description: Some("Beach".to_string()),
    };
    let group = use_groups::create_group(&api, &scope, &mut store, &mut ui, details)
        .await
        .unwrap();

    assert_eq!(group.id, "1");
    assert_eq!(store.groups().len(), 1);
    assert_eq!(recorder.requests()[0].body.as_ref().unwrap()["creatorId"], "42");
    assert_eq!(
        ui.last_notification(),
        Some(&Notification::Success("Group created".to_string()))
    );
}

#[tokio::test]
async fn test_failed_delete_keeps_local_group() {
    let routes = Router::new().route(
        "/groups/:id",
        axum::routing::delete(|Path(id): Path<String>| async move {
            if id == "1" {
                StatusCode::NO_CONTENT
            } else {
                StatusCode::NOT_FOUND
            }
        }),
    );
    let api = ApiClient::with_base_url(serve(routes).await);
    let scope = ViewScope::new();
    let mut store = store_with_groups();
    let mut ui = UiState::new();

    let result = use_groups::delete_group(&api, &scope, &mut store, &mut ui, &EntityId::from("2")).await;
    assert!(result.is_err());
    assert_eq!(store.groups().len(), 2);
    assert_eq!(ui.last_notification(), Some(&Notification::Failure(FailureKind::DeleteGroup)));

    use_groups::delete_group(&api, &scope, &mut store, &mut ui, &EntityId::from("1"))
        .await
        .unwrap();
    let groups = store.groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].id, "2");
}

#[tokio::test]
async fn test_rename_and_add_member_patch_the_store() {
    let routes = Router::new()
        .route(
            "/groups/:id",
            put(|Path(id): Path<String>, Json(body): Json<Value>| async move {
                Json(json!({ "id": id, "name": body["name"] }))
            }),
        )
        .route(
            "/groups/:group_id/users/:user_id",
            post(|Path((_group_id, _user_id)): Path<(String, String)>| async { StatusCode::OK }),
        )
        .route(
            "/groups/:id/users",
            get(|Path(_id): Path<String>| async { Json(json!([user_json("42", "Ana"), user_json("7", "Caio")])) }),
        );
    let api = ApiClient::with_base_url(serve(routes).await);
    let scope = ViewScope::new();
    let mut store = store_with_groups();
    let mut ui = UiState::new();
    let id = EntityId::from("1");

    use_groups::rename_group(&api, &scope, &mut store, &mut ui, &id, "Road trip")
        .await
        .unwrap();
    use_groups::add_member(&api, &scope, &mut store, &mut ui, &id, &EntityId::from("7"))
        .await
        .unwrap();

    let group = store.find_group(&id).unwrap();
    assert_eq!(group.name, "Road trip");
    // Rename leaves the description alone
    assert_eq!(group.description.as_deref(), Some("Trip description"));
    assert_eq!(group.member_count(), 2);
    assert_eq!(store.groups()[1].name, "House");
}

#[tokio::test]
async fn test_cancelled_scope_never_reaches_store() {
    let routes = Router::new().route(
        "/groups",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Json(json!([group_json("9", "Late")]))
        }),
    );
    let api = ApiClient::with_base_url(serve(routes).await);
    let scope = ViewScope::new();
    let mut store = store_with_groups();
    let mut ui = UiState::new();
    let before = store.groups();

    let (result, _) = tokio::join!(
        use_groups::load_groups(&api, &scope, &mut store, &mut ui),
        async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            scope.cancel();
        }
    );

    let error = result.unwrap_err();
    assert!(error.is_cancelled());
    assert!(Arc::ptr_eq(&before, &store.groups()));
    assert!(ui.notifications().is_empty());
    assert!(!ui.loading);

    // Anything issued after navigation away is refused up front
    let result = use_groups::load_groups(&api, &scope, &mut store, &mut ui).await;
    assert!(result.unwrap_err().is_cancelled());
}

#[tokio::test]
async fn test_dropped_loader_clears_loading_flag() {
    let routes = Router::new().route(
        "/groups",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Json(json!([group_json("9", "Late")]))
        }),
    );
    let api = ApiClient::with_base_url(serve(routes).await);
    let scope = ViewScope::new();
    let mut store = store_with_groups();
    let mut ui = UiState::new();
    let before = store.groups();

    let result = tokio::time::timeout(
        Duration::from_millis(100),
        use_groups::load_groups(&api, &scope, &mut store, &mut ui),
    )
    .await;

    assert!(result.is_err());
    assert!(!ui.loading);
    assert!(ui.notifications().is_empty());
    assert!(Arc::ptr_eq(&before, &store.groups()));
}

#[tokio::test]
async fn test_add_member_refresh_failure_is_not_an_add_failure() {
    let recorder = Recorder::default();
    let routes = Router::new()
        .route(
            "/groups/:group_id/users/:user_id",
            post({
                let recorder = recorder.clone();
                move |Path((group_id, user_id)): Path<(String, String)>| async move {
                    recorder.record("POST", format!("/groups/{}/users/{}", group_id, user_id), None);
                    StatusCode::OK
                }
            }),
        )
        .route(
            "/groups/:id/users",
            get(|Path(_id): Path<String>| async {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "boom" })))
            }),
        );
    let api = ApiClient::with_base_url(serve(routes).await);
    let scope = ViewScope::new();
    let mut store = store_with_groups();
    let mut ui = UiState::new();
    let before = store.groups();

    let result =
        use_groups::add_member(&api, &scope, &mut store, &mut ui, &EntityId::from("1"), &EntityId::from("7"))
            .await;

    assert!(result.is_err());
    assert_eq!(recorder.requests().len(), 1);
    assert_eq!(
        ui.notifications(),
        &[
            Notification::Success("Member added".to_string()),
            Notification::Failure(FailureKind::LoadGroups),
        ]
    );
    assert!(Arc::ptr_eq(&before, &store.groups()));
}

#[tokio::test]
async fn test_load_profile_fetches_everything_and_sums() {
    let routes = Router::new()
        .route(
            "/users/:id",
            get(|Path(id): Path<String>| async move { Json(user_json(&id, "Ana")) }),
        )
        .route(
            "/users/:id/groups",
            get(|Path(_id): Path<String>| async { Json(json!([group_json("1", "Trip")])) }),
        )
        .route(
            "/users/:id/transactions",
            get(|Path(_id): Path<String>| async {
                Json(json!([
                    transaction_json("t1", "1", "income", 100.0),
                    transaction_json("t2", "1", "expense", 30.0),
                    transaction_json("t3", "5", "expense", 5.0)
                ]))
            }),
        );
    let api = ApiClient::with_base_url(serve(routes).await);
    let scope = ViewScope::new();
    let store = logged_in_store();
    let mut ui = UiState::new();

    let profile = use_profile::load_profile(&api, &scope, &store, &mut ui)
        .await
        .unwrap();

    assert_eq!(profile.user.id, "42");
    assert_eq!(profile.groups.len(), 1);
    assert_eq!(profile.summary.total_income, 100.0);
    assert_eq!(profile.summary.total_expenses, 35.0);
    assert_eq!(profile.summary.balance, 65.0);
    assert_eq!(profile.group_name_for(&profile.transactions[0]), Some("Trip"));
    // Transaction in a group the user is not listed in
    assert_eq!(profile.group_name_for(&profile.transactions[2]), None);
}

#[tokio::test]
async fn test_load_profile_failure_uses_profile_notification() {
    let api = ApiClient::with_base_url(unreachable_base_url().await);
    let scope = ViewScope::new();
    let store = logged_in_store();
    let mut ui = UiState::new();

    let result = use_profile::load_profile(&api, &scope, &store, &mut ui).await;

    assert!(result.is_err());
    assert_eq!(ui.last_notification(), Some(&Notification::Failure(FailureKind::LoadProfile)));
}

#[tokio::test]
async fn test_transaction_lifecycle_updates_store() {
    let routes = Router::new()
        .route(
            "/groups/:id/transactions",
            get(|Path(id): Path<String>| async move {
                Json(json!([transaction_json("t1", &id, "expense", 20.0)]))
            })
            .post(|Path(id): Path<String>, Json(body): Json<Value>| async move {
                let mut created = body;
                created["id"] = json!("t2");
                created["groupId"] = json!(id);
                created["createdAt"] = json!("2024-03-02T08:00:00Z");
                (StatusCode::CREATED, Json(created))
            }),
        )
        .route(
            "/transactions/:id",
            put(|Path(id): Path<String>, Json(_body): Json<Value>| async move {
                let mut updated = transaction_json(&id, "1", "expense", 20.0);
                updated["category"] = json!("food");
                Json(updated)
            })
            .delete(|Path(_id): Path<String>| async { StatusCode::NO_CONTENT }),
        );
    let api = ApiClient::with_base_url(serve(routes).await);
    let scope = ViewScope::new();
    let mut store = AppStore::new();
    let mut ui = UiState::new();
    let group_id = EntityId::from("1");

    use_transactions::load_group_transactions(&api, &scope, &mut store, &mut ui, &group_id)
        .await
        .unwrap();
    assert_eq!(store.transactions().len(), 1);

    let request = shared::CreateTransactionRequest {
        transaction_type: TransactionType::Expense,
        amount: 50.0,
        description: "Dinner".to_string(),
        category: None,
    };
    let created = use_transactions::create_transaction(&api, &scope, &mut store, &mut ui, &group_id, request)
        .await
        .unwrap();
    assert_eq!(created.amount, 50.0);
    assert_eq!(store.transactions().len(), 2);

    let update = UpdateTransactionRequest {
        category: Some("food".to_string()),
        ..Default::default()
    };
    use_transactions::update_transaction(&api, &scope, &mut store, &mut ui, &EntityId::from("t1"), update)
        .await
        .unwrap();
    assert_eq!(store.transactions()[0].category.as_deref(), Some("food"));
    assert_eq!(store.transactions()[1].category, None);

    use_transactions::delete_transaction(&api, &scope, &mut store, &mut ui, &EntityId::from("t2"))
        .await
        .unwrap();
    let remaining = store.transactions();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, "t1");
    assert!(ui.failures().next().is_none());
}

#[tokio::test]
async fn test_select_current_user() {
    let routes = Router::new().route(
        "/users/:id",
        get(|Path(id): Path<String>| async move { Json(json!({ "id": id.parse::<u64>().unwrap(), "name": "Ana", "email": "ana@example.com" })) }),
    );
    let api = ApiClient::with_base_url(serve(routes).await);
    let scope = ViewScope::new();
    let mut store = AppStore::new();
    let mut ui = UiState::new();

    let user = use_users::select_current_user(&api, &scope, &mut store, &mut ui, &EntityId::from("42"))
        .await
        .unwrap();

    assert_eq!(user.id, "42");
    assert_eq!(store.current_user(), Some(&user));

    store.logout();
    assert!(store.current_user().is_none());
}
