//! Group detail page: a group's transactions and their mutations.

use shared::{
    CreateTransactionRequest, EntityId, Transaction, TransactionPatch, UpdateTransactionRequest,
};
use tracing::info;

use super::{guarded, LoadError};
use crate::services::{ApiClient, ViewScope};
use crate::state::{AppStore, FailureKind, UiState};

/// Replace the store's transactions with those of `group_id`
pub async fn load_group_transactions(
    api: &ApiClient,
    scope: &ViewScope,
    store: &mut AppStore,
    ui: &mut UiState,
    group_id: &EntityId,
) -> Result<(), LoadError> {
    let transactions = guarded(
        scope,
        ui,
        FailureKind::LoadTransactions,
        api.groups().get_group_transactions(group_id),
    )
    .await?;

    info!("Loaded {} transactions for group {}", transactions.len(), group_id);
    store.set_transactions(transactions);
    Ok(())
}

pub async fn create_transaction(
    api: &ApiClient,
    scope: &ViewScope,
    store: &mut AppStore,
    ui: &mut UiState,
    group_id: &EntityId,
    request: CreateTransactionRequest,
) -> Result<Transaction, LoadError> {
    let transaction = guarded(
        scope,
        ui,
        FailureKind::CreateTransaction,
        api.transactions().create(group_id, request),
    )
    .await?;

    info!(
        "Created {} transaction {} of {:.2} in group {}",
        transaction.transaction_type, transaction.id, transaction.amount, group_id
    );
    store.add_transaction(transaction.clone());
    ui.notify_success("Transaction created");
    Ok(transaction)
}

pub async fn update_transaction(
    api: &ApiClient,
    scope: &ViewScope,
    store: &mut AppStore,
    ui: &mut UiState,
    transaction_id: &EntityId,
    request: UpdateTransactionRequest,
) -> Result<Transaction, LoadError> {
    let transaction = guarded(
        scope,
        ui,
        FailureKind::UpdateTransaction,
        api.transactions().update(transaction_id, request.clone()),
    )
    .await?;

    store.update_transaction(transaction_id, TransactionPatch::from(request));
    ui.notify_success("Transaction updated");
    Ok(transaction)
}

/// Remove locally only after the backend confirmed the delete
pub async fn delete_transaction(
    api: &ApiClient,
    scope: &ViewScope,
    store: &mut AppStore,
    ui: &mut UiState,
    transaction_id: &EntityId,
) -> Result<(), LoadError> {
    guarded(
        scope,
        ui,
        FailureKind::DeleteTransaction,
        api.transactions().delete(transaction_id),
    )
    .await?;

    store.delete_transaction(transaction_id);
    ui.notify_success("Transaction deleted");
    Ok(())
}
