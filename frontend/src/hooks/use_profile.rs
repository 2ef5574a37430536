//! Profile page: the current user with their groups, transactions and totals.

use shared::{Group, Transaction, TransactionSummary, User};
use tracing::{info, warn};

use super::{guarded, LoadError};
use crate::services::{ApiClient, ViewScope};
use crate::state::{AppStore, FailureKind, UiState};

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub user: User,
    pub groups: Vec<Group>,
    pub transactions: Vec<Transaction>,
    pub summary: TransactionSummary,
}

impl Profile {
    /// Name of the group a transaction belongs to, if it is one of the
    /// user's groups
    pub fn group_name_for(&self, transaction: &Transaction) -> Option<&str> {
        self.groups
            .iter()
            .find(|group| group.id == transaction.group_id)
            .map(|group| group.name.as_str())
    }
}

/// Fetch the current user's record, groups and transactions concurrently
pub async fn load_profile(
    api: &ApiClient,
    scope: &ViewScope,
    store: &AppStore,
    ui: &mut UiState,
) -> Result<Profile, LoadError> {
    let Some(user_id) = store.current_user().map(|user| user.id.clone()) else {
        warn!("No current user, cannot load profile");
        return Err(LoadError::NotLoggedIn);
    };

    let users = api.users();
    let request = async {
        futures::try_join!(
            users.get_user_by_id(&user_id),
            users.get_user_groups(&user_id),
            users.get_user_transactions(&user_id),
        )
    };

    let (user, groups, transactions) =
        guarded(scope, ui, FailureKind::LoadProfile, request).await?;

    let summary = TransactionSummary::from_transactions(&transactions);
    info!(
        "Loaded profile for {}: {} groups, {} transactions, balance {:.2}",
        user.id,
        groups.len(),
        transactions.len(),
        summary.balance
    );

    Ok(Profile {
        user,
        groups,
        transactions,
        summary,
    })
}
