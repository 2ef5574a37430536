//! # Application Store
//!
//! Session data shared by every view: the current user, the groups and the
//! transactions last received from the backend.
//!
//! ## Snapshots
//! Collections are handed out as `Arc<[T]>` snapshots. Every mutation that
//! changes a collection publishes a new `Arc`, so a consumer holding an older
//! snapshot keeps seeing the old contents and can detect a change with
//! `Arc::ptr_eq`. Mutations that match nothing leave the snapshot and the
//! revision untouched.
//!
//! The store never invents entities; it only caches what the API returned.

use std::sync::Arc;

use shared::{EntityId, Group, GroupPatch, Transaction, TransactionPatch, User};
use tracing::debug;

/// Entities the store can look up by id
trait Keyed {
    fn key(&self) -> &EntityId;
}

impl Keyed for Group {
    fn key(&self) -> &EntityId {
        &self.id
    }
}

impl Keyed for Transaction {
    fn key(&self) -> &EntityId {
        &self.id
    }
}

fn appended<T: Clone>(items: &[T], item: T) -> Arc<[T]> {
    items.iter().cloned().chain(std::iter::once(item)).collect()
}

/// Replace every entry keyed `id` with `merge(entry)`, or `None` when no
/// entry matches.
fn patched<T, F>(items: &[T], id: &EntityId, merge: F) -> Option<Arc<[T]>>
where
    T: Keyed + Clone,
    F: Fn(&T) -> T,
{
    if !items.iter().any(|item| item.key() == id) {
        return None;
    }
    Some(
        items
            .iter()
            .map(|item| if item.key() == id { merge(item) } else { item.clone() })
            .collect(),
    )
}

/// Drop every entry keyed `id`, or `None` when no entry matches
fn without<T: Keyed + Clone>(items: &[T], id: &EntityId) -> Option<Arc<[T]>> {
    if !items.iter().any(|item| item.key() == id) {
        return None;
    }
    Some(items.iter().filter(|item| item.key() != id).cloned().collect())
}

#[derive(Debug, Clone)]
pub struct AppStore {
    current_user: Option<User>,
    groups: Arc<[Group]>,
    transactions: Arc<[Transaction]>,
    revision: u64,
}

impl AppStore {
    /// Empty store: nobody logged in, no groups, no transactions
    pub fn new() -> Self {
        Self {
            current_user: None,
            groups: Arc::from(Vec::new()),
            transactions: Arc::from(Vec::new()),
            revision: 0,
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn groups(&self) -> Arc<[Group]> {
        Arc::clone(&self.groups)
    }

    pub fn transactions(&self) -> Arc<[Transaction]> {
        Arc::clone(&self.transactions)
    }

    /// Incremented on every effective mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn find_group(&self, id: &EntityId) -> Option<&Group> {
        self.groups.iter().find(|group| &group.id == id)
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    // User actions

    pub fn set_current_user(&mut self, user: Option<User>) {
        debug!(
            "Setting current user: {:?}",
            user.as_ref().map(|u| u.id.as_str())
        );
        self.current_user = user;
        self.touch();
    }

    /// Forget the current user locally; the backend is not told
    pub fn logout(&mut self) {
        self.set_current_user(None);
    }

    // Group actions

    pub fn set_groups(&mut self, groups: Vec<Group>) {
        debug!("Replacing groups with {} entries", groups.len());
        self.groups = groups.into();
        self.touch();
    }

    /// Append without deduplicating
    pub fn add_group(&mut self, group: Group) {
        debug!("Adding group {}", group.id);
        self.groups = appended(&self.groups, group);
        self.touch();
    }

    pub fn update_group(&mut self, group_id: &EntityId, patch: GroupPatch) {
        match patched(&self.groups, group_id, |group| patch.apply(group)) {
            Some(groups) => {
                debug!("Updated group {}", group_id);
                self.groups = groups;
                self.touch();
            }
            None => debug!("No group {} to update", group_id),
        }
    }

    pub fn delete_group(&mut self, group_id: &EntityId) {
        if let Some(groups) = without(&self.groups, group_id) {
            debug!("Deleted group {}", group_id);
            self.groups = groups;
            self.touch();
        }
    }

    // Transaction actions

    pub fn set_transactions(&mut self, transactions: Vec<Transaction>) {
        debug!("Replacing transactions with {} entries", transactions.len());
        self.transactions = transactions.into();
        self.touch();
    }

    /// Append without deduplicating
    pub fn add_transaction(&mut self, transaction: Transaction) {
        debug!("Adding transaction {}", transaction.id);
        self.transactions = appended(&self.transactions, transaction);
        self.touch();
    }

    pub fn update_transaction(&mut self, transaction_id: &EntityId, patch: TransactionPatch) {
        match patched(&self.transactions, transaction_id, |tx| patch.apply(tx)) {
            Some(transactions) => {
                debug!("Updated transaction {}", transaction_id);
                self.transactions = transactions;
                self.touch();
            }
            None => debug!("No transaction {} to update", transaction_id),
        }
    }

    pub fn delete_transaction(&mut self, transaction_id: &EntityId) {
        if let Some(transactions) = without(&self.transactions, transaction_id) {
            debug!("Deleted transaction {}", transaction_id);
            self.transactions = transactions;
            self.touch();
        }
    }
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}
