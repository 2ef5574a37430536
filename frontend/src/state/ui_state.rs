//! # UI State Module
//!
//! Loading indicator and the notifications ("toasts") raised by the view
//! loaders. Every failed operation collapses to one fixed message for its
//! category; the underlying error only goes to the log.

use std::fmt;

/// Category of a failed operation, one notification message each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    LoadGroups,
    CreateGroup,
    UpdateGroup,
    DeleteGroup,
    AddMember,
    LoadUsers,
    CreateUser,
    SelectUser,
    LoadProfile,
    LoadTransactions,
    CreateTransaction,
    UpdateTransaction,
    DeleteTransaction,
}

impl FailureKind {
    pub fn message(&self) -> &'static str {
        match self {
            FailureKind::LoadGroups => "Failed to load groups",
            FailureKind::CreateGroup => "Failed to create group",
            FailureKind::UpdateGroup => "Failed to update group",
            FailureKind::DeleteGroup => "Failed to delete group",
            FailureKind::AddMember => "Failed to add member to group",
            FailureKind::LoadUsers => "Failed to load users",
            FailureKind::CreateUser => "Failed to create user",
            FailureKind::SelectUser => "Failed to load user",
            FailureKind::LoadProfile => "Failed to load user data",
            FailureKind::LoadTransactions => "Failed to load transactions",
            FailureKind::CreateTransaction => "Failed to create transaction",
            FailureKind::UpdateTransaction => "Failed to update transaction",
            FailureKind::DeleteTransaction => "Failed to delete transaction",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Failure(FailureKind),
}

impl Notification {
    pub fn message(&self) -> &str {
        match self {
            Notification::Success(message) => message,
            Notification::Failure(kind) => kind.message(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Notification::Failure(_))
    }
}

/// General UI state for loading indicators and user feedback
#[derive(Debug, Default)]
pub struct UiState {
    /// Whether a request is in flight
    pub loading: bool,

    /// Notifications raised since the last `clear_messages`, oldest first
    notifications: Vec<Notification>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify_success(&mut self, message: impl Into<String>) {
        self.notifications.push(Notification::Success(message.into()));
    }

    pub fn notify_failure(&mut self, kind: FailureKind) {
        self.notifications.push(Notification::Failure(kind));
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn last_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    pub fn failures(&self) -> impl Iterator<Item = FailureKind> + '_ {
        self.notifications.iter().filter_map(|n| match n {
            Notification::Failure(kind) => Some(*kind),
            Notification::Success(_) => None,
        })
    }

    /// Clear any pending notifications
    pub fn clear_messages(&mut self) {
        self.notifications.clear();
    }
}
