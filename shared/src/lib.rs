use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque identifier assigned by the backend.
///
/// The backend sends ids either as JSON strings or as numbers; both are kept
/// in their string form so they can be interpolated into paths as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => EntityId(text),
            RawId::Number(number) => EntityId(number.to_string()),
        })
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl PartialEq<str> for EntityId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for EntityId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A person taking part in one or more groups.
///
/// `groups` and `transactions` are only filled by endpoints that embed them
/// (`GET /users`); never rely on their presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<Group>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<Transaction>>,
}

impl User {
    /// Number of embedded groups, zero when the endpoint did not embed them
    pub fn group_count(&self) -> usize {
        self.groups.as_ref().map_or(0, Vec::len)
    }

    /// Number of embedded transactions, zero when the endpoint did not embed them
    pub fn transaction_count(&self) -> usize {
        self.transactions.as_ref().map_or(0, Vec::len)
    }
}

/// A shared expense group.
///
/// `users` is embedded by `GET /groups`; `transactions` by `GET /groups` and
/// by the client-side "groups with transactions" load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<User>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<Transaction>>,
}

impl Group {
    pub fn member_count(&self) -> usize {
        self.users.as_ref().map_or(0, Vec::len)
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.as_ref().map_or(0, Vec::len)
    }
}

/// Direction of a transaction; every aggregate branches on it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money spent by the group
    Expense,
    /// Money received by the group
    Income,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Expense => write!(f, "expense"),
            TransactionType::Income => write!(f, "income"),
        }
    }
}

/// A single income or expense recorded against a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: EntityId,
    /// Group this transaction belongs to
    pub group_id: EntityId,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Non-negative amount; the sign comes from `transaction_type`
    pub amount: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// RFC 3339, or a bare date-time without offset which is read as UTC
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

/// Lenient `createdAt` decoding: the backend does not always attach an offset.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use serde::{de::Error, Deserialize, Deserializer};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn parse(text: &str) -> Option<DateTime<Utc>> {
        if let Ok(at) = DateTime::parse_from_rfc3339(text) {
            return Some(at.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
            .map(|naive| Utc.from_utc_datetime(&naive))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse(&text).ok_or_else(|| D::Error::custom(format!("invalid timestamp '{}'", text)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

/// Name and description of a group as entered by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDetails {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of `POST /groups`; the creator travels alongside the details so the
/// backend knows who owns the new group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub creator_id: EntityId,
}

impl CreateGroupRequest {
    pub fn new(details: GroupDetails, creator_id: EntityId) -> Self {
        Self {
            name: details.name,
            description: details.description,
            creator_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateGroupRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateTransactionRequest {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Partial group used for shallow merges: present fields overwrite, absent
/// fields are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub users: Option<Vec<User>>,
    pub transactions: Option<Vec<Transaction>>,
}

impl GroupPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Return a copy of `group` with the present fields replaced
    pub fn apply(&self, group: &Group) -> Group {
        let mut merged = group.clone();
        if let Some(name) = &self.name {
            merged.name = name.clone();
        }
        if let Some(description) = &self.description {
            merged.description = Some(description.clone());
        }
        if let Some(users) = &self.users {
            merged.users = Some(users.clone());
        }
        if let Some(transactions) = &self.transactions {
            merged.transactions = Some(transactions.clone());
        }
        merged
    }
}

impl From<UpdateGroupRequest> for GroupPatch {
    fn from(request: UpdateGroupRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            ..Self::default()
        }
    }
}

/// Partial transaction used for shallow merges
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub group_id: Option<EntityId>,
    pub transaction_type: Option<TransactionType>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl TransactionPatch {
    pub fn apply(&self, transaction: &Transaction) -> Transaction {
        let mut merged = transaction.clone();
        if let Some(group_id) = &self.group_id {
            merged.group_id = group_id.clone();
        }
        if let Some(transaction_type) = self.transaction_type {
            merged.transaction_type = transaction_type;
        }
        if let Some(amount) = self.amount {
            merged.amount = amount;
        }
        if let Some(description) = &self.description {
            merged.description = description.clone();
        }
        if let Some(category) = &self.category {
            merged.category = Some(category.clone());
        }
        if let Some(created_at) = self.created_at {
            merged.created_at = created_at;
        }
        merged
    }
}

impl From<UpdateTransactionRequest> for TransactionPatch {
    fn from(request: UpdateTransactionRequest) -> Self {
        Self {
            transaction_type: request.transaction_type,
            amount: request.amount,
            description: request.description,
            category: request.category,
            ..Self::default()
        }
    }
}

/// Income, expense and balance totals over a set of transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    /// `total_income - total_expenses`
    pub balance: f64,
}

impl TransactionSummary {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let (total_income, total_expenses) =
            transactions
                .iter()
                .fold((0.0, 0.0), |(income, expenses), tx| match tx.transaction_type {
                    TransactionType::Income => (income + tx.amount, expenses),
                    TransactionType::Expense => (income, expenses + tx.amount),
                });

        Self {
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.balance < 0.0
    }
}
