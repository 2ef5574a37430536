//! # API Client
//!
//! Thin façade over the group-expenses REST backend. One method per resource
//! operation, grouped by resource family:
//!
//! - [`UsersApi`] via [`ApiClient::users`]
//! - [`GroupsApi`] via [`ApiClient::groups`]
//! - [`TransactionsApi`] via [`ApiClient::transactions`]
//!
//! Requests carry JSON bodies where the operation has a payload. No retries,
//! timeouts or auth headers are added here. Any non-2xx status is reported as
//! [`ApiError::Remote`] instead of being decoded as a success body.

use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    CreateGroupRequest, CreateTransactionRequest, CreateUserRequest, EntityId, Group,
    GroupDetails, Transaction, UpdateGroupRequest, UpdateTransactionRequest, User,
};
use tracing::{debug, error, info};

/// Root of the backend API
pub const DEFAULT_BASE_URL: &str = "http://localhost:3002/api";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Connection refused, reset, DNS failure and the like
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status
    #[error("Server error {status}: {body}")]
    Remote { status: u16, body: String },

    /// The body was not valid JSON for the expected type
    #[error("Failed to parse response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    /// The view that issued the request went away
    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    /// HTTP status of a remote error, if the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Remote { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// API client for communicating with the backend server
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a new API client with the default base URL
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a new API client with a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi { client: self }
    }

    pub fn groups(&self) -> GroupsApi<'_> {
        GroupsApi { client: self }
    }

    pub fn transactions(&self) -> TransactionsApi<'_> {
        TransactionsApi { client: self }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(Method::GET, path, None::<&()>).await?;
        Self::decode(response).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let response = self.execute(method, path, Some(body)).await?;
        Self::decode(response).await
    }

    /// Issue a request whose response body is ignored
    async fn send_empty(&self, method: Method, path: &str) -> Result<(), ApiError> {
        self.execute(method, path, None::<&()>).await?;
        Ok(())
    }

    async fn execute<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        info!("{} {}", method, path);

        let mut request: RequestBuilder = self.http.request(method.clone(), self.url(path));
        if let Some(body) = body {
            // Sets Content-Type: application/json
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            error!("Network error on {} {}: {}", method, path, e);
            ApiError::Transport(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Server error {} on {} {}: {}", status, method, path, body);
            return Err(ApiError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        debug!("{} {} -> {}", method, path, status);
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| {
            error!("Failed to parse response: {}", source);
            ApiError::Decode { source, body }
        })
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// `/users` resource family
#[derive(Clone, Copy, Debug)]
pub struct UsersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UsersApi<'a> {
    /// Register a new user
    pub async fn create(self, request: CreateUserRequest) -> Result<User, ApiError> {
        self.client.send_json(Method::POST, "/users", &request).await
    }

    /// List all users
    pub async fn get_all(self) -> Result<Vec<User>, ApiError> {
        self.client.get("/users").await
    }

    /// Fetch a single user
    pub async fn get_user_by_id(self, user_id: &EntityId) -> Result<User, ApiError> {
        self.client.get(&format!("/users/{}", user_id)).await
    }

    /// Groups the user belongs to
    pub async fn get_user_groups(self, user_id: &EntityId) -> Result<Vec<Group>, ApiError> {
        self.client.get(&format!("/users/{}/groups", user_id)).await
    }

    /// Transactions across all of the user's groups
    pub async fn get_user_transactions(
        self,
        user_id: &EntityId,
    ) -> Result<Vec<Transaction>, ApiError> {
        self.client
            .get(&format!("/users/{}/transactions", user_id))
            .await
    }
}

/// `/groups` resource family
#[derive(Clone, Copy, Debug)]
pub struct GroupsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> GroupsApi<'a> {
    /// Create a group owned by `creator_id`
    pub async fn create(
        self,
        details: GroupDetails,
        creator_id: &EntityId,
    ) -> Result<Group, ApiError> {
        let request = CreateGroupRequest::new(details, creator_id.clone());
        self.client.send_json(Method::POST, "/groups", &request).await
    }

    /// List all groups
    pub async fn get_all(self) -> Result<Vec<Group>, ApiError> {
        self.client.get("/groups").await
    }

    /// Add an existing user to a group
    pub async fn add_user_to_group(
        self,
        group_id: &EntityId,
        user_id: &EntityId,
    ) -> Result<(), ApiError> {
        self.client
            .send_empty(Method::POST, &format!("/groups/{}/users/{}", group_id, user_id))
            .await
    }

    /// Members of a group
    pub async fn get_group_users(self, group_id: &EntityId) -> Result<Vec<User>, ApiError> {
        self.client.get(&format!("/groups/{}/users", group_id)).await
    }

    /// Transactions recorded against a group
    pub async fn get_group_transactions(
        self,
        group_id: &EntityId,
    ) -> Result<Vec<Transaction>, ApiError> {
        self.client
            .get(&format!("/groups/{}/transactions", group_id))
            .await
    }

    /// Change a group's name and/or description
    pub async fn update(
        self,
        group_id: &EntityId,
        request: UpdateGroupRequest,
    ) -> Result<Group, ApiError> {
        self.client
            .send_json(Method::PUT, &format!("/groups/{}", group_id), &request)
            .await
    }

    /// Delete a group
    pub async fn delete(self, group_id: &EntityId) -> Result<(), ApiError> {
        self.client
            .send_empty(Method::DELETE, &format!("/groups/{}", group_id))
            .await
    }
}

/// `/transactions` resource family
#[derive(Clone, Copy, Debug)]
pub struct TransactionsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TransactionsApi<'a> {
    /// Record a transaction against `group_id`
    pub async fn create(
        self,
        group_id: &EntityId,
        request: CreateTransactionRequest,
    ) -> Result<Transaction, ApiError> {
        self.client
            .send_json(
                Method::POST,
                &format!("/groups/{}/transactions", group_id),
                &request,
            )
            .await
    }

    /// Change the given fields of a transaction
    pub async fn update(
        self,
        transaction_id: &EntityId,
        request: UpdateTransactionRequest,
    ) -> Result<Transaction, ApiError> {
        self.client
            .send_json(
                Method::PUT,
                &format!("/transactions/{}", transaction_id),
                &request,
            )
            .await
    }

    /// Delete a transaction
    pub async fn delete(self, transaction_id: &EntityId) -> Result<(), ApiError> {
        self.client
            .send_empty(Method::DELETE, &format!("/transactions/{}", transaction_id))
            .await
    }
}
