//! Mock backend for integration tests: an axum router served on an ephemeral
//! local port, plus a recorder for the requests it received.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Debug, Clone, Default)]
pub struct Recorder {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl Recorder {
    pub fn record(&self, method: &'static str, path: impl Into<String>, body: Option<Value>) {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            path: path.into(),
            body,
        });
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Serve `routes` under `/api` and return the base URL to hand to `ApiClient`
pub async fn serve(routes: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().nest("/api", routes);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/api", addr)
}

/// Base URL of a port nothing listens on
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}

pub fn group_json(id: &str, name: &str) -> Value {
    json!({ "id": id, "name": name, "description": format!("{} description", name) })
}

pub fn transaction_json(id: &str, group_id: &str, kind: &str, amount: f64) -> Value {
    json!({
        "id": id,
        "groupId": group_id,
        "type": kind,
        "amount": amount,
        "description": format!("tx {}", id),
        "createdAt": "2024-03-01T12:00:00Z"
    })
}

pub fn user_json(id: &str, name: &str) -> Value {
    json!({ "id": id, "name": name, "email": format!("{}@example.com", name.to_lowercase()) })
}
