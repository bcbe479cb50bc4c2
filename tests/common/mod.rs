// Local accounts management server shared by the HTTP and binary tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::Json;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Value, json};

/// Canned accounts and role bindings served over HTTP.
#[derive(Default)]
pub struct StubServer {
    /// `(id, username)` pairs, listed in this order.
    pub accounts: Vec<(String, String)>,
    pub roles: HashMap<String, Vec<String>>,
    /// Answer every request with this status and `forced failure` as the body.
    pub status: Option<StatusCode>,
    /// Answer role lookups for this account id with 503.
    pub fail_roles_for: Option<String>,
    /// Every `search` value received by the role bindings endpoint.
    pub role_searches: Mutex<Vec<String>>,
}

impl StubServer {
    pub fn with_accounts(n: usize) -> Self {
        Self {
            accounts: (0..n)
                .map(|i| (format!("id{i}"), format!("user{i}")))
                .collect(),
            ..Self::default()
        }
    }

    pub fn role_searches(&self) -> Vec<String> {
        self.role_searches.lock().unwrap().clone()
    }
}

/// Start the server on an ephemeral port and return its base URL.
pub async fn serve(stub: Arc<StubServer>) -> String {
    let app = Router::new()
        .route("/api/accounts_mgmt/v1/current_account", get(current_account))
        .route("/api/accounts_mgmt/v1/accounts", get(accounts))
        .route("/api/accounts_mgmt/v1/role_bindings", get(role_bindings))
        .with_state(stub);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}")
}

/// Write a session file pointing at `base_url` with a token that never expires.
pub fn write_session(base_url: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    path.push(format!("ocm_users_session_{}_{nonce}.json", std::process::id()));
    let token = format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256"}"#),
        URL_SAFE_NO_PAD.encode(r#"{"sub":"jdoe"}"#)
    );
    let body = json!({ "access_token": token, "url": base_url });
    std::fs::write(&path, body.to_string()).unwrap();
    path
}

fn forced(stub: &StubServer) -> Option<Response> {
    stub.status
        .map(|status| (status, "forced failure").into_response())
}

fn param(query: &HashMap<String, String>, key: &str, default: usize) -> usize {
    query
        .get(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn page_of<T: Clone>(items: &[T], query: &HashMap<String, String>) -> Vec<T> {
    let page = param(query, "page", 1).max(1);
    let size = param(query, "size", 100);
    let start = ((page - 1) * size).min(items.len());
    let end = (start + size).min(items.len());
    items[start..end].to_vec()
}

fn list_body(items: Vec<Value>, total: usize) -> Response {
    Json(json!({ "size": items.len(), "total": total, "items": items }))
        .into_response()
}

async fn current_account(State(stub): State<Arc<StubServer>>) -> Response {
    if let Some(resp) = forced(&stub) {
        return resp;
    }
    Json(json!({
        "id": "me",
        "username": "jdoe",
        "organization": { "id": "home-org" }
    }))
    .into_response()
}

async fn accounts(
    State(stub): State<Arc<StubServer>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(resp) = forced(&stub) {
        return resp;
    }
    let items = page_of(&stub.accounts, &query)
        .into_iter()
        .map(|(id, username)| json!({ "id": id, "username": username }))
        .collect();
    list_body(items, stub.accounts.len())
}

async fn role_bindings(
    State(stub): State<Arc<StubServer>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(resp) = forced(&stub) {
        return resp;
    }
    let search = query.get("search").cloned().unwrap_or_default();
    stub.role_searches.lock().unwrap().push(search.clone());
    let account_id = search
        .strip_prefix("account_id='")
        .and_then(|s| s.strip_suffix('\''))
        .map(|s| s.replace("''", "'"))
        .unwrap_or_default();
    if stub.fail_roles_for.as_deref() == Some(account_id.as_str()) {
        return (StatusCode::SERVICE_UNAVAILABLE, "upstream unavailable")
            .into_response();
    }
    let roles = stub.roles.get(&account_id).cloned().unwrap_or_default();
    let items = page_of(&roles, &query)
        .into_iter()
        .map(|role| json!({ "role": { "id": role } }))
        .collect();
    list_body(items, roles.len())
}
