//! In-process stand-in for the inventory service.
//!
//! Serves the `/api` routes the client talks to from in-memory state, on an
//! ephemeral port. Two accounts are seeded: `admin` (administrator) and
//! `alice` (regular user), with passwords `admin-pass` and `alice-pass`.

#![allow(dead_code)]

use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use sweet_shop_client::{Sweet, SweetDraft, SweetId, SweetPatch};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

pub const ADMIN: (&str, &str) = ("admin", "admin-pass");
pub const ALICE: (&str, &str) = ("alice", "alice-pass");

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

struct Account {
    password: String,
    admin: bool,
}

#[derive(Default)]
pub struct MockState {
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, String>,
    pub sweets: Vec<Sweet>,
    next_id: i64,
    next_token: u64,
    /// Answer `GET /sweets` with a 500.
    pub fail_listing: bool,
    pub requests: Vec<RecordedRequest>,
    pub update_bodies: Vec<Value>,
}

impl MockState {
    fn seeded() -> Self {
        let mut state = MockState::default();
        state.add_account(ADMIN.0, ADMIN.1, true);
        state.add_account(ALICE.0, ALICE.1, false);
        state.sweets = vec![
            sweet(1, "Gummy Bear", "Gummy", Decimal::new(250, 2), 5),
            sweet(2, "Choco Bar", "Chocolate", Decimal::new(300, 2), 0),
        ];
        state.next_id = 3;
        state
    }

    fn add_account(&mut self, username: &str, password: &str, admin: bool) {
        self.accounts.insert(
            username.to_string(),
            Account {
                password: password.to_string(),
                admin,
            },
        );
    }

    fn issue_token(&mut self, username: &str) -> String {
        self.next_token += 1;
        let token = format!("tok-{}-{}", username, self.next_token);
        self.tokens.insert(token.clone(), username.to_string());
        token
    }

    /// Invalidates every issued token, as an expiry would.
    pub fn revoke_all_tokens(&mut self) {
        self.tokens.clear();
    }

    pub fn quantity_of(&self, id: i64) -> Option<u32> {
        self.sweets.iter().find(|s| s.id == SweetId(id)).map(|s| s.quantity)
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

pub fn sweet(id: i64, name: &str, category: &str, price: Decimal, quantity: u32) -> Sweet {
    Sweet {
        id: SweetId(id),
        name: name.to_string(),
        category: category.to_string(),
        price,
        quantity,
    }
}

type Shared = Arc<Mutex<MockState>>;

pub struct MockServer {
    pub base_url: String,
    pub state: Shared,
    handle: JoinHandle<()>,
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn spawn_mock() -> MockServer {
    let state: Shared = Arc::new(Mutex::new(MockState::seeded()));

    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/sweets", get(list).post(create))
        .route("/sweets/search", get(search))
        .route("/sweets/:id", put(update).delete(remove))
        .route("/sweets/:id/purchase", post(purchase))
        .route("/sweets/:id/restock", post(restock));

    let app = Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock listener");
    let addr = listener.local_addr().expect("mock listener address");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock server");
    });

    MockServer {
        base_url: format!("http://{addr}/api"),
        state,
        handle,
    }
}

/// A base URL nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("address");
    drop(listener);
    format!("http://{addr}/api")
}

async fn record(State(state): State<Shared>, req: Request, next: Next) -> Response {
    let recorded = RecordedRequest {
        method: req.method().to_string(),
        path: req.uri().path().to_string(),
        authorization: req
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };
    state.lock().await.requests.push(recorded);
    next.run(req).await
}

fn reject(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

/// Resolves the bearer token to `(username, is_admin)`.
fn caller(state: &MockState, headers: &HeaderMap) -> Result<(String, bool), Response> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Missing token"))?;
    let username = state
        .tokens
        .get(token)
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Invalid token"))?;
    let admin = state.accounts.get(username).map(|a| a.admin).unwrap_or(false);
    Ok((username.clone(), admin))
}

fn admin_caller(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    match caller(state, headers)? {
        (_, true) => Ok(()),
        (_, false) => Err(reject(StatusCode::FORBIDDEN, "Admin access required")),
    }
}

fn credentials(body: &Value) -> Option<(String, String)> {
    let username = body.get("username")?.as_str()?.to_string();
    let password = body.get("password")?.as_str()?.to_string();
    Some((username, password))
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().await;
    let Some((username, password)) = credentials(&body) else {
        return reject(StatusCode::BAD_REQUEST, "Malformed credentials");
    };
    let valid = state
        .accounts
        .get(&username)
        .is_some_and(|account| account.password == password);
    if !valid {
        return reject(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    let token = state.issue_token(&username);
    Json(json!({ "username": username, "token": token })).into_response()
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().await;
    let Some((username, password)) = credentials(&body) else {
        return reject(StatusCode::BAD_REQUEST, "Malformed credentials");
    };
    if username.trim().is_empty() || state.accounts.contains_key(&username) {
        return reject(StatusCode::BAD_REQUEST, "Username unavailable");
    }
    state.add_account(&username, &password, false);
    let token = state.issue_token(&username);
    (StatusCode::CREATED, Json(json!({ "username": username, "token": token }))).into_response()
}

async fn list(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock().await;
    if let Err(resp) = caller(&state, &headers) {
        return resp;
    }
    if state.fail_listing {
        return reject(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable");
    }
    Json(state.sweets.clone()).into_response()
}

async fn search(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let state = state.lock().await;
    if let Err(resp) = caller(&state, &headers) {
        return resp;
    }
    let text = |key: &str| params.get(key).map(|v| v.to_lowercase()).unwrap_or_default();
    let bound = |key: &str| params.get(key).and_then(|v| Decimal::from_str(v).ok());
    let (name, category) = (text("name"), text("category"));
    let (min, max) = (bound("minPrice"), bound("maxPrice"));

    let found: Vec<Sweet> = state
        .sweets
        .iter()
        .filter(|s| s.name.to_lowercase().contains(&name))
        .filter(|s| s.category.to_lowercase().contains(&category))
        .filter(|s| min.map_or(true, |m| s.price >= m))
        .filter(|s| max.map_or(true, |m| s.price <= m))
        .cloned()
        .collect();
    Json(found).into_response()
}

async fn create(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().await;
    if let Err(resp) = caller(&state, &headers) {
        return resp;
    }
    let draft: SweetDraft = match serde_json::from_value(body) {
        Ok(draft) => draft,
        Err(_) => return reject(StatusCode::BAD_REQUEST, "Malformed sweet"),
    };
    if draft.name.trim().is_empty() {
        return reject(StatusCode::BAD_REQUEST, "Name is required");
    }
    if draft.price < Decimal::ZERO {
        return reject(StatusCode::BAD_REQUEST, "Price must not be negative");
    }
    let id = state.next_id;
    state.next_id += 1;
    let created = sweet(id, &draft.name, &draft.category, draft.price, draft.quantity);
    state.sweets.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn update(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().await;
    if let Err(resp) = caller(&state, &headers) {
        return resp;
    }
    state.update_bodies.push(body.clone());
    let patch: SweetPatch = match serde_json::from_value(body) {
        Ok(patch) => patch,
        Err(_) => return reject(StatusCode::BAD_REQUEST, "Malformed update"),
    };
    if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return reject(StatusCode::BAD_REQUEST, "Name must not be blank");
    }
    let Some(target) = state.sweets.iter_mut().find(|s| s.id == SweetId(id)) else {
        return reject(StatusCode::NOT_FOUND, "Sweet not found");
    };
    if let Some(name) = patch.name {
        target.name = name;
    }
    if let Some(category) = patch.category {
        target.category = category;
    }
    if let Some(price) = patch.price {
        target.price = price;
    }
    if let Some(quantity) = patch.quantity {
        target.quantity = quantity;
    }
    Json(target.clone()).into_response()
}

async fn remove(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    let mut state = state.lock().await;
    if let Err(resp) = admin_caller(&state, &headers) {
        return resp;
    }
    let before = state.sweets.len();
    state.sweets.retain(|s| s.id != SweetId(id));
    if state.sweets.len() == before {
        return reject(StatusCode::NOT_FOUND, "Sweet not found");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn purchase(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    let mut state = state.lock().await;
    if let Err(resp) = caller(&state, &headers) {
        return resp;
    }
    let Some(target) = state.sweets.iter_mut().find(|s| s.id == SweetId(id)) else {
        return reject(StatusCode::NOT_FOUND, "Sweet not found");
    };
    if target.quantity == 0 {
        return reject(StatusCode::BAD_REQUEST, "Out of stock");
    }
    target.quantity -= 1;
    Json(target.clone()).into_response()
}

async fn restock(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().await;
    if let Err(resp) = admin_caller(&state, &headers) {
        return resp;
    }
    let Some(quantity) = body.get("quantity").and_then(Value::as_u64).filter(|q| *q > 0) else {
        return reject(StatusCode::BAD_REQUEST, "Quantity must be positive");
    };
    let Some(target) = state.sweets.iter_mut().find(|s| s.id == SweetId(id)) else {
        return reject(StatusCode::NOT_FOUND, "Sweet not found");
    };
    target.quantity += quantity as u32;
    Json(target.clone()).into_response()
}
