// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::{Multipart, Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use cv_portal::db::ProfileStore;
use cv_portal::error::{ClientError, Result};
use cv_portal::models::{AccountRecord, ProfilePatch, UserAccount, UserProfile};
use cv_portal::pages::{Handles, Session};
use cv_portal::render::AnalysisPanel;
use cv_portal::services::{AuthError, BackendClient, IdentityProvider};
use cv_portal::ui::{Element, NavigationMode, Route, View};
use serde_json::{json, Map, Value};
use tokio::sync::watch;

pub const TEST_API_KEY: &str = "test-api-key";

/// Check if emulator is available via environment variable.
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

pub fn firebase_config_json() -> Value {
    json!({
        "apiKey": TEST_API_KEY,
        "authDomain": "cv-portal-test.firebaseapp.com",
        "projectId": "cv-portal-test",
        "storageBucket": "cv-portal-test.appspot.com",
        "messagingSenderId": "1234",
        "appId": "1:1234:web:abcd"
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// View
// ─────────────────────────────────────────────────────────────────────────────

/// One call made on a [`RecordingView`].
#[derive(Debug, Clone, PartialEq)]
pub enum ViewOp {
    Text(Element, String),
    Active(Element, bool),
    Items(Element, Vec<String>),
    Cleared(Element),
    Analysis(AnalysisPanel),
    Alert(String),
    Navigate(Route, NavigationMode),
}

/// View that records every call. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    ops: Arc<Mutex<Vec<ViewOp>>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, op: ViewOp) {
        self.ops.lock().unwrap().push(op);
    }

    pub fn ops(&self) -> Vec<ViewOp> {
        self.ops.lock().unwrap().clone()
    }

    /// Current text of `element` (last write wins).
    pub fn text(&self, element: Element) -> Option<String> {
        self.ops().into_iter().rev().find_map(|op| match op {
            ViewOp::Text(e, text) if e == element => Some(text),
            _ => None,
        })
    }

    pub fn is_active(&self, element: Element) -> bool {
        self.ops()
            .into_iter()
            .rev()
            .find_map(|op| match op {
                ViewOp::Active(e, active) if e == element => Some(active),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn items(&self, element: Element) -> Option<Vec<String>> {
        self.ops().into_iter().rev().find_map(|op| match op {
            ViewOp::Items(e, items) if e == element => Some(items),
            _ => None,
        })
    }

    pub fn alerts(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                ViewOp::Alert(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn cleared(&self) -> Vec<Element> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                ViewOp::Cleared(element) => Some(element),
                _ => None,
            })
            .collect()
    }

    pub fn navigations(&self) -> Vec<(Route, NavigationMode)> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                ViewOp::Navigate(route, mode) => Some((route, mode)),
                _ => None,
            })
            .collect()
    }

    pub fn panels(&self) -> Vec<AnalysisPanel> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                ViewOp::Analysis(panel) => Some(panel),
                _ => None,
            })
            .collect()
    }
}

impl View for RecordingView {
    fn set_text(&mut self, element: Element, text: &str) {
        self.push(ViewOp::Text(element, text.to_string()));
    }

    fn set_active(&mut self, element: Element, active: bool) {
        self.push(ViewOp::Active(element, active));
    }

    fn set_items(&mut self, element: Element, items: &[String]) {
        self.push(ViewOp::Items(element, items.to_vec()));
    }

    fn clear_input(&mut self, element: Element) {
        self.push(ViewOp::Cleared(element));
    }

    fn show_analysis(&mut self, panel: &AnalysisPanel) {
        self.push(ViewOp::Analysis(panel.clone()));
    }

    fn alert(&mut self, message: &str) {
        self.push(ViewOp::Alert(message.to_string()));
    }

    fn navigate(&mut self, route: Route, mode: NavigationMode) {
        self.push(ViewOp::Navigate(route, mode));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Identity
// ─────────────────────────────────────────────────────────────────────────────

/// In-process identity provider.
pub struct FakeIdentity {
    state: watch::Sender<Option<UserAccount>>,
    /// email -> (password, uid)
    accounts: Mutex<HashMap<String, (String, String)>>,
    next_uid: AtomicUsize,
    fail_sign_out: AtomicBool,
    sign_outs: AtomicUsize,
}

impl FakeIdentity {
    pub fn signed_out() -> Arc<Self> {
        let (state, _) = watch::channel(None);
        Arc::new(Self {
            state,
            accounts: Mutex::new(HashMap::new()),
            next_uid: AtomicUsize::new(1),
            fail_sign_out: AtomicBool::new(false),
            sign_outs: AtomicUsize::new(0),
        })
    }

    pub fn signed_in(uid: &str, email: &str) -> Arc<Self> {
        let identity = Self::signed_out();
        identity.state.send_replace(Some(UserAccount {
            uid: uid.to_string(),
            email: Some(email.to_string()),
        }));
        identity
    }

    pub fn add_account(&self, email: &str, password: &str, uid: &str) {
        self.accounts
            .lock()
            .unwrap()
            .insert(email.to_string(), (password.to_string(), uid.to_string()));
    }

    /// Sign-out requests fail but still drop the session.
    pub fn fail_sign_out(&self) {
        self.fail_sign_out.store(true, Ordering::SeqCst);
    }

    pub fn sign_out_count(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }

    /// Session ended outside the page (token revoked, other tab).
    pub fn expire(&self) {
        self.state.send_replace(None);
    }

    fn establish(&self, uid: String, email: &str) -> UserAccount {
        let account = UserAccount {
            uid,
            email: Some(email.to_string()),
        };
        self.state.send_replace(Some(account.clone()));
        account
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> std::result::Result<UserAccount, AuthError> {
        if password.len() < 6 {
            return Err(AuthError::from_rest_message(
                "WEAK_PASSWORD : Password should be at least 6 characters",
            ));
        }
        let uid = {
            let mut accounts = self.accounts.lock().unwrap();
            if accounts.contains_key(email) {
                return Err(AuthError::from_rest_message("EMAIL_EXISTS"));
            }
            let uid = format!("uid-{}", self.next_uid.fetch_add(1, Ordering::SeqCst));
            accounts.insert(email.to_string(), (password.to_string(), uid.clone()));
            uid
        };
        Ok(self.establish(uid, email))
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> std::result::Result<UserAccount, AuthError> {
        let uid = match self.accounts.lock().unwrap().get(email) {
            Some((stored, uid)) if stored == password => uid.clone(),
            _ => return Err(AuthError::from_rest_message("INVALID_LOGIN_CREDENTIALS")),
        };
        Ok(self.establish(uid, email))
    }

    async fn sign_out(&self) -> std::result::Result<(), AuthError> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(None);
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(AuthError::new("network-request-failed", "Error"));
        }
        Ok(())
    }

    fn current_user(&self) -> Option<UserAccount> {
        self.state.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<UserAccount>> {
        self.state.subscribe()
    }

    async fn id_token(&self) -> std::result::Result<Option<String>, AuthError> {
        Ok(self.current_user().map(|account| format!("token-{}", account.uid)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Profile store
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum StoreOp {
    Get(String),
    SaveAccount(String, Value),
    Update(String, Value),
    Merge(String, Value),
}

/// In-memory profile store applying the same field masks as Firestore.
#[derive(Default)]
pub struct MemoryProfileStore {
    docs: Mutex<HashMap<String, Map<String, Value>>>,
    ops: Mutex<Vec<StoreOp>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryProfileStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert(&self, uid: &str, doc: Value) {
        if let Value::Object(map) = doc {
            self.docs.lock().unwrap().insert(uid.to_string(), map);
        }
    }

    pub fn doc(&self, uid: &str) -> Option<Value> {
        self.docs
            .lock()
            .unwrap()
            .get(uid)
            .cloned()
            .map(Value::Object)
    }

    pub fn ops(&self) -> Vec<StoreOp> {
        self.ops.lock().unwrap().clone()
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    /// Masked write. With `must_exist`, a missing document is an error.
    fn write(&self, uid: &str, object: Value, fields: &[&str], must_exist: bool) -> Result<Value> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ClientError::Database("permission denied".into()));
        }
        if must_exist && self.doc(uid).is_none() {
            return Err(ClientError::Database(format!("NOT_FOUND: users/{}", uid)));
        }
        let mut written = Map::new();
        if let Value::Object(object) = object {
            for field in fields {
                if let Some(value) = object.get(*field) {
                    written.insert(field.to_string(), value.clone());
                }
            }
        }
        let mut docs = self.docs.lock().unwrap();
        let doc = docs.entry(uid.to_string()).or_default();
        for (key, value) in &written {
            doc.insert(key.clone(), value.clone());
        }
        Ok(Value::Object(written))
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>> {
        self.ops.lock().unwrap().push(StoreOp::Get(uid.to_string()));
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ClientError::Database("unavailable".into()));
        }
        match self.doc(uid) {
            Some(doc) => serde_json::from_value(doc)
                .map(Some)
                .map_err(|e| ClientError::Database(e.to_string())),
            None => Ok(None),
        }
    }

    async fn save_account_record(&self, uid: &str, record: &AccountRecord) -> Result<()> {
        let object = serde_json::to_value(record).unwrap();
        let written = self.write(uid, object, &AccountRecord::FIELDS, false)?;
        self.ops
            .lock()
            .unwrap()
            .push(StoreOp::SaveAccount(uid.to_string(), written));
        Ok(())
    }

    async fn update_profile(&self, uid: &str, patch: &ProfilePatch) -> Result<()> {
        let object = serde_json::to_value(patch).unwrap();
        let written = self.write(uid, object, &ProfilePatch::PROFILE_FIELDS, true)?;
        self.ops
            .lock()
            .unwrap()
            .push(StoreOp::Update(uid.to_string(), written));
        Ok(())
    }

    async fn merge_profile(&self, uid: &str, patch: &ProfilePatch) -> Result<()> {
        let mut fields = vec!["email"];
        fields.extend(ProfilePatch::PROFILE_FIELDS);
        let object = serde_json::to_value(patch).unwrap();
        let written = self.write(uid, object, &fields, false)?;
        self.ops
            .lock()
            .unwrap()
            .push(StoreOp::Merge(uid.to_string(), written));
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mock backend
// ─────────────────────────────────────────────────────────────────────────────

/// One uploaded multipart part.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedPart {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub len: usize,
}

#[derive(Default)]
struct BackendState {
    config_reply: Mutex<Option<(StatusCode, String)>>,
    analyze_reply: Mutex<Option<(StatusCode, String)>>,
    hits: Mutex<Vec<String>>,
    uploads: Mutex<Vec<Vec<UploadedPart>>>,
}

/// Backend serving `/get-firebase-configuration` and `/analyze-cv`.
pub struct MockBackend {
    pub url: String,
    state: Arc<BackendState>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(BackendState::default());
        let app = Router::new()
            .route("/get-firebase-configuration", get(config_handler))
            .route("/analyze-cv", post(analyze_handler))
            .with_state(state.clone());

        let url = serve(app).await;
        let backend = Self { url, state };
        backend.reply_config(StatusCode::OK, &firebase_config_json().to_string());
        backend.reply_analysis(
            StatusCode::OK,
            &json!({ "status": "success", "profile": {}, "raw_analysis": "ok" }).to_string(),
        );
        backend
    }

    pub fn client(&self) -> BackendClient {
        BackendClient::new(reqwest::Client::new(), self.url.clone())
    }

    pub fn reply_config(&self, status: StatusCode, body: &str) {
        *self.state.config_reply.lock().unwrap() = Some((status, body.to_string()));
    }

    pub fn reply_analysis(&self, status: StatusCode, body: &str) {
        *self.state.analyze_reply.lock().unwrap() = Some((status, body.to_string()));
    }

    /// Paths requested so far, in order.
    pub fn hits(&self) -> Vec<String> {
        self.state.hits.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<Vec<UploadedPart>> {
        self.state.uploads.lock().unwrap().clone()
    }
}

async fn config_handler(State(state): State<Arc<BackendState>>) -> Response {
    state
        .hits
        .lock()
        .unwrap()
        .push("/get-firebase-configuration".to_string());
    canned(&state.config_reply)
}

async fn analyze_handler(
    State(state): State<Arc<BackendState>>,
    mut multipart: Multipart,
) -> Response {
    state.hits.lock().unwrap().push("/analyze-cv".to_string());

    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let len = field.bytes().await.map(|b| b.len()).unwrap_or(0);
        parts.push(UploadedPart {
            field: name,
            file_name,
            content_type,
            len,
        });
    }
    state.uploads.lock().unwrap().push(parts);

    canned(&state.analyze_reply)
}

fn canned(reply: &Mutex<Option<(StatusCode, String)>>) -> Response {
    let (status, body) = reply
        .lock()
        .unwrap()
        .clone()
        .unwrap_or((StatusCode::NOT_FOUND, String::new()));
    (
        status,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

/// Bind a random local port and serve `app` on it. Returns the base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

// ─────────────────────────────────────────────────────────────────────────────
// Mock identity server (Auth emulator REST surface)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct IdentityState {
    /// email -> (password, uid)
    accounts: Mutex<HashMap<String, (String, String)>>,
    /// refresh token -> uid
    refresh_tokens: Mutex<HashMap<String, String>>,
    hits: Mutex<Vec<String>>,
    next: AtomicUsize,
}

/// Identity Toolkit / Secure Token server speaking the REST protocol.
pub struct MockIdentityServer {
    pub url: String,
    state: Arc<IdentityState>,
}

impl MockIdentityServer {
    pub async fn start() -> Self {
        let state = Arc::new(IdentityState::default());
        let app = Router::new()
            .fallback(identity_handler)
            .with_state(state.clone());
        let url = serve(app).await;
        Self { url, state }
    }

    pub fn add_account(&self, email: &str, password: &str, uid: &str) {
        self.state
            .accounts
            .lock()
            .unwrap()
            .insert(email.to_string(), (password.to_string(), uid.to_string()));
    }

    /// Make `token` a valid refresh token for `uid`.
    pub fn add_refresh_token(&self, token: &str, uid: &str) {
        self.state
            .refresh_tokens
            .lock()
            .unwrap()
            .insert(token.to_string(), uid.to_string());
    }

    pub fn hits(&self) -> Vec<String> {
        self.state.hits.lock().unwrap().clone()
    }
}

fn rest_error(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": { "code": 400, "message": message } })),
    )
        .into_response()
}

async fn identity_handler(
    State(state): State<Arc<IdentityState>>,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    body: axum::body::Bytes,
) -> Response {
    let path = uri.path().to_string();
    state.hits.lock().unwrap().push(path.clone());

    if query.get("key").map(String::as_str) != Some(TEST_API_KEY) {
        return rest_error("API key not valid. Please pass a valid API key.");
    }

    let n = state.next.fetch_add(1, Ordering::SeqCst);

    match path.as_str() {
        "/identitytoolkit.googleapis.com/v1/accounts:signUp"
        | "/identitytoolkit.googleapis.com/v1/accounts:signInWithPassword" => {
            let Ok(req) = serde_json::from_slice::<Value>(&body) else {
                return rest_error("INVALID_JSON");
            };
            let email = req["email"].as_str().unwrap_or_default().to_string();
            let password = req["password"].as_str().unwrap_or_default().to_string();

            let uid = if path.ends_with("signUp") {
                if password.len() < 6 {
                    return rest_error("WEAK_PASSWORD : Password should be at least 6 characters");
                }
                let mut accounts = state.accounts.lock().unwrap();
                if accounts.contains_key(&email) {
                    return rest_error("EMAIL_EXISTS");
                }
                let uid = format!("uid-{}", n);
                accounts.insert(email.clone(), (password, uid.clone()));
                uid
            } else {
                match state.accounts.lock().unwrap().get(&email) {
                    Some((stored, uid)) if *stored == password => uid.clone(),
                    _ => return rest_error("INVALID_LOGIN_CREDENTIALS"),
                }
            };

            let refresh_token = format!("refresh-{}", n);
            state
                .refresh_tokens
                .lock()
                .unwrap()
                .insert(refresh_token.clone(), uid.clone());

            Json(json!({
                "localId": uid,
                "email": email,
                "idToken": format!("id-{}", n),
                "refreshToken": refresh_token,
                "expiresIn": "3600"
            }))
            .into_response()
        }
        "/securetoken.googleapis.com/v1/token" => {
            let form = parse_form(&body);
            if form.get("grant_type").map(String::as_str) != Some("refresh_token") {
                return rest_error("INVALID_GRANT_TYPE");
            }
            let token = form.get("refresh_token").cloned().unwrap_or_default();
            let Some(uid) = state.refresh_tokens.lock().unwrap().get(&token).cloned() else {
                return rest_error("INVALID_REFRESH_TOKEN");
            };

            Json(json!({
                "id_token": format!("id-refreshed-{}", n),
                "refresh_token": token,
                "expires_in": "3600",
                "user_id": uid,
                "token_type": "Bearer"
            }))
            .into_response()
        }
        _ => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

/// Parse a urlencoded body of plain tokens.
fn parse_form(body: &[u8]) -> HashMap<String, String> {
    String::from_utf8_lossy(body)
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Sessions
// ─────────────────────────────────────────────────────────────────────────────

pub fn handles(identity: Arc<FakeIdentity>, db: Arc<MemoryProfileStore>) -> Handles {
    Handles { identity, db }
}

pub fn test_session(
    identity: Arc<FakeIdentity>,
    db: Arc<MemoryProfileStore>,
    backend: BackendClient,
) -> Session {
    Session {
        identity,
        db,
        backend,
    }
}

/// Backend client pointing at a port nothing listens on.
pub fn unreachable_backend() -> BackendClient {
    BackendClient::new(reqwest::Client::new(), "http://127.0.0.1:9")
}
