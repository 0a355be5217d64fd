//! In-memory mock of the pool frontend's user-management API.
//!
//! # Overview
//! Implements the same `POST /{operation}` endpoints the production frontend
//! exposes, backed by in-memory maps of users, sessions and pending actions.
//! Every known operation answers HTTP 200 with a JSON body whose `status`
//! field classifies the outcome; unknown paths fall through to axum's 404.
//!
//! # Design
//! - Request structs are defined here independently of the client crate;
//!   the client's integration tests catch schema drift between the two.
//! - Flows that would send email in production (account activation,
//!   password change) return the action id in the response instead, so a
//!   test can complete the flow without a mail sink.
//! - 2FA is modeled without RFC 6238: activation returns the key, and the
//!   key itself is the one valid TOTP code.

use std::{collections::HashMap, sync::Arc};

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

/// Coins the mock pool mines; settings updates for anything else are
/// rejected with `unknown_coin`.
pub const KNOWN_COINS: [&str; 2] = ["BTC", "LTC"];

#[derive(Clone, Debug)]
struct CoinSettings {
    address: String,
    payout_threshold: String,
    auto_payout_enabled: bool,
}

#[derive(Clone, Debug)]
struct User {
    password: String,
    email: String,
    is_active: bool,
    is_read_only: bool,
    fee_plan_id: Option<i64>,
    totp_key: Option<String>,
    settings: HashMap<String, CoinSettings>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PendingAction {
    Activate,
    ChangePassword,
}

/// Mutable server state: registered users, live sessions and pending
/// email-style actions, all keyed by opaque ids.
#[derive(Default)]
struct Frontend {
    users: HashMap<String, User>,
    sessions: HashMap<String, String>,
    actions: HashMap<String, (String, PendingAction)>,
}

type Db = Arc<RwLock<Frontend>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Frontend::default()));
    Router::new()
        .route("/userCreate", post(user_create))
        .route("/userResendEmail", post(user_resend_email))
        .route("/userAction", post(user_action))
        .route("/userLogin", post(user_login))
        .route("/userLogout", post(user_logout))
        .route("/userChangePasswordInitiate", post(user_change_password_initiate))
        .route("/userActivate2faInitiate", post(user_activate_2fa_initiate))
        .route("/userDeactivate2faInitiate", post(user_deactivate_2fa_initiate))
        .route("/userGetCredentials", post(user_get_credentials))
        .route("/userGetSettings", post(user_get_settings))
        .route("/userUpdateSettings", post(user_update_settings))
        .route("/backendManualPayout", post(backend_manual_payout))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn status(s: &str) -> Json<Value> {
    Json(json!({ "status": s }))
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Resolve the account an authenticated operation targets: the session
/// owner, or `target_login` when an operator session acts on another
/// account. The mock does not model operator privileges.
fn resolve_target(
    state: &Frontend,
    session_id: &str,
    target_login: Option<&String>,
) -> Result<String, &'static str> {
    let login = state.sessions.get(session_id).ok_or("unknown_id")?;
    match target_login {
        Some(target) if state.users.contains_key(target) => Ok(target.clone()),
        Some(_) => Err("unknown_login"),
        None => Ok(login.clone()),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserCreateRequest {
    login: String,
    password: String,
    email: String,
    #[serde(rename = "id")]
    session_id: Option<String>,
    is_active: Option<bool>,
    is_read_only: Option<bool>,
    fee_plan_id: Option<i64>,
}

async fn user_create(
    State(db): State<Db>,
    Json(req): Json<UserCreateRequest>,
) -> Json<Value> {
    let mut guard = db.write().await;
    let state = &mut *guard;

    if req.login.is_empty() {
        return status("login_format_invalid");
    }
    if let Some(session_id) = &req.session_id {
        if !state.sessions.contains_key(session_id) {
            return status("unknown_id");
        }
    }
    if state.users.contains_key(&req.login) {
        return status("duplicate_login");
    }

    let is_active = req.is_active.unwrap_or(false);
    state.users.insert(
        req.login.clone(),
        User {
            password: req.password,
            email: req.email,
            is_active,
            is_read_only: req.is_read_only.unwrap_or(false),
            fee_plan_id: req.fee_plan_id,
            totp_key: None,
            settings: HashMap::new(),
        },
    );
    debug!(login = %req.login, is_active, "user created");

    if is_active {
        status("ok")
    } else {
        // Activation normally travels by email; hand the action id back in
        // the response so tests can complete signup directly.
        let action_id = new_id();
        state
            .actions
            .insert(action_id.clone(), (req.login, PendingAction::Activate));
        Json(json!({ "status": "ok", "actionId": action_id }))
    }
}

#[derive(Deserialize)]
struct UserResendEmailRequest {
    login: String,
    password: String,
    email: Option<String>,
}

async fn user_resend_email(
    State(db): State<Db>,
    Json(req): Json<UserResendEmailRequest>,
) -> Json<Value> {
    let mut guard = db.write().await;
    let state = &mut *guard;

    match state.users.get_mut(&req.login) {
        None => return status("unknown_login"),
        Some(user) => {
            if user.password != req.password {
                return status("invalid_password");
            }
            if user.is_active {
                return status("user_already_active");
            }
            if let Some(email) = req.email {
                user.email = email;
            }
        }
    }

    // Resending invalidates any activation link already issued.
    state
        .actions
        .retain(|_, (login, kind)| !(*login == req.login && *kind == PendingAction::Activate));
    let action_id = new_id();
    state
        .actions
        .insert(action_id.clone(), (req.login, PendingAction::Activate));
    Json(json!({ "status": "ok", "actionId": action_id }))
}

// Unknown keys (sessionId, targetLogin, totp) are ignored; the mock only
// needs the action id and, for password changes, the replacement password.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserActionRequest {
    action_id: String,
    new_password: Option<String>,
}

async fn user_action(
    State(db): State<Db>,
    Json(req): Json<UserActionRequest>,
) -> Json<Value> {
    let mut guard = db.write().await;
    let state = &mut *guard;

    let Some((login, kind)) = state.actions.get(&req.action_id).cloned() else {
        return status("unknown_action");
    };
    if kind == PendingAction::ChangePassword && req.new_password.is_none() {
        // Leave the action pending so the caller can retry with a password.
        return status("password_format_invalid");
    }
    state.actions.remove(&req.action_id);

    let Some(user) = state.users.get_mut(&login) else {
        return status("unknown_login");
    };
    match kind {
        PendingAction::Activate => user.is_active = true,
        PendingAction::ChangePassword => {
            user.password = req.new_password.unwrap_or_default();
        }
    }
    debug!(login = %login, ?kind, "action completed");
    status("ok")
}

#[derive(Deserialize)]
struct UserLoginRequest {
    login: String,
    password: String,
    totp: Option<String>,
}

async fn user_login(
    State(db): State<Db>,
    Json(req): Json<UserLoginRequest>,
) -> Json<Value> {
    let mut guard = db.write().await;
    let state = &mut *guard;

    let Some(user) = state.users.get(&req.login) else {
        return status("unknown_login");
    };
    if user.password != req.password {
        return status("invalid_password");
    }
    if !user.is_active {
        return status("user_not_active");
    }
    if let Some(key) = &user.totp_key {
        if req.totp.as_deref() != Some(key.as_str()) {
            return status("invalid_totp");
        }
    }

    let session_id = new_id();
    state.sessions.insert(session_id.clone(), req.login.clone());
    debug!(login = %req.login, "session opened");
    Json(json!({ "status": "ok", "sessionId": session_id }))
}

#[derive(Deserialize)]
struct UserLogoutRequest {
    #[serde(rename = "id")]
    session_id: String,
}

async fn user_logout(
    State(db): State<Db>,
    Json(req): Json<UserLogoutRequest>,
) -> Json<Value> {
    let mut state = db.write().await;
    if state.sessions.remove(&req.session_id).is_some() {
        status("ok")
    } else {
        status("unknown_id")
    }
}

#[derive(Deserialize)]
struct UserChangePasswordInitiateRequest {
    login: String,
}

async fn user_change_password_initiate(
    State(db): State<Db>,
    Json(req): Json<UserChangePasswordInitiateRequest>,
) -> Json<Value> {
    let mut guard = db.write().await;
    let state = &mut *guard;

    if !state.users.contains_key(&req.login) {
        return status("unknown_login");
    }
    let action_id = new_id();
    state
        .actions
        .insert(action_id.clone(), (req.login, PendingAction::ChangePassword));
    Json(json!({ "status": "ok", "actionId": action_id }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TwoFactorInitiateRequest {
    session_id: String,
    target_login: Option<String>,
}

async fn user_activate_2fa_initiate(
    State(db): State<Db>,
    Json(req): Json<TwoFactorInitiateRequest>,
) -> Json<Value> {
    let mut guard = db.write().await;
    let state = &mut *guard;

    let login = match resolve_target(state, &req.session_id, req.target_login.as_ref()) {
        Ok(login) => login,
        Err(s) => return status(s),
    };
    let key = new_id();
    if let Some(user) = state.users.get_mut(&login) {
        user.totp_key = Some(key.clone());
    }
    // Production defers enabling until the key is confirmed via userAction;
    // the mock enables immediately and returns the key.
    Json(json!({ "status": "ok", "key": key }))
}

async fn user_deactivate_2fa_initiate(
    State(db): State<Db>,
    Json(req): Json<TwoFactorInitiateRequest>,
) -> Json<Value> {
    let mut guard = db.write().await;
    let state = &mut *guard;

    let login = match resolve_target(state, &req.session_id, req.target_login.as_ref()) {
        Ok(login) => login,
        Err(s) => return status(s),
    };
    if let Some(user) = state.users.get_mut(&login) {
        user.totp_key = None;
    }
    status("ok")
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionTargetRequest {
    #[serde(rename = "id")]
    session_id: String,
    target_login: Option<String>,
}

async fn user_get_credentials(
    State(db): State<Db>,
    Json(req): Json<SessionTargetRequest>,
) -> Json<Value> {
    let state = db.read().await;
    let login = match resolve_target(&state, &req.session_id, req.target_login.as_ref()) {
        Ok(login) => login,
        Err(s) => return status(s),
    };
    let Some(user) = state.users.get(&login) else {
        return status("unknown_login");
    };
    Json(json!({
        "status": "ok",
        "login": login,
        "email": user.email,
        "isActive": user.is_active,
        "isReadOnly": user.is_read_only,
        "feePlanId": user.fee_plan_id,
    }))
}

async fn user_get_settings(
    State(db): State<Db>,
    Json(req): Json<SessionTargetRequest>,
) -> Json<Value> {
    let state = db.read().await;
    let login = match resolve_target(&state, &req.session_id, req.target_login.as_ref()) {
        Ok(login) => login,
        Err(s) => return status(s),
    };
    let Some(user) = state.users.get(&login) else {
        return status("unknown_login");
    };
    let mut entries: Vec<_> = user.settings.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    let settings: Vec<Value> = entries
        .into_iter()
        .map(|(coin, s)| {
            json!({
                "coin": coin,
                "address": s.address,
                "payoutThreshold": s.payout_threshold,
                "autoPayoutEnabled": s.auto_payout_enabled,
            })
        })
        .collect();
    Json(json!({ "status": "ok", "settings": settings }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserUpdateSettingsRequest {
    #[serde(rename = "id")]
    session_id: String,
    coin: String,
    address: String,
    payout_threshold: String,
    auto_payout_enabled: bool,
    target_login: Option<String>,
    totp: Option<String>,
}

async fn user_update_settings(
    State(db): State<Db>,
    Json(req): Json<UserUpdateSettingsRequest>,
) -> Json<Value> {
    let mut guard = db.write().await;
    let state = &mut *guard;

    let login = match resolve_target(state, &req.session_id, req.target_login.as_ref()) {
        Ok(login) => login,
        Err(s) => return status(s),
    };
    if !KNOWN_COINS.contains(&req.coin.as_str()) {
        return status("unknown_coin");
    }
    let Some(user) = state.users.get_mut(&login) else {
        return status("unknown_login");
    };
    if let Some(key) = &user.totp_key {
        if req.totp.as_deref() != Some(key.as_str()) {
            return status("invalid_totp");
        }
    }
    user.settings.insert(
        req.coin,
        CoinSettings {
            address: req.address,
            payout_threshold: req.payout_threshold,
            auto_payout_enabled: req.auto_payout_enabled,
        },
    );
    status("ok")
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManualPayoutRequest {
    #[serde(rename = "id")]
    session_id: String,
    coin: String,
    target_login: Option<String>,
}

async fn backend_manual_payout(
    State(db): State<Db>,
    Json(req): Json<ManualPayoutRequest>,
) -> Json<Value> {
    let state = db.read().await;
    let login = match resolve_target(&state, &req.session_id, req.target_login.as_ref()) {
        Ok(login) => login,
        Err(s) => return status(s),
    };
    if !KNOWN_COINS.contains(&req.coin.as_str()) {
        return status("unknown_coin");
    }
    let Some(user) = state.users.get(&login) else {
        return status("unknown_login");
    };
    if !user.settings.contains_key(&req.coin) {
        return status("no_payout_address");
    }
    status("ok")
}
