//! Request payloads for the pool frontend API.
//!
//! # Design
//! One `Serialize` struct per endpoint. Required fields are plain; optional
//! fields are `Option` with `skip_serializing_if`, so a field the caller
//! leaves `None` never reaches the wire. That keeps "not provided" distinct
//! from "provided as empty/false/zero", which the frontend cares about
//! (e.g. an admin creating an already-active account vs. a self-signup).
//!
//! `new()` constructors take the required fields; optional fields start
//! `None` and are set with struct-update syntax:
//!
//! ```
//! use poolfrontend_client::UserLogin;
//!
//! let login = UserLogin {
//!     totp: Some("123456".to_string()),
//!     ..UserLogin::new("alice", "pw")
//! };
//! ```

use serde::Serialize;

/// Payload for `userCreate`.
///
/// Self-signup needs only login, password and email. The optional fields are
/// for administrative creation: `session_id` authenticates the admin,
/// `is_active` skips email activation, `is_read_only` restricts the account
/// and `fee_plan_id` selects a non-default fee schedule.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreate {
    pub login: String,
    pub password: String,
    pub email: String,
    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_read_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_plan_id: Option<i64>,
}

impl UserCreate {
    pub fn new(login: &str, password: &str, email: &str) -> Self {
        Self {
            login: login.to_string(),
            password: password.to_string(),
            email: email.to_string(),
            session_id: None,
            is_active: None,
            is_read_only: None,
            fee_plan_id: None,
        }
    }
}

/// Payload for `userAction`, completing a flow started by an `*Initiate`
/// call or by `userCreate` (account activation). Which optional fields
/// matter depends on the action: password changes carry `new_password`,
/// sensitive confirmations carry `totp`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAction {
    pub action_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_login: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totp: Option<String>,
}

impl UserAction {
    pub fn new(action_id: &str) -> Self {
        Self {
            action_id: action_id.to_string(),
            session_id: None,
            target_login: None,
            new_password: None,
            totp: None,
        }
    }
}

/// Payload for `userResendEmail`. Re-sends the activation email for an
/// account that has not completed signup; supplying `email` also replaces
/// the address on record (for correcting a typo in the original signup).
#[derive(Debug, Clone, Serialize)]
pub struct UserResendEmail {
    pub login: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserResendEmail {
    pub fn new(login: &str, password: &str) -> Self {
        Self {
            login: login.to_string(),
            password: password.to_string(),
            email: None,
        }
    }
}

/// Payload for `userLogin`. `totp` is required by the server only for
/// accounts with 2FA enabled.
#[derive(Debug, Clone, Serialize)]
pub struct UserLogin {
    pub login: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totp: Option<String>,
}

impl UserLogin {
    pub fn new(login: &str, password: &str) -> Self {
        Self {
            login: login.to_string(),
            password: password.to_string(),
            totp: None,
        }
    }
}

/// Payload for `userLogout`. The session id travels as `id` on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct UserLogout {
    #[serde(rename = "id")]
    pub session_id: String,
}

impl UserLogout {
    pub fn new(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
        }
    }
}

/// Payload for `userChangePasswordInitiate`.
#[derive(Debug, Clone, Serialize)]
pub struct UserChangePasswordInitiate {
    pub login: String,
}

impl UserChangePasswordInitiate {
    pub fn new(login: &str) -> Self {
        Self {
            login: login.to_string(),
        }
    }
}

/// Payload for `userActivate2faInitiate` and `userDeactivate2faInitiate`.
/// `target_login` lets an administrator session operate on another account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTwoFactorInitiate {
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_login: Option<String>,
}

impl UserTwoFactorInitiate {
    pub fn new(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            target_login: None,
        }
    }
}

/// Payload for `userGetCredentials`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGetCredentials {
    #[serde(rename = "id")]
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_login: Option<String>,
}

impl UserGetCredentials {
    pub fn new(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            target_login: None,
        }
    }
}

/// Payload for `userGetSettings`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGetSettings {
    #[serde(rename = "id")]
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_login: Option<String>,
}

impl UserGetSettings {
    pub fn new(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            target_login: None,
        }
    }
}

/// Payload for `userUpdateSettings`. Replaces the payout configuration for
/// one coin. `payout_threshold` is a decimal string, not a float.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateSettings {
    #[serde(rename = "id")]
    pub session_id: String,
    pub coin: String,
    pub address: String,
    pub payout_threshold: String,
    pub auto_payout_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_login: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totp: Option<String>,
}

impl UserUpdateSettings {
    pub fn new(
        session_id: &str,
        coin: &str,
        address: &str,
        payout_threshold: &str,
        auto_payout_enabled: bool,
    ) -> Self {
        Self {
            session_id: session_id.to_string(),
            coin: coin.to_string(),
            address: address.to_string(),
            payout_threshold: payout_threshold.to_string(),
            auto_payout_enabled,
            target_login: None,
            totp: None,
        }
    }
}

/// Payload for `backendManualPayout`, forcing an immediate payout of the
/// accumulated balance for one coin.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendManualPayout {
    #[serde(rename = "id")]
    pub session_id: String,
    pub coin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_login: Option<String>,
}

impl BackendManualPayout {
    pub fn new(session_id: &str, coin: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            coin: coin.to_string(),
            target_login: None,
        }
    }
}
