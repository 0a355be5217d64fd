//! Synchronous client for the pool frontend HTTP API.
//!
//! # Design
//! `FrontendClient` holds a base URL and a reusable agent and carries no
//! other state between calls. Every operation funnels through the private
//! `call` routine: serialize the payload, POST it to
//! `{base_url}/{operation}`, parse the JSON reply, optionally trace the
//! exchange, optionally assert on the reply's `status` field. Convenience
//! methods pin the endpoint name and payload type per operation and forward
//! `required_status` / `debug` unchanged.
//!
//! Responses come back as raw `serde_json::Value`: the test suites using
//! this client pick out session ids, action ids and 2FA keys themselves,
//! and the response schemas vary per endpoint and server version.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;
use crate::requests::{
    BackendManualPayout, UserAction, UserChangePasswordInitiate, UserCreate, UserGetCredentials,
    UserGetSettings, UserLogin, UserLogout, UserResendEmail, UserTwoFactorInitiate,
    UserUpdateSettings,
};
use crate::trace::curl_trace;

/// Blocking client for the pool frontend API.
///
/// One instance per test session is enough; the agent reuses connections
/// across calls but the client itself is stateless.
#[derive(Clone)]
pub struct FrontendClient {
    agent: ureq::Agent,
    base_url: String,
}

impl FrontendClient {
    /// Create a client for the frontend at `base_url`.
    ///
    /// The URL is stored verbatim; callers supply it without a trailing
    /// slash, exactly as it should appear before `/{operation}`.
    pub fn new(base_url: &str) -> Self {
        // The frontend reports failures in-band through the `status` field,
        // so non-2xx replies must come back as data, not as Err.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            agent,
            base_url: base_url.to_string(),
        }
    }

    fn endpoint_url(&self, operation: &str) -> String {
        format!("{}/{}", self.base_url, operation)
    }

    /// Shared dispatch: one blocking POST, one parsed reply.
    fn call(
        &self,
        operation: &str,
        payload: &impl Serialize,
        required_status: Option<&str>,
        debug: bool,
    ) -> Result<Value, ApiError> {
        let body = serde_json::to_string(payload).map_err(ApiError::Encode)?;
        let url = self.endpoint_url(operation);

        let mut response = self
            .agent
            .post(&url)
            .content_type("application/json")
            .send(body.as_bytes())?;
        let text = response.body_mut().read_to_string()?;
        let value: Value = serde_json::from_str(&text).map_err(ApiError::Decode)?;

        if debug {
            debug!("{}", curl_trace(&url, &body, &value));
        }

        if let Some(expected) = required_status {
            let actual = value.get("status").cloned().unwrap_or(Value::Null);
            if actual.as_str() != Some(expected) {
                return Err(ApiError::StatusMismatch {
                    operation: operation.to_string(),
                    expected: expected.to_string(),
                    actual,
                });
            }
        }

        Ok(value)
    }

    /// Register a new account, or create one administratively when the
    /// optional fields of [`UserCreate`] are set.
    pub fn user_create(
        &self,
        input: &UserCreate,
        required_status: Option<&str>,
        debug: bool,
    ) -> Result<Value, ApiError> {
        self.call("userCreate", input, required_status, debug)
    }

    /// Complete a pending action (account activation, password change)
    /// identified by its action id.
    pub fn user_action(
        &self,
        input: &UserAction,
        required_status: Option<&str>,
        debug: bool,
    ) -> Result<Value, ApiError> {
        self.call("userAction", input, required_status, debug)
    }

    /// Re-send the activation email for a not-yet-active account.
    pub fn user_resend_email(
        &self,
        input: &UserResendEmail,
        required_status: Option<&str>,
        debug: bool,
    ) -> Result<Value, ApiError> {
        self.call("userResendEmail", input, required_status, debug)
    }

    /// Log in; on success the response carries the session id.
    pub fn user_login(
        &self,
        input: &UserLogin,
        required_status: Option<&str>,
        debug: bool,
    ) -> Result<Value, ApiError> {
        self.call("userLogin", input, required_status, debug)
    }

    /// Invalidate a session.
    pub fn user_logout(
        &self,
        input: &UserLogout,
        required_status: Option<&str>,
        debug: bool,
    ) -> Result<Value, ApiError> {
        self.call("userLogout", input, required_status, debug)
    }

    /// Begin a password change; the response carries the action id that
    /// `userAction` later consumes together with the new password.
    pub fn user_change_password_initiate(
        &self,
        input: &UserChangePasswordInitiate,
        required_status: Option<&str>,
        debug: bool,
    ) -> Result<Value, ApiError> {
        self.call("userChangePasswordInitiate", input, required_status, debug)
    }

    /// Begin enabling 2FA; the response carries the shared secret.
    pub fn user_activate_2fa_initiate(
        &self,
        input: &UserTwoFactorInitiate,
        required_status: Option<&str>,
        debug: bool,
    ) -> Result<Value, ApiError> {
        self.call("userActivate2faInitiate", input, required_status, debug)
    }

    /// Begin disabling 2FA.
    pub fn user_deactivate_2fa_initiate(
        &self,
        input: &UserTwoFactorInitiate,
        required_status: Option<&str>,
        debug: bool,
    ) -> Result<Value, ApiError> {
        self.call("userDeactivate2faInitiate", input, required_status, debug)
    }

    /// Fetch login, email and account flags for a session.
    pub fn user_get_credentials(
        &self,
        input: &UserGetCredentials,
        required_status: Option<&str>,
        debug: bool,
    ) -> Result<Value, ApiError> {
        self.call("userGetCredentials", input, required_status, debug)
    }

    /// Fetch per-coin payout settings.
    pub fn user_get_settings(
        &self,
        input: &UserGetSettings,
        required_status: Option<&str>,
        debug: bool,
    ) -> Result<Value, ApiError> {
        self.call("userGetSettings", input, required_status, debug)
    }

    /// Replace the payout settings for one coin.
    pub fn user_update_settings(
        &self,
        input: &UserUpdateSettings,
        required_status: Option<&str>,
        debug: bool,
    ) -> Result<Value, ApiError> {
        self.call("userUpdateSettings", input, required_status, debug)
    }

    /// Force an immediate payout for one coin.
    pub fn backend_manual_payout(
        &self,
        input: &BackendManualPayout,
        required_status: Option<&str>,
        debug: bool,
    ) -> Result<Value, ApiError> {
        self.call("backendManualPayout", input, required_status, debug)
    }
}
