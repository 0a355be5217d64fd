//! Full user-lifecycle test against the live mock frontend.
//!
//! # Design
//! Starts the mock frontend on a random port, then exercises every client
//! operation over real HTTP: signup + activation, resend-email, login and
//! sessions, 2FA, password change, payout settings and manual payout, plus
//! the three error paths (status mismatch, transport failure, non-JSON
//! reply).

use poolfrontend_client::{
    ApiError, BackendManualPayout, FrontendClient, UserAction, UserChangePasswordInitiate,
    UserCreate, UserGetCredentials, UserGetSettings, UserLogin, UserLogout, UserResendEmail,
    UserTwoFactorInitiate, UserUpdateSettings,
};

/// Start the mock frontend on a random port and return its base URL.
///
/// The listener is bound before the server thread starts, so connections
/// made immediately after this returns queue in the accept backlog.
fn start_mock_frontend() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_frontend::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

/// Create, activate and log in `login`; returns the session id.
fn open_session(client: &FrontendClient, login: &str) -> String {
    let created = client
        .user_create(
            &UserCreate::new(login, "pw123", &format!("{login}@example.com")),
            Some("ok"),
            false,
        )
        .unwrap();
    let action_id = created["actionId"].as_str().unwrap();
    client
        .user_action(&UserAction::new(action_id), Some("ok"), false)
        .unwrap();
    let logged_in = client
        .user_login(&UserLogin::new(login, "pw123"), Some("ok"), false)
        .unwrap();
    logged_in["sessionId"].as_str().unwrap().to_string()
}

#[test]
fn user_lifecycle() {
    // Surface the client's curl traces when running with --nocapture.
    let _ = tracing_subscriber::fmt()
        .with_env_filter("poolfrontend_client=debug")
        .try_init();

    let base = start_mock_frontend();
    let client = FrontendClient::new(&base);

    // Step 1: signup. The account stays inactive until the emailed action
    // completes; the mock returns the action id in the response.
    let created = client
        .user_create(
            &UserCreate::new("alice", "pw123", "a@example.com"),
            Some("ok"),
            true,
        )
        .unwrap();
    let action_id = created["actionId"].as_str().unwrap().to_string();

    // Step 2: login before activation is refused in-band.
    let premature = client
        .user_login(&UserLogin::new("alice", "pw123"), None, false)
        .unwrap();
    assert_eq!(premature["status"], "user_not_active");

    // Step 3: activate, then log in.
    client
        .user_action(&UserAction::new(&action_id), Some("ok"), false)
        .unwrap();
    let logged_in = client
        .user_login(&UserLogin::new("alice", "pw123"), Some("ok"), false)
        .unwrap();
    let session = logged_in["sessionId"].as_str().unwrap().to_string();

    // Step 4: credentials reflect the signup.
    let creds = client
        .user_get_credentials(&UserGetCredentials::new(&session), Some("ok"), false)
        .unwrap();
    assert_eq!(creds["login"], "alice");
    assert_eq!(creds["email"], "a@example.com");
    assert_eq!(creds["isActive"], true);

    // Step 5: payout settings round-trip.
    client
        .user_update_settings(
            &UserUpdateSettings::new(&session, "BTC", "bc1qtest", "0.005", true),
            Some("ok"),
            false,
        )
        .unwrap();
    let settings = client
        .user_get_settings(&UserGetSettings::new(&session), Some("ok"), false)
        .unwrap();
    assert_eq!(settings["settings"][0]["coin"], "BTC");
    assert_eq!(settings["settings"][0]["address"], "bc1qtest");
    assert_eq!(settings["settings"][0]["payoutThreshold"], "0.005");
    assert_eq!(settings["settings"][0]["autoPayoutEnabled"], true);

    // Step 6: manual payout works once an address is configured.
    client
        .backend_manual_payout(&BackendManualPayout::new(&session, "BTC"), Some("ok"), false)
        .unwrap();

    // Step 7: enable 2FA; logins now need the key as TOTP.
    let activated = client
        .user_activate_2fa_initiate(&UserTwoFactorInitiate::new(&session), Some("ok"), false)
        .unwrap();
    let key = activated["key"].as_str().unwrap().to_string();

    let denied = client
        .user_login(&UserLogin::new("alice", "pw123"), None, false)
        .unwrap();
    assert_eq!(denied["status"], "invalid_totp");

    let with_totp = client
        .user_login(
            &UserLogin {
                totp: Some(key),
                ..UserLogin::new("alice", "pw123")
            },
            Some("ok"),
            false,
        )
        .unwrap();
    let second_session = with_totp["sessionId"].as_str().unwrap().to_string();

    client
        .user_deactivate_2fa_initiate(&UserTwoFactorInitiate::new(&session), Some("ok"), false)
        .unwrap();

    // Step 8: password change via initiate + action.
    let initiated = client
        .user_change_password_initiate(
            &UserChangePasswordInitiate::new("alice"),
            Some("ok"),
            false,
        )
        .unwrap();
    let change_action = initiated["actionId"].as_str().unwrap().to_string();
    client
        .user_action(
            &UserAction {
                new_password: Some("fresh".to_string()),
                ..UserAction::new(&change_action)
            },
            Some("ok"),
            false,
        )
        .unwrap();
    client
        .user_login(&UserLogin::new("alice", "fresh"), Some("ok"), false)
        .unwrap();

    // Step 9: both sessions log out exactly once.
    client
        .user_logout(&UserLogout::new(&session), Some("ok"), false)
        .unwrap();
    client
        .user_logout(&UserLogout::new(&second_session), Some("ok"), false)
        .unwrap();
}

#[test]
fn resend_email_reissues_activation() {
    let base = start_mock_frontend();
    let client = FrontendClient::new(&base);

    let created = client
        .user_create(&UserCreate::new("bob", "pw", "typo@example.com"), Some("ok"), false)
        .unwrap();
    let stale_action = created["actionId"].as_str().unwrap().to_string();

    let resent = client
        .user_resend_email(
            &UserResendEmail {
                email: Some("fixed@example.com".to_string()),
                ..UserResendEmail::new("bob", "pw")
            },
            Some("ok"),
            false,
        )
        .unwrap();
    let fresh_action = resent["actionId"].as_str().unwrap().to_string();
    assert_ne!(fresh_action, stale_action);

    // The stale link no longer activates, the fresh one does.
    let stale = client
        .user_action(&UserAction::new(&stale_action), None, false)
        .unwrap();
    assert_eq!(stale["status"], "unknown_action");
    client
        .user_action(&UserAction::new(&fresh_action), Some("ok"), false)
        .unwrap();

    let session = client
        .user_login(&UserLogin::new("bob", "pw"), Some("ok"), false)
        .unwrap()["sessionId"]
        .as_str()
        .unwrap()
        .to_string();
    let creds = client
        .user_get_credentials(&UserGetCredentials::new(&session), Some("ok"), false)
        .unwrap();
    assert_eq!(creds["email"], "fixed@example.com");
}

#[test]
fn status_mismatch_error_names_operation() {
    let base = start_mock_frontend();
    let client = FrontendClient::new(&base);
    let session = open_session(&client, "carol");

    client
        .user_logout(&UserLogout::new(&session), Some("ok"), false)
        .unwrap();
    let err = client
        .user_logout(&UserLogout::new(&session), Some("ok"), false)
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("userLogout failed"), "message: {message}");
    match err {
        ApiError::StatusMismatch {
            operation,
            expected,
            actual,
        } => {
            assert_eq!(operation, "userLogout");
            assert_eq!(expected, "ok");
            assert_eq!(actual, serde_json::json!("unknown_id"));
        }
        other => panic!("expected StatusMismatch, got {other:?}"),
    }
}

#[test]
fn mismatching_reply_without_status_check_is_returned_raw() {
    let base = start_mock_frontend();
    let client = FrontendClient::new(&base);

    // No required_status: the error reply comes back as a value.
    let reply = client
        .user_logout(&UserLogout::new("no-such-session"), None, false)
        .unwrap();
    assert_eq!(reply["status"], "unknown_id");
}

#[test]
fn debug_trace_does_not_change_result() {
    let base = start_mock_frontend();
    let client = FrontendClient::new(&base);
    let session = open_session(&client, "dave");

    let quiet = client
        .user_get_settings(&UserGetSettings::new(&session), Some("ok"), false)
        .unwrap();
    let traced = client
        .user_get_settings(&UserGetSettings::new(&session), Some("ok"), true)
        .unwrap();
    assert_eq!(quiet, traced);
}

#[test]
fn connection_refused_is_transport_error() {
    // Bind then drop to get a port with nothing listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = FrontendClient::new(&format!("http://{addr}"));
    let err = client
        .user_login(&UserLogin::new("alice", "pw"), None, false)
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
}

#[test]
fn non_json_reply_is_decode_error() {
    let base = start_mock_frontend();
    // Wrong base path: the server answers 404 with a non-JSON body.
    let client = FrontendClient::new(&format!("{base}/api"));
    let err = client
        .user_login(&UserLogin::new("alice", "pw"), None, false)
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
}
