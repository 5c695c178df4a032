// ═══════════════════════════════════════════════════════════════════
// Session Tests — identity lifecycle, token handling, change-only
// notification
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use tourbook_core::api::auth::{AuthApi, LoginResponse, NewAccount};
use tourbook_core::api::http::{MemoryTokenStore, TokenStore};
use tourbook_core::errors::CoreError;
use tourbook_core::models::user::User;
use tourbook_core::session::Session;

fn sample_user() -> User {
    User {
        id: "U1".into(),
        name: "Alice".into(),
        email: "alice@example.com".into(),
        role: Some("user".into()),
        phone: None,
        address: None,
        is_active: Some(true),
    }
}

struct RecordingAuthApi {
    user: User,
    reject_me: bool,
    calls: Mutex<Vec<String>>,
}

impl RecordingAuthApi {
    fn new(user: User) -> Self {
        Self {
            user,
            reject_me: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthApi for RecordingAuthApi {
    async fn login(&self, email: &str, _password: &str) -> Result<LoginResponse, CoreError> {
        self.calls.lock().unwrap().push(format!("login {email}"));
        Ok(LoginResponse {
            token: "token-123".into(),
            user: self.user.clone(),
        })
    }

    async fn register(&self, account: &NewAccount) -> Result<User, CoreError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("register {}", account.email));
        Ok(self.user.clone())
    }

    async fn me(&self) -> Result<User, CoreError> {
        self.calls.lock().unwrap().push("me".into());
        if self.reject_me {
            return Err(CoreError::Api {
                status: 401,
                message: "Token expired".into(),
            });
        }
        Ok(self.user.clone())
    }
}

fn session_with(api: RecordingAuthApi) -> (Arc<Session>, Arc<RecordingAuthApi>, Arc<MemoryTokenStore>) {
    let api = Arc::new(api);
    let tokens = Arc::new(MemoryTokenStore::new());
    let session = Arc::new(Session::new(
        Arc::clone(&api) as Arc<dyn AuthApi>,
        Arc::clone(&tokens) as Arc<dyn TokenStore>,
    ));
    (session, api, tokens)
}

#[tokio::test]
async fn login_stores_token_and_identity() {
    let (session, _, tokens) = session_with(RecordingAuthApi::new(sample_user()));
    assert!(!session.is_authenticated());

    let user = session.login("alice@example.com", "pw").await.expect("login");

    assert_eq!(user.id, "U1");
    assert!(session.is_authenticated());
    assert_eq!(tokens.get().as_deref(), Some("token-123"));
    assert_eq!(session.current_user().expect("user").email, "alice@example.com");
}

#[tokio::test]
async fn logout_drops_token_and_identity() {
    let (session, _, tokens) = session_with(RecordingAuthApi::new(sample_user()));
    session.login("alice@example.com", "pw").await.expect("login");

    session.logout();

    assert!(!session.is_authenticated());
    assert!(tokens.get().is_none());
}

#[tokio::test]
async fn register_logs_straight_in() {
    let (session, api, _) = session_with(RecordingAuthApi::new(sample_user()));

    let user = session
        .register(NewAccount {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password: "pw".into(),
            phone: None,
            address: None,
        })
        .await
        .expect("register");

    assert_eq!(user.id, "U1");
    assert!(session.is_authenticated());
    let calls = api.calls();
    assert_eq!(calls[0], "register alice@example.com");
    assert_eq!(calls[1], "login alice@example.com");
}

#[tokio::test]
async fn restore_without_token_is_a_noop() {
    let (session, api, _) = session_with(RecordingAuthApi::new(sample_user()));

    let restored = session.restore().await.expect("restore");

    assert!(restored.is_none());
    assert!(api.calls().is_empty(), "no me() call without a token");
}

#[tokio::test]
async fn restore_resolves_stored_token() {
    let (session, _, tokens) = session_with(RecordingAuthApi::new(sample_user()));
    tokens.set("token-from-last-run");

    let restored = session.restore().await.expect("restore");

    assert_eq!(restored.expect("user").id, "U1");
    assert!(session.is_authenticated());
    assert!(!session.is_loading());
}

#[tokio::test]
async fn restore_clears_a_rejected_token() {
    let mut api = RecordingAuthApi::new(sample_user());
    api.reject_me = true;
    let (session, _, tokens) = session_with(api);
    tokens.set("stale-token");

    let err = session.restore().await.unwrap_err();

    assert!(matches!(err, CoreError::Api { status: 401, .. }));
    assert!(tokens.get().is_none(), "stale token discarded");
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn subscribers_fire_once_per_identity_change() {
    let (session, _, _) = session_with(RecordingAuthApi::new(sample_user()));
    let events: Arc<Mutex<Vec<bool>>> = Arc::new(Mutex::new(Vec::new()));
    let events_sub = Arc::clone(&events);
    session.subscribe(move |user| {
        events_sub.lock().unwrap().push(user.is_some());
    });

    session.login("alice@example.com", "pw").await.expect("login");
    // Same identity again: no transition, no event.
    session.login("alice@example.com", "pw").await.expect("login");
    session.logout();
    // Already logged out: no second event.
    session.logout();

    assert_eq!(*events.lock().unwrap(), vec![true, false]);
}

#[tokio::test]
async fn unsubscribed_callbacks_stay_silent() {
    let (session, _, _) = session_with(RecordingAuthApi::new(sample_user()));
    let count = Arc::new(Mutex::new(0usize));
    let count_sub = Arc::clone(&count);
    let id = session.subscribe(move |_| {
        *count_sub.lock().unwrap() += 1;
    });

    assert!(session.unsubscribe(id));
    session.login("alice@example.com", "pw").await.expect("login");

    assert_eq!(*count.lock().unwrap(), 0);
}
