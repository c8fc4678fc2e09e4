//! Login, logout and registration against a mock user service

use gallery_core::{
    AuthSession, ClientError, Credentials, KeyValueStore, LoginOutcome, MemoryStorage,
    Registration, SessionConfig, User, UserId,
};
use serde_json::json;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Log sink shared between the subscriber and the test body
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn session_for(server: &MockServer, storage: MemoryStorage) -> AuthSession<MemoryStorage> {
    init_tracing();
    let config = SessionConfig::default().with_base_url(server.uri());
    let session = AuthSession::new(config, storage).unwrap();
    session.bootstrap();
    session
}

fn credentials() -> Credentials {
    Credentials::new("a@b.com", "pw")
}

fn user_body() -> serde_json::Value {
    json!({
        "userid": "u1",
        "email": "a@b.com",
        "firstName": "A",
        "lastName": "B",
        "fullName": "A B"
    })
}

#[tokio::test]
async fn test_login_success_updates_session_and_storage() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"email": "a@b.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let storage = MemoryStorage::new();
    let session = session_for(&mock_server, storage.clone());

    assert!(session.login(&credentials()).await);

    let expected = User::from_value(user_body()).unwrap();
    assert_eq!(session.user(), Some(expected.clone()));

    let stored = storage.get("user").unwrap().expect("record persisted");
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&stored).unwrap(),
        user_body()
    );
    assert_eq!(User::from_json(&stored).unwrap(), expected);
}

#[tokio::test]
async fn test_login_drops_extra_fields_from_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userid": 12,
            "email": "a@b.com",
            "firstName": "A",
            "lastName": "B",
            "fullName": "A B",
            "password": "$2a$10$hash",
            "phone": "555-0100"
        })))
        .mount(&mock_server)
        .await;

    let storage = MemoryStorage::new();
    let session = session_for(&mock_server, storage.clone());

    let outcome = session.try_login(&credentials()).await;
    assert_eq!(outcome.user().unwrap().user_id, UserId::from(12));

    let stored = storage.get("user").unwrap().unwrap();
    assert!(!stored.contains("password"));
    assert!(!stored.contains("phone"));
    assert!(stored.contains(r#""userid":12"#));
}

#[tokio::test]
async fn test_login_accepts_any_nonzero_numeric_id() {
    for (body, stored_id) in [
        (r#"{"userid":1.5,"email":"a@b.com"}"#, r#""userid":1.5"#),
        (
            r#"{"userid":9223372036854775808,"email":"a@b.com"}"#,
            r#""userid":9223372036854775808"#,
        ),
    ] {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let storage = MemoryStorage::new();
        let session = session_for(&mock_server, storage.clone());

        assert!(session.login(&credentials()).await, "login rejected {body}");
        assert!(session.user().is_some());
        let stored = storage.get("user").unwrap().expect("record persisted");
        assert!(stored.contains(stored_id), "stored {stored}");
    }
}

#[tokio::test]
async fn test_login_unauthorized_changes_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"error": "Invalid email or password"}"#),
        )
        .mount(&mock_server)
        .await;

    let storage = MemoryStorage::new();
    let session = session_for(&mock_server, storage.clone());

    assert!(!session.login(&credentials()).await);
    assert_eq!(session.user(), None);
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_wrong_password_logs_without_error_or_email() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;
    let session = session_for(&mock_server, MemoryStorage::new());

    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    assert_eq!(
        session.try_login(&credentials()).await,
        LoginOutcome::InvalidCredentials
    );

    let output = logs.contents();
    assert!(output.contains("invalid credentials"), "logs: {output}");
    assert!(!output.contains("ERROR"), "logs: {output}");
    assert!(!output.contains("a@b.com"), "logs: {output}");
}

#[tokio::test]
async fn test_failed_login_keeps_existing_user() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let previous = r#"{"userid":"u0","email":"old@b.com"}"#;
    let storage = MemoryStorage::with_entry("user", previous);
    let session = session_for(&mock_server, storage.clone());
    let before = session.user();
    assert!(before.is_some());

    assert_eq!(
        session.try_login(&credentials()).await,
        LoginOutcome::InvalidCredentials
    );
    assert_eq!(session.user(), before);
    assert_eq!(storage.get("user").unwrap().as_deref(), Some(previous));
}

#[tokio::test]
async fn test_login_empty_body_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let storage = MemoryStorage::new();
    let session = session_for(&mock_server, storage.clone());

    let outcome = session.try_login(&credentials()).await;
    assert!(matches!(outcome, LoginOutcome::MalformedResponse(_)));
    assert!(!session.login(&credentials()).await);
    assert_eq!(session.user(), None);
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_login_non_json_body_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let session = session_for(&mock_server, MemoryStorage::new());
    assert!(matches!(
        session.try_login(&credentials()).await,
        LoginOutcome::MalformedResponse(_)
    ));
    assert_eq!(session.user(), None);
}

#[tokio::test]
async fn test_login_requires_exactly_200() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(201).set_body_json(user_body()))
        .mount(&mock_server)
        .await;

    let storage = MemoryStorage::new();
    let session = session_for(&mock_server, storage.clone());

    let outcome = session.try_login(&credentials()).await;
    assert!(matches!(
        outcome,
        LoginOutcome::Rejected { status: 201, .. }
    ));
    assert_eq!(session.user(), None);
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_login_server_error_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string(r#"{"error": "database offline"}"#),
        )
        .mount(&mock_server)
        .await;

    let session = session_for(&mock_server, MemoryStorage::new());
    assert_eq!(
        session.try_login(&credentials()).await,
        LoginOutcome::Rejected {
            status: 500,
            message: "database offline".to_string()
        }
    );
}

#[tokio::test]
async fn test_login_network_failure() {
    init_tracing();
    // Nothing listens on the discard port
    let config = SessionConfig::default()
        .with_base_url("http://127.0.0.1:9")
        .with_timeout_secs(5);
    let storage = MemoryStorage::new();
    let session = AuthSession::new(config, storage.clone()).unwrap();
    session.bootstrap();

    let outcome = session.try_login(&credentials()).await;
    assert!(matches!(outcome, LoginOutcome::NetworkError(_)));
    assert_eq!(session.user(), None);
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_login_then_logout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .mount(&mock_server)
        .await;

    let storage = MemoryStorage::new();
    let session = session_for(&mock_server, storage.clone());

    assert!(session.login(&credentials()).await);
    assert!(storage.contains_key("user"));

    session.logout();
    assert_eq!(session.user(), None);
    assert!(!storage.contains_key("user"));
}

#[tokio::test]
async fn test_persisted_login_survives_reload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .mount(&mock_server)
        .await;

    let storage = MemoryStorage::new();
    let first = session_for(&mock_server, storage.clone());
    assert!(first.login(&credentials()).await);
    let signed_in = first.user();
    drop(first);

    // A fresh session over the same storage is what a page reload looks like
    let reloaded = AuthSession::new(
        SessionConfig::default().with_base_url(mock_server.uri()),
        storage,
    )
    .unwrap();
    assert!(reloaded.is_initializing());
    let snapshot = reloaded.bootstrap();
    assert_eq!(snapshot.user, signed_in);
    assert!(!snapshot.initializing);
}

#[tokio::test]
async fn test_concurrent_logins_are_serialized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .and(body_json(json!({"email": "first@b.com", "password": "pw"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"userid": "first", "email": "first@b.com"}))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .and(body_json(json!({"email": "second@b.com", "password": "pw"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"userid": "second", "email": "second@b.com"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let storage = MemoryStorage::new();
    let session = session_for(&mock_server, storage.clone());

    let first = Credentials::new("first@b.com", "pw");
    let second = Credentials::new("second@b.com", "pw");
    let (a, b) = tokio::join!(session.login(&first), session.login(&second));
    assert!(a && b);

    // The slow first response must not overwrite the second login
    assert_eq!(session.user().unwrap().user_id, UserId::from("second"));
    let stored = storage.get("user").unwrap().unwrap();
    assert!(stored.contains(r#""userid":"second""#));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let first_sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(first_sent["email"], "first@b.com");
}

#[tokio::test]
async fn test_login_notifies_subscribers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .mount(&mock_server)
        .await;

    let session = session_for(&mock_server, MemoryStorage::new());
    let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    {
        let seen = seen.clone();
        session.subscribe(move |snapshot| seen.borrow_mut().push(snapshot.is_authenticated()));
    }

    assert!(session.login(&credentials()).await);
    session.logout();
    assert_eq!(*seen.borrow(), vec![true, false]);
}

#[tokio::test]
async fn test_register_posts_registration() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/register"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Succes"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let storage = MemoryStorage::new();
    let session = session_for(&mock_server, storage.clone());

    let registration = Registration {
        first_name: "A".into(),
        last_name: "B".into(),
        full_name: "A B".into(),
        email: "a@b.com".into(),
        password: "pw".into(),
        zip_code: "75001".into(),
        ..Default::default()
    };
    session.register(&registration).await.unwrap();

    // Registering does not sign in
    assert_eq!(session.user(), None);
    assert!(storage.is_empty());

    let requests = mock_server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["fullName"], "A B");
    assert_eq!(sent["zipCode"], "75001");
}

#[tokio::test]
async fn test_register_failure_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/register"))
        .respond_with(ResponseTemplate::new(500).set_body_string("duplicate email"))
        .mount(&mock_server)
        .await;

    let session = session_for(&mock_server, MemoryStorage::new());
    let result = session.register(&Registration::default()).await;
    assert!(matches!(
        result,
        Err(ClientError::UnexpectedStatus { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_client_requires_base_url() {
    let config = SessionConfig::default().with_base_url("");
    let result = AuthSession::new(config, MemoryStorage::new());
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}
