use std::sync::Arc;

use civicdesk_core::api::HttpAuthService;
use civicdesk_core::storage::MemoryStorage;
use civicdesk_core::{
    AuthErrorKind, AuthService, Credentials, RegistrationInfo, Role, Route, RouteHistory,
    SessionStore,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn login_decodes_data_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"email": "user@example.com", "password": "password123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "user": {"id": 1, "name": "John Doe", "email": "user@example.com", "role": "user"},
                "token": "jwt-from-server"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = HttpAuthService::new(server.uri()).unwrap();
    let response = service
        .login(&Credentials::new("user@example.com", "password123"))
        .await
        .unwrap();

    assert_eq!(response.user.id, 1);
    assert_eq!(response.user.role, Role::User);
    assert_eq!(response.token, "jwt-from-server");
}

#[tokio::test]
async fn login_rejection_surfaces_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"message": "Invalid credentials. Please try again."})),
        )
        .mount(&server)
        .await;

    let routes = Arc::new(RouteHistory::new());
    let storage = Arc::new(MemoryStorage::new());
    let store = SessionStore::new(
        Arc::new(HttpAuthService::new(server.uri()).unwrap()),
        storage.clone(),
        routes.clone(),
    );

    let err = store
        .login(&Credentials::new("x@x.com", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), AuthErrorKind::InvalidCredentials);
    assert_eq!(err.message(), "Invalid credentials. Please try again.");
    assert!(!store.is_authenticated());
    assert!(routes.is_empty());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn register_posts_all_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(json!({
            "name": "City Works Dept",
            "email": "works@city.gov",
            "password": "s3cret",
            "role": "agency"
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"data": {"message": "Welcome aboard"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let routes = Arc::new(RouteHistory::new());
    let store = SessionStore::new(
        Arc::new(HttpAuthService::new(server.uri()).unwrap()),
        Arc::new(MemoryStorage::new()),
        routes.clone(),
    );
    let info = RegistrationInfo {
        name: "City Works Dept".to_string(),
        email: "works@city.gov".to_string(),
        password: "s3cret".to_string(),
        role: Role::Agency,
    };

    let message = store.register(&info).await.unwrap();

    assert_eq!(message, "Welcome aboard");
    assert_eq!(routes.history(), vec![Route::Login]);
}

#[tokio::test]
async fn register_rejection_is_registration_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"message": "Email already registered"})),
        )
        .mount(&server)
        .await;

    let routes = Arc::new(RouteHistory::new());
    let storage = Arc::new(MemoryStorage::new());
    let store = SessionStore::new(
        Arc::new(HttpAuthService::new(server.uri()).unwrap()),
        storage.clone(),
        routes.clone(),
    );
    let info = RegistrationInfo {
        name: "A".to_string(),
        email: "a@b.com".to_string(),
        password: "p".to_string(),
        role: Role::User,
    };

    let err = store.register(&info).await.unwrap_err();

    assert_eq!(err.kind(), AuthErrorKind::RegistrationFailed);
    assert_eq!(err.message(), "Email already registered");
    assert!(!store.is_authenticated());
    assert!(routes.is_empty());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn malformed_success_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "no envelope"})))
        .mount(&server)
        .await;

    let service = HttpAuthService::new(server.uri()).unwrap();
    let err = service
        .login(&Credentials::new("user@example.com", "password123"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), AuthErrorKind::InvalidResponse);
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    // Port 9 (discard) on localhost is not expected to accept HTTP.
    let service = HttpAuthService::new("http://127.0.0.1:9").unwrap();
    let err = service
        .login(&Credentials::new("user@example.com", "password123"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), AuthErrorKind::Network);
}
