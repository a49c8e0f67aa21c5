//! Mock API tests for sesame-http.
//!
//! These tests use wiremock to simulate the REST backend.

use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sesame_core::error::{Error, TransportError};
use sesame_core::{AccessToken, ApiUrl, AuthApi, Credentials, RefreshToken, Registration};
use sesame_http::{AuthRepository, HttpClient, NewUser, RequestOptions, UserPatch, UserRepository};

fn http_for(server: &MockServer) -> HttpClient {
    HttpClient::new(ApiUrl::new(server.uri()).unwrap()).unwrap()
}

fn login_body() -> Value {
    json!({
        "user": {"id": "u1", "email": "alice@example.com", "name": "Alice", "token": "t1"},
        "token": "t1",
        "refreshToken": "r1"
    })
}

// ============================================================================
// HTTP client
// ============================================================================

#[tokio::test]
async fn test_get_sends_query_and_per_call_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("page", "2"))
        .and(header("x-trace", "abc"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
        .mount(&server)
        .await;

    let options = RequestOptions::new()
        .param("page", 2)
        .header("x-trace", "abc")
        .unwrap();
    let items: Vec<u32> = http_for(&server).get("/items", &options).await.unwrap();

    assert_eq!(items, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_per_call_header_overrides_default() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/plain"))
        .and(header("content-type", "text/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("ok")))
        .mount(&server)
        .await;

    let options = RequestOptions::new()
        .header("content-type", "text/plain")
        .unwrap();
    let body: String = http_for(&server).get("plain", &options).await.unwrap();

    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_absolute_endpoint_bypasses_base() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pong": true})))
        .mount(&server)
        .await;

    // The base points nowhere; only the absolute endpoint can reach the mock.
    let http = HttpClient::new(ApiUrl::new("http://127.0.0.1:9").unwrap()).unwrap();
    let body: Value = http
        .get(&format!("{}/ping", server.uri()), &RequestOptions::new())
        .await
        .unwrap();

    assert_eq!(body, json!({"pong": true}));
}

#[tokio::test]
async fn test_non_success_passes_status_and_body_through() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/things"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"mensaje": "server down"})))
        .mount(&server)
        .await;

    let result: Result<Value, Error> = http_for(&server)
        .post("/things", &json!({"a": 1}), &RequestOptions::new())
        .await;

    match result {
        Err(Error::Api(api)) => {
            assert_eq!(api.status, 500);
            assert_eq!(api.body, Some(json!({"mensaje": "server down"})));
            assert_eq!(api.message(), Some("server down"));
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_error_body_is_dropped() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/things/1"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let result: Result<Value, Error> = http_for(&server)
        .delete("/things/1", &RequestOptions::new())
        .await;

    match result {
        Err(Error::Api(api)) => {
            assert_eq!(api.status, 404);
            assert!(api.body.is_none());
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_success_body_decodes_as_unit() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/things/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let result: Result<(), Error> = http_for(&server)
        .put("/things/1", &json!({"a": 1}), &RequestOptions::new())
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_delete_with_body_sends_json() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/things/1"))
        .and(header("x-reason", "cleanup"))
        .and(body_json(json!({"reason": "duplicate"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let options = RequestOptions::new().header("x-reason", "cleanup").unwrap();
    let result: Value = http_for(&server)
        .delete_with_body("/things/1", &json!({"reason": "duplicate"}), &options)
        .await
        .unwrap();

    assert_eq!(result["deleted"], 1);
}

#[tokio::test]
async fn test_per_call_timeout_wins() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!(true))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let options = RequestOptions::new().timeout(Duration::from_millis(50));
    let result: Result<bool, Error> = http_for(&server).get("/slow", &options).await;

    match result {
        Err(Error::Transport(TransportError::Timeout { duration_ms })) => {
            assert_eq!(duration_ms, 50);
        }
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_failure_is_transport_error() {
    let http = HttpClient::new(ApiUrl::new("http://127.0.0.1:9").unwrap()).unwrap();
    let result: Result<Value, Error> = http.get("/x", &RequestOptions::new()).await;
    assert!(matches!(result, Err(Error::Transport(_))));
}

// ============================================================================
// Authentication repository
// ============================================================================

#[tokio::test]
async fn test_login_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/seguridad/login/"))
        .and(body_json(json!({
            "email": "alice@example.com",
            "password": "secret123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body()))
        .mount(&server)
        .await;

    let repo = AuthRepository::new(http_for(&server));
    let user = repo
        .login(&Credentials::new("alice@example.com", "secret123"))
        .await
        .unwrap();

    assert_eq!(user.id, "u1");
    assert_eq!(user.name, "Alice");
    assert_eq!(user.token.as_str(), "t1");
    assert_eq!(user.refresh_token.unwrap().as_str(), "r1");
}

#[tokio::test]
async fn test_login_validation_failure_is_untouched() {
    let server = MockServer::start().await;

    let payload = json!({"validaciones": {"email": ["bad format"]}});
    Mock::given(method("POST"))
        .and(path("/seguridad/login/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(payload.clone()))
        .mount(&server)
        .await;

    let repo = AuthRepository::new(http_for(&server));
    let err = repo
        .login(&Credentials::new("alice@example.com", "secret123"))
        .await
        .unwrap_err();

    match err {
        Error::Api(api) => {
            assert_eq!(api.status, 400);
            assert_eq!(api.body, Some(payload));
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_register_posts_profile() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/seguridad/usuario/nuevo/"))
        .and(body_json(json!({
            "name": "Alice",
            "email": "alice@example.com",
            "password": "secret123"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(login_body()))
        .mount(&server)
        .await;

    let repo = AuthRepository::new(http_for(&server));
    let user = repo
        .register(&Registration::new("Alice", "alice@example.com", "secret123"))
        .await
        .unwrap();

    assert_eq!(user.email, "alice@example.com");
}

#[tokio::test]
async fn test_refresh_posts_refresh_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/seguridad/refresh/"))
        .and(body_json(json!({"refreshToken": "r1"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"token": "t2", "refreshToken": "r2"})),
        )
        .mount(&server)
        .await;

    let repo = AuthRepository::new(http_for(&server));
    let pair = repo.refresh(&RefreshToken::new("r1")).await.unwrap();

    assert_eq!(pair.token.as_str(), "t2");
    assert_eq!(pair.refresh_token.unwrap().as_str(), "r2");
}

#[tokio::test]
async fn test_logout_sends_bearer() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/seguridad/logout/"))
        .and(header("authorization", "Bearer t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    let repo = AuthRepository::new(http_for(&server));
    assert!(repo.logout(&AccessToken::new("t1")).await.unwrap());
}

#[tokio::test]
async fn test_forgot_password() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/seguridad/usuario/cambio-clave-solicitar/"))
        .and(body_json(json!({"username": "alice@example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .mount(&server)
        .await;

    let repo = AuthRepository::new(http_for(&server));
    assert!(repo.forgot_password("alice@example.com").await.unwrap());
}

// ============================================================================
// Directory repository
// ============================================================================

fn record(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "username": name.to_lowercase(),
        "email": format!("{}@example.com", name.to_lowercase())
    })
}

#[tokio::test]
async fn test_users_list_and_get() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([record(1, "Ann"), record(2, "Bob")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(record(2, "Bob")))
        .mount(&server)
        .await;

    let repo = UserRepository::new(http_for(&server), "users");
    let users = repo.list().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].name, "Ann");

    let bob = repo.get(2).await.unwrap();
    assert_eq!(bob.username, "bob");
}

#[tokio::test]
async fn test_users_writes_use_bearer() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("authorization", "Bearer t1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(record(11, "Cid")))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/users/11"))
        .and(body_json(json!({"name": "Cyd"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(record(11, "Cyd")))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/users/11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let repo = UserRepository::new(http_for(&server), "/users/").with_token(AccessToken::new("t1"));

    let created = repo
        .create(&NewUser {
            name: "Cid".into(),
            username: "cid".into(),
            email: "cid@example.com".into(),
            phone: None,
            website: None,
        })
        .await
        .unwrap();
    assert_eq!(created.id, 11);

    let patched = repo
        .patch(
            11,
            &UserPatch {
                name: Some("Cyd".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(patched.name, "Cyd");

    repo.delete(11).await.unwrap();
}
