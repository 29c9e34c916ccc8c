use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use chrono::{Duration, Utc};
use findexium_engine::{db_types::Role, AuthApi};
use serde_json::json;

use super::{
    helpers::{account, bearer, claims, issue_token, issue_token_with_expiry, send, token_issuer},
    mocks::MockAuthManager,
};
use crate::{
    data_objects::LoginResponse,
    routes::{health, LoginRoute, LogoutRoute},
};

const INVALID_CREDENTIALS: &str = r#"{"error":"Authentication Error. Invalid email or password."}"#;

/// A credential store holding a single user, test@test.com / Password123!, with the given roles.
fn single_user_store(roles: Vec<Role>) -> MockAuthManager {
    let mut store = MockAuthManager::new();
    store.expect_find_user_by_email().returning(|email| {
        Ok((email == "test@test.com").then(|| account("7", "test@test.com", "tester")))
    });
    store.expect_check_password().returning(|id, password| Ok(id.as_str() == "7" && password == "Password123!"));
    store.expect_fetch_roles_for_user().returning(move |_| Ok(roles.clone()));
    store
}

fn configure_app(store: MockAuthManager) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(AuthApi::new(store)))
            .app_data(web::Data::new(token_issuer()))
            .service(health)
            .service(LoginRoute::<MockAuthManager>::new())
            .service(LogoutRoute::new());
    }
}

fn login_request(body: serde_json::Value) -> TestRequest {
    TestRequest::post().uri("/auth/login").set_json(body)
}

#[actix_web::test]
async fn health_check() {
    let _ = env_logger::try_init().ok();
    let reply = send(TestRequest::get().uri("/health"), configure_app(MockAuthManager::new())).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, "👍️\n");
}

#[actix_web::test]
async fn admin_login_issues_token_with_roles() {
    let _ = env_logger::try_init().ok();
    let store = single_user_store(vec![Role::Admin]);
    let body = json!({"email": "test@test.com", "password": "Password123!"});
    let reply = send(login_request(body), configure_app(store)).await;
    assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
    let LoginResponse { token } = reply.json();
    assert!(!token.is_empty());
    let claims = token_issuer().validate_token(&token).expect("issued token is valid");
    assert_eq!(claims.username, "tester");
    assert_eq!(claims.user_id.as_str(), "7");
    assert_eq!(claims.roles, vec![Role::Admin]);
}

#[actix_web::test]
async fn token_carries_every_role() {
    let store = single_user_store(vec![Role::Admin, Role::User]);
    let body = json!({"email": "test@test.com", "password": "Password123!"});
    let reply = send(login_request(body), configure_app(store)).await;
    let LoginResponse { token } = reply.json();
    let claims = token_issuer().validate_token(&token).unwrap();
    assert_eq!(claims.roles, vec![Role::Admin, Role::User]);
}

#[actix_web::test]
async fn unknown_email_and_wrong_password_look_the_same() {
    let _ = env_logger::try_init().ok();
    let body = json!({"email": "nobody@test.com", "password": "Password123!"});
    let unknown = send(login_request(body), configure_app(single_user_store(vec![Role::User]))).await;
    let body = json!({"email": "test@test.com", "password": "Password123?"});
    let wrong = send(login_request(body), configure_app(single_user_store(vec![Role::User]))).await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.body, INVALID_CREDENTIALS);
    assert_eq!(wrong.body, unknown.body);
}

#[actix_web::test]
async fn empty_credentials_never_reach_the_store() {
    let _ = env_logger::try_init().ok();
    for body in [
        json!({"email": "", "password": "Password123!"}),
        json!({"email": "test@test.com", "password": ""}),
        json!({"email": "   ", "password": "Password123!"}),
        json!({"email": "test@test.com"}),
        json!({}),
    ] {
        let mut store = MockAuthManager::new();
        store.expect_find_user_by_email().never();
        store.expect_check_password().never();
        let reply = send(login_request(body.clone()), configure_app(store)).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST, "{body}: {}", reply.body);
        assert_eq!(reply.body, r#"{"error":"Authentication Error. Email and password are required."}"#);
    }
}

#[actix_web::test]
async fn malformed_login_body() {
    let mut store = MockAuthManager::new();
    store.expect_find_user_by_email().never();
    let req = TestRequest::post()
        .uri("/auth/login")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"email\": \"test@test.com\", ");
    let reply = send(req, configure_app(store)).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.body.starts_with(r#"{"error":"Could not read request body"#), "{}", reply.body);
}

#[actix_web::test]
async fn logout_requires_a_token() {
    let reply = send(TestRequest::post().uri("/auth/logout"), configure_app(MockAuthManager::new())).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body, r#"{"error":"Authentication Error. A valid bearer token is required."}"#);
}

#[actix_web::test]
async fn logout_with_token() {
    let token = issue_token(claims("7", "tester", &[Role::User]));
    let req = TestRequest::post().uri("/auth/logout").insert_header(bearer(&token));
    let reply = send(req, configure_app(MockAuthManager::new())).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, r#"{"message":"Logged out."}"#);
}

#[actix_web::test]
async fn expired_token_is_rejected() {
    let expired = issue_token_with_expiry(claims("7", "tester", &[Role::Admin]), Utc::now() - Duration::minutes(1));
    let req = TestRequest::post().uri("/auth/logout").insert_header(bearer(&expired));
    let reply = send(req, configure_app(MockAuthManager::new())).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn token_from_another_server_is_rejected() {
    let other = crate::config::AuthConfig::new(
        fdx_common::Secret::new("a-completely-different-secret-for-another-server".into()),
        "findexium-tests",
        "findexium-test-clients",
        Duration::minutes(30),
    )
    .unwrap();
    let token = crate::auth::TokenIssuer::new(&other).issue_token(claims("7", "tester", &[Role::Admin])).unwrap();
    let req = TestRequest::post().uri("/auth/logout").insert_header(bearer(&token));
    let reply = send(req, configure_app(MockAuthManager::new())).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}
