//! Tests for session token retrieval

mod common;

use common::{create_session, create_test_server, register};

/// Test: an inactive account cannot retrieve a token
#[tokio::test]
async fn test_retrieve_inactive_account() {
    let (server, mailer) = create_test_server();
    register(&server, &mailer, "inactive@example.com", "pw1").await;

    let response = server
        .post("/retrieve")
        .form(&[("email", "inactive@example.com"), ("password", "pw1")])
        .await;

    assert_eq!(response.status_code(), 404);
    assert_eq!(response.text(), "Not Found");
}

/// Test: wrong password and unknown email both give 404
#[tokio::test]
async fn test_retrieve_bad_credentials() {
    let (server, mailer) = create_test_server();
    create_session(&server, &mailer, "a@example.com", "pw1").await;

    let wrong_password = server
        .post("/retrieve")
        .form(&[("email", "a@example.com"), ("password", "pw2")])
        .await;
    assert_eq!(wrong_password.status_code(), 404);

    let unknown = server
        .post("/retrieve")
        .form(&[("email", "b@example.com"), ("password", "pw1")])
        .await;
    assert_eq!(unknown.status_code(), 404);
    assert_eq!(unknown.text(), wrong_password.text());
}

/// Test: each retrieve issues a fresh token
#[tokio::test]
async fn test_retrieve_issues_fresh_tokens() {
    let (server, mailer) = create_test_server();
    let first = create_session(&server, &mailer, "a@example.com", "pw1").await;

    let response = server
        .post("/retrieve")
        .form(&[("email", "a@example.com"), ("password", "pw1")])
        .await;
    assert_eq!(response.status_code(), 200);

    let second = response.text();
    assert!(!first.is_empty());
    assert_ne!(first, second);
}

/// Test: characters appended past the bcrypt limit do not log in
#[tokio::test]
async fn test_retrieve_overlong_password() {
    let (server, mailer) = create_test_server();
    let password = "p".repeat(72);
    create_session(&server, &mailer, "long@example.com", &password).await;

    let appended = format!("{}X", password);
    let response = server
        .post("/retrieve")
        .form(&[("email", "long@example.com"), ("password", appended.as_str())])
        .await;

    assert_eq!(response.status_code(), 404);
    assert_eq!(response.text(), "Not Found");
}

/// Test: an unreadable body is answered like bad credentials
#[tokio::test]
async fn test_retrieve_unreadable_form() {
    let (server, mailer) = create_test_server();
    create_session(&server, &mailer, "a@example.com", "pw1").await;

    let json = server
        .post("/retrieve")
        .json(&serde_json::json!({ "email": "a@example.com", "password": "pw1" }))
        .await;
    assert_eq!(json.status_code(), 404);
    assert_eq!(json.text(), "Not Found");

    let duplicated = server
        .post("/retrieve")
        .form(&[("email", "a@example.com"), ("email", "a@example.com"), ("password", "pw1")])
        .await;
    assert_eq!(duplicated.status_code(), 404);
}
