mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::{
    expired_token, generate_name, generate_unique_email, setup_test_app, token, token_for,
};
use intervue::intervue_auth::Role;
use serde_json::json;

#[tokio::test]
async fn test_register_then_login_then_me() {
    let app = setup_test_app();
    let email = generate_unique_email();
    let name = generate_name();

    let (status, body) = app
        .post_json(
            "/api/auth/register",
            None,
            json!({ "name": name, "email": email, "password": "correct-horse" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["role"], "candidate");
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert!(body["data"]["user"].get("password_hash").is_none());

    let (status, body) = app
        .post_json(
            "/api/auth/login",
            None,
            json!({ "email": email.to_uppercase(), "password": "correct-horse" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let access_token = body["data"]["access_token"].as_str().unwrap().to_string();
    let user_id = body["data"]["user"]["id"].as_str().unwrap().to_string();

    let (status, body) = app.get("/api/auth/me", Some(&access_token)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["principal"]["subject"], user_id);
    assert_eq!(body["data"]["principal"]["role"], "candidate");
    assert_eq!(body["data"]["user"]["email"], email.to_lowercase());
}

#[tokio::test]
async fn test_register_normalizes_email_and_role() {
    let app = setup_test_app();

    let (status, body) = app
        .post_json(
            "/api/auth/register",
            None,
            json!({
                "name": "  Ada Lovelace  ",
                "email": "  Ada.Lovelace@Example.COM ",
                "password": "analytical-engine",
                "role": " Interviewer "
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["user"]["name"], "Ada Lovelace");
    assert_eq!(body["data"]["user"]["email"], "ada.lovelace@example.com");
    assert_eq!(body["data"]["user"]["role"], "interviewer");
}

#[tokio::test]
async fn test_register_cannot_self_assign_admin() {
    let app = setup_test_app();

    let (status, body) = app
        .post_json(
            "/api/auth/register",
            None,
            json!({
                "name": "Mallory",
                "email": generate_unique_email(),
                "password": "password123",
                "role": "admin"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "role");
}

#[tokio::test]
async fn test_short_password_reports_single_violation() {
    let app = setup_test_app();

    let (status, body) = app
        .post_json(
            "/api/auth/register",
            None,
            json!({ "name": "Valid Name", "email": generate_unique_email(), "password": "12345" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "validation_failed");
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["field"], "password");
}

#[tokio::test]
async fn test_register_reports_every_bad_field_at_once() {
    let app = setup_test_app();

    let (status, body) = app
        .post_json(
            "/api/auth/register",
            None,
            json!({ "name": "A", "email": "not-an-email", "password": "short" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "email", "password"]);
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = setup_test_app();
    let email = generate_unique_email();
    let payload = json!({ "name": "First User", "email": email, "password": "password123" });

    let (status, _) = app.post_json("/api/auth/register", None, payload.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.post_json("/api/auth/register", None, payload).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "conflict");
    assert!(body["message"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let app = setup_test_app();
    let email = generate_unique_email();
    app.post_json(
        "/api/auth/register",
        None,
        json!({ "name": "Real User", "email": email, "password": "password123" }),
    )
    .await;

    for (email, password) in [
        (email.as_str(), "wrong-password"),
        ("nobody@example.com", "password123"),
    ] {
        let (status, body) = app
            .post_json(
                "/api/auth/login",
                None,
                json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid email or password.");
    }
}

#[tokio::test]
async fn test_login_missing_fields() {
    let app = setup_test_app();

    let (status, body) = app.post_json("/api/auth/login", None, json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0]["message"], "email is required");
    assert_eq!(errors[1]["message"], "password is required");
}

#[tokio::test]
async fn test_missing_content_type_is_a_body_violation() {
    let app = setup_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .body(Body::from(r#"{"email":"a@b.co","password":"x"}"#))
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "body");
    assert_eq!(
        body["errors"][0]["message"],
        "Missing 'Content-Type: application/json' header"
    );
}

#[tokio::test]
async fn test_malformed_json_is_a_body_violation() {
    let app = setup_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "body");
}

#[tokio::test]
async fn test_me_without_token() {
    let app = setup_test_app();

    let (status, body) = app.get("/api/auth/me", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "unauthenticated");
    assert_eq!(body["message"], "Access denied. No token provided.");
}

#[tokio::test]
async fn test_me_with_expired_token() {
    let app = setup_test_app();

    let (status, body) = app.get("/api/auth/me", Some(&expired_token(Role::Candidate))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token has expired. Please login again.");
}

#[tokio::test]
async fn test_me_with_tampered_token() {
    let app = setup_test_app();
    // Candidate claims carrying the signature of an admin token.
    let candidate = token_for("user-1", Role::Candidate);
    let admin = token_for("user-1", Role::Admin);
    let (signed_part, _) = candidate.rsplit_once('.').unwrap();
    let (_, admin_signature) = admin.rsplit_once('.').unwrap();
    let tampered = format!("{signed_part}.{admin_signature}");

    let (status, body) = app.get("/api/auth/me", Some(&tampered)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token. Please login again.");
}

#[tokio::test]
async fn test_token_without_bearer_prefix_counts_as_missing() {
    let app = setup_test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, token(Role::Admin))
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Access denied. No token provided.");
}

#[tokio::test]
async fn test_me_for_operator_token_without_account() {
    let app = setup_test_app();

    let (status, body) = app
        .get("/api/auth/me", Some(&token_for("ops-bot", Role::Admin)))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["principal"]["subject"], "ops-bot");
    assert!(body["data"]["user"].is_null());
}
