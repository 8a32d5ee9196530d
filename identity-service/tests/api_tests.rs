mod common;

use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;

fn customer_body(username: &str) -> serde_json::Value {
    json!({
        "username": username,
        "email": format!("{}@example.com", username),
        "password": "P@ssw0rd",
        "confirm_password": "P@ssw0rd"
    })
}

#[tokio::test]
async fn test_register_customer_success() {
    let app = TestApp::spawn().await;

    let body = app.register("customer", customer_body("nicola")).await;

    assert_eq!(body["status_code"], 201);
    assert_eq!(body["data"]["username"], "nicola");
    assert_eq!(body["data"]["email"], "nicola@example.com");
    assert_eq!(body["data"]["kind"], "CUSTOMER");
    assert!(body["data"]["id"].is_string());
    assert!(body["data"]["createdAt"].is_string());
    assert!(body["data"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_register_operator_returns_kind_fields() {
    let app = TestApp::spawn().await;

    let body = app
        .register_as_admin(
            "operator",
            json!({
                "username": "dispatcher",
                "email": "dispatch@example.com",
                "password": "P@ssw0rd",
                "confirm_password": "P@ssw0rd",
                "department": "logistics",
                "permissions": ["orders:read", "orders:assign"]
            }),
        )
        .await;

    assert_eq!(body["data"]["kind"], "OPERATOR");
    assert_eq!(body["data"]["department"], "logistics");
    assert_eq!(body["data"]["permissions"][1], "orders:assign");
    assert!(body["data"].get("station").is_none());
}

#[tokio::test]
async fn test_register_duplicate_username_across_kinds() {
    let app = TestApp::spawn().await;
    app.register("customer", customer_body("nicola")).await;
    let admin_token = app.admin_token().await;

    let response = app
        .post_authenticated("/api/auth/register/kitchen", &admin_token)
        .json(&json!({
            "username": "nicola",
            "email": "kitchen@example.com",
            "password": "P@ssw0rd",
            "confirm_password": "P@ssw0rd",
            "station": "grill"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["code"], "DUPLICATE_IDENTITY");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("username"));
}

#[tokio::test]
async fn test_anonymous_admin_registration_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/register/admin")
        .json(&json!({
            "username": "intruder",
            "email": "intruder@example.com",
            "password": "P@ssw0rd",
            "confirm_password": "P@ssw0rd",
            "admin_level": "SUPER"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .get("/api/auth/check-username/intruder")
        .send()
        .await
        .expect("Failed to execute request");
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["available"], true);
}

#[tokio::test]
async fn test_customer_cannot_register_privileged_accounts() {
    let app = TestApp::spawn().await;
    app.register("customer", customer_body("nicola")).await;
    let session = app.login("nicola", "P@ssw0rd").await;
    let token = session["access_token"].as_str().unwrap();

    for kind in ["admin", "operator", "kitchen"] {
        let response = app
            .post_authenticated(&format!("/api/auth/register/{}", kind), token)
            .json(&json!({
                "username": "sneaky1",
                "email": "sneaky@example.com",
                "password": "P@ssw0rd",
                "confirm_password": "P@ssw0rd",
                "admin_level": "SUPER",
                "department": "dispatch",
                "station": "grill"
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{kind}");
    }
}

#[tokio::test]
async fn test_admin_registers_another_admin() {
    let app = TestApp::spawn().await;

    let body = app
        .register_as_admin(
            "admin",
            json!({
                "username": "manager",
                "email": "manager@example.com",
                "password": "P@ssw0rd",
                "confirm_password": "P@ssw0rd",
                "admin_level": "REGIONAL"
            }),
        )
        .await;

    assert_eq!(body["data"]["kind"], "ADMIN");
    assert_eq!(body["data"]["adminLevel"], "REGIONAL");
    app.login("manager", "P@ssw0rd").await;
}

#[tokio::test]
async fn test_register_rejects_invalid_requests() {
    let app = TestApp::spawn().await;
    let admin_token = app.admin_token().await;

    let cases = [
        (
            "customer",
            json!({
                "username": "short",
                "email": "short@example.com",
                "password": "P@ssw0rd",
                "confirm_password": "P@ssw0rd"
            }),
        ),
        (
            "customer",
            json!({
                "username": "nicola",
                "email": "nicola@example.com",
                "password": "P@ssw0rd",
                "confirm_password": "different"
            }),
        ),
        (
            "customer",
            json!({
                "username": "nicola",
                "email": "not-an-email",
                "password": "P@ssw0rd",
                "confirm_password": "P@ssw0rd"
            }),
        ),
        (
            "admin",
            json!({
                "username": "nicola",
                "email": "nicola@example.com",
                "password": "P@ssw0rd",
                "confirm_password": "P@ssw0rd"
            }),
        ),
    ];

    for (kind, body) in cases {
        let response = app
            .post_authenticated(&format!("/api/auth/register/{}", kind), &admin_token)
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "request {body} should be rejected"
        );
    }
}

#[tokio::test]
async fn test_register_unknown_kind() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/register/courier")
        .json(&customer_body("nicola"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::spawn().await;
    app.register("customer", customer_body("nicola")).await;

    let session = app.login("nicola", "P@ssw0rd").await;

    assert!(!session["access_token"].as_str().unwrap().is_empty());
    assert!(!session["refresh_token"].as_str().unwrap().is_empty());
    assert_eq!(session["token_type"], "Bearer");
    assert_eq!(session["expires_in"], common::ACCESS_TTL_SECS);
    assert_eq!(session["user"]["username"], "nicola");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;
    app.register("customer", customer_body("nicola")).await;

    let mut messages = Vec::new();
    for (username, password) in [("nicola", "wrong_password"), ("nobody", "P@ssw0rd")] {
        let response = app
            .post("/api/auth/login")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        messages.push(body["data"]["message"].clone());
    }

    assert_eq!(messages[0], messages[1]);
}

#[tokio::test]
async fn test_validate_reports_validity_in_body() {
    let app = TestApp::spawn().await;
    app.register("customer", customer_body("nicola")).await;
    let session = app.login("nicola", "P@ssw0rd").await;

    let response = app
        .post("/api/auth/validate")
        .json(&json!({ "token": session["access_token"] }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["valid"], true);
    assert_eq!(body["data"]["role"], "CUSTOMER");
    assert_eq!(body["data"]["authorities"][0], "ROLE_CUSTOMER");
    assert_eq!(body["data"]["status"]["enabled"], true);

    let response = app
        .post("/api/auth/validate")
        .json(&json!({ "token": "garbage" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["valid"], false);
    assert_eq!(body["data"]["reason"], "TOKEN_MALFORMED");
}

#[tokio::test]
async fn test_refresh_rotates_and_rejects_replay() {
    let app = TestApp::spawn().await;
    app.register("customer", customer_body("nicola")).await;
    let session = app.login("nicola", "P@ssw0rd").await;

    let response = app
        .post("/api/auth/refresh")
        .json(&json!({ "refresh_token": session["refresh_token"] }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .post("/api/auth/refresh")
        .json(&json!({ "refresh_token": session["refresh_token"] }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["code"], "TOKEN_REVOKED");
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = TestApp::spawn().await;
    app.register("customer", customer_body("nicola")).await;
    let session = app.login("nicola", "P@ssw0rd").await;
    let token = session["access_token"].as_str().unwrap();

    let response = app
        .post_authenticated("/api/auth/logout", token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .post("/api/auth/validate")
        .json(&json!({ "token": token }))
        .send()
        .await
        .expect("Failed to execute request");
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["valid"], false);
    assert_eq!(body["data"]["reason"], "TOKEN_REVOKED");
}

#[tokio::test]
async fn test_logout_without_token() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/logout")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::spawn().await;
    app.register("customer", customer_body("nicola")).await;
    let session = app.login("nicola", "P@ssw0rd").await;
    let token = session["access_token"].as_str().unwrap();

    let response = app
        .post_authenticated("/api/auth/change-password", token)
        .json(&json!({
            "current_password": "wrong_password",
            "new_password": "N3wP@ss",
            "confirm_password": "N3wP@ss"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post_authenticated("/api/auth/change-password", token)
        .json(&json!({
            "current_password": "P@ssw0rd",
            "new_password": "N3wP@ss",
            "confirm_password": "N3wP@ss"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    app.login("nicola", "N3wP@ss").await;
}

#[tokio::test]
async fn test_availability_checks() {
    let app = TestApp::spawn().await;
    app.register("customer", customer_body("nicola")).await;

    for (path, expected) in [
        ("/api/auth/check-username/nicola", false),
        ("/api/auth/check-username/someone", true),
        ("/api/auth/check-email/nicola@example.com", false),
        ("/api/auth/check-email/someone@example.com", true),
    ] {
        let response = app.get(path).send().await.expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["data"]["available"], expected, "{path}");
    }
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/auth/health")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["status"], "UP");
}

#[tokio::test]
async fn test_admin_can_disable_account() {
    let app = TestApp::spawn().await;
    let customer = app.register("customer", customer_body("nicola")).await;

    let customer_session = app.login("nicola", "P@ssw0rd").await;
    let admin_token = app.admin_token().await;
    let path = format!(
        "/api/auth/accounts/{}/status",
        customer["data"]["id"].as_str().unwrap()
    );

    let response = app
        .patch_authenticated(&path, customer_session["access_token"].as_str().unwrap())
        .json(&json!({ "enabled": false }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .patch_authenticated(&path, &admin_token)
        .json(&json!({ "enabled": false }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .post("/api/auth/validate")
        .json(&json!({ "token": customer_session["access_token"] }))
        .send()
        .await
        .expect("Failed to execute request");
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["valid"], false);
    assert_eq!(body["data"]["reason"], "ACCOUNT_DISABLED");
}

#[tokio::test]
async fn test_admin_details_update_must_match_kind() {
    let app = TestApp::spawn().await;
    let kitchen = app
        .register_as_admin(
            "kitchen",
            json!({
                "username": "grillcook",
                "email": "grill@example.com",
                "password": "P@ssw0rd",
                "confirm_password": "P@ssw0rd",
                "station": "grill"
            }),
        )
        .await;
    let token = app.admin_token().await;
    let path = format!(
        "/api/auth/accounts/{}/details",
        kitchen["data"]["id"].as_str().unwrap()
    );

    let response = app
        .put_authenticated(&path, &token)
        .json(&json!({ "kind": "KITCHEN", "station": "fryer" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["station"], "fryer");

    let response = app
        .put_authenticated(&path, &token)
        .json(&json!({ "kind": "ADMIN", "admin_level": "SUPER" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
