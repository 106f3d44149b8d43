mod common;

use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;

/// Register a user and return (user_id, access_token, refresh_token).
async fn register(app: &TestApp, username: &str, email: &str) -> (i64, String, String) {
    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "username": username,
            "email": email,
            "password": "Passw0rd!",
            "firstName": "Alice",
            "lastName": "Smith"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");

    (
        body["data"]["userId"].as_i64().unwrap(),
        body["data"]["accessToken"].as_str().unwrap().to_string(),
        body["data"]["refreshToken"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_get_user_requires_token() {
    let app = TestApp::spawn().await;
    let (user_id, _, _) = register(&app, "alice", "a@x.com").await;

    let response = app
        .get(&format!("/api/users/{}", user_id))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_user_with_garbage_token() {
    let app = TestApp::spawn().await;
    let (user_id, _, _) = register(&app, "alice", "a@x.com").await;

    let response = app
        .get_authenticated(&format!("/api/users/{}", user_id), "not.a.token")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let challenge = response
        .headers()
        .get("www-authenticate")
        .expect("Missing WWW-Authenticate header")
        .to_str()
        .unwrap();
    assert!(challenge.contains("invalid_token"));
}

#[tokio::test]
async fn test_get_user_with_tampered_token() {
    let app = TestApp::spawn().await;
    let (user_id, access_token, _) = register(&app, "alice", "a@x.com").await;

    let mut tampered = access_token[..access_token.len() - 3].to_string();
    tampered.push_str("xyz");

    let response = app
        .get_authenticated(&format!("/api/users/{}", user_id), &tampered)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_user_success() {
    let app = TestApp::spawn().await;
    let (user_id, access_token, _) = register(&app, "alice", "a@x.com").await;

    let response = app
        .get_authenticated(&format!("/api/users/{}", user_id), &access_token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["id"], user_id);
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(body["data"]["email"], "a@x.com");
    assert_eq!(body["data"]["firstName"], "Alice");
    assert_eq!(body["data"]["lastName"], "Smith");
    assert_eq!(body["data"]["roles"], json!(["USER"]));
}

#[tokio::test]
async fn test_get_unknown_user() {
    let app = TestApp::spawn().await;
    let (_, access_token, _) = register(&app, "alice", "a@x.com").await;

    let response = app
        .get_authenticated("/api/users/9999", &access_token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_own_profile() {
    let app = TestApp::spawn().await;
    let (user_id, access_token, _) = register(&app, "alice", "a@x.com").await;

    let response = app
        .patch_authenticated(&format!("/api/users/{}", user_id), &access_token)
        .json(&json!({ "email": "new@x.com" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["email"], "new@x.com");
}

#[tokio::test]
async fn test_update_with_invalid_email() {
    let app = TestApp::spawn().await;
    let (user_id, access_token, _) = register(&app, "alice", "a@x.com").await;

    let response = app
        .patch_authenticated(&format!("/api/users/{}", user_id), &access_token)
        .json(&json!({ "email": "nope" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_another_user_is_forbidden() {
    let app = TestApp::spawn().await;
    let (_, access_token, _) = register(&app, "alice", "a@x.com").await;
    let (bob_id, _, _) = register(&app, "bob", "b@x.com").await;

    let response = app
        .patch_authenticated(&format!("/api/users/{}", bob_id), &access_token)
        .json(&json!({ "email": "hijack@x.com" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_change_password_wrong_current() {
    let app = TestApp::spawn().await;
    let (user_id, access_token, _) = register(&app, "alice", "a@x.com").await;

    let response = app
        .post_authenticated(&format!("/api/users/{}/password", user_id), &access_token)
        .json(&json!({
            "currentPassword": "wrong",
            "newPassword": "NewPassw0rd!"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_change_password_revokes_sessions() {
    let app = TestApp::spawn().await;
    let (user_id, access_token, refresh_token) = register(&app, "alice", "a@x.com").await;

    let response = app
        .post_authenticated(&format!("/api/users/{}/password", user_id), &access_token)
        .json(&json!({
            "currentPassword": "Passw0rd!",
            "newPassword": "NewPassw0rd!"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Every pre-change refresh token is dead.
    let replay = app
        .post("/api/auth/refresh")
        .json(&json!({ "refreshToken": refresh_token }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);

    // The old password no longer logs in; the new one does.
    let old_login = app
        .post("/api/auth/login")
        .json(&json!({
            "usernameOrEmail": "alice",
            "password": "Passw0rd!"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(old_login.status(), StatusCode::UNAUTHORIZED);

    let new_login = app
        .post("/api/auth/login")
        .json(&json!({
            "usernameOrEmail": "alice",
            "password": "NewPassw0rd!"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(new_login.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_delete_account() {
    let app = TestApp::spawn().await;
    let (user_id, access_token, refresh_token) = register(&app, "alice", "a@x.com").await;

    let response = app
        .delete_authenticated(&format!("/api/users/{}", user_id), &access_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The profile is gone from the read surface.
    let get = app
        .get_authenticated(&format!("/api/users/{}", user_id), &access_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(get.status(), StatusCode::NOT_FOUND);

    // Open sessions were revoked with it.
    let replay = app
        .post("/api/auth/refresh")
        .json(&json!({ "refreshToken": refresh_token }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);

    // And the account can no longer authenticate.
    let login = app
        .post("/api/auth/login")
        .json(&json!({
            "usernameOrEmail": "alice",
            "password": "Passw0rd!"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(login.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_deleted_username_still_blocks_registration() {
    let app = TestApp::spawn().await;
    let (user_id, access_token, _) = register(&app, "alice", "a@x.com").await;

    let delete = app
        .delete_authenticated(&format!("/api/users/{}", user_id), &access_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(delete.status(), StatusCode::NO_CONTENT);

    // Uniqueness is not relaxed by soft delete.
    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "username": "alice",
            "email": "other@x.com",
            "password": "Passw0rd!"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
