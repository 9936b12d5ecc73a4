use bson::oid::ObjectId;
use serde_json::Value;

use crate::fixtures::test_app::TestApp;

// Every test here fails validation before the first store call, so no
// MongoDB instance is needed.

#[tokio::test]
async fn requests_without_token_are_unauthorized() {
    let app = TestApp::spawn().await;

    for path in [
        "/api/chat/conversations",
        "/api/chat/contacts",
        &format!("/api/chat/messages/{}", ObjectId::new().to_hex()),
    ] {
        let resp = app.client.get(app.url(path)).send().await.unwrap();
        assert_eq!(resp.status().as_u16(), 401, "expected 401 for {path}");

        let json: Value = resp.json().await.unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Missing access token");
    }
}

#[tokio::test]
async fn malformed_token_is_unauthorized() {
    let app = TestApp::spawn().await;

    let resp = app
        .auth_get("/api/chat/conversations", "not-a-jwt")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 401);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let app = TestApp::spawn().await;
    let user_id = ObjectId::new();
    let token = app.expired_token_for(&user_id, "user");

    let resp = app
        .auth_get("/api/chat/conversations", &token)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 401);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Token expired");
}

#[tokio::test]
async fn unknown_role_claim_is_unauthorized() {
    let app = TestApp::spawn().await;
    let user_id = ObjectId::new();
    let token = app.token_for(&user_id, "admin");

    let resp = app
        .auth_get("/api/chat/conversations", &token)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 401);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Invalid token role");
}

#[tokio::test]
async fn create_message_rejects_invalid_participant_id() {
    let app = TestApp::spawn().await;
    let user_id = ObjectId::new();
    let token = app.token_for(&user_id, "user");

    let resp = app
        .auth_post("/api/chat/messages/not-a-hex-id", &token)
        .json(&serde_json::json!({ "content": "hello" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Invalid participant id");
}

#[tokio::test]
async fn create_message_rejects_same_role_pairing() {
    let app = TestApp::spawn().await;
    let user_id = ObjectId::new();
    let other_user_id = ObjectId::new();
    let token = app.token_for(&user_id, "user");

    let resp = app
        .auth_post(
            &format!("/api/chat/messages/{}", other_user_id.to_hex()),
            &token,
        )
        .json(&serde_json::json!({
            "content": "hello",
            "participant_role": "user",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(
        json["message"],
        "Direct chat must be between a user and a provider"
    );
}

#[tokio::test]
async fn create_message_rejects_empty_content() {
    let app = TestApp::spawn().await;
    let provider_id = ObjectId::new();
    let user_id = ObjectId::new();
    let token = app.token_for(&provider_id, "provider");

    for content in ["", "   ", "\n\t "] {
        let resp = app
            .auth_post(&format!("/api/chat/messages/{}", user_id.to_hex()), &token)
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status().as_u16(), 400, "content {content:?}");
        let json: Value = resp.json().await.unwrap();
        assert_eq!(json["message"], "Message content is required");
    }
}

#[tokio::test]
async fn thread_rejects_invalid_participant_id() {
    let app = TestApp::spawn().await;
    let user_id = ObjectId::new();
    let token = app.token_for(&user_id, "user");

    let resp = app
        .auth_get("/api/chat/messages/zzz", &token)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Invalid participant id");
}

#[tokio::test]
async fn thread_rejects_same_role_participant() {
    let app = TestApp::spawn().await;
    let user_id = ObjectId::new();
    let other_user_id = ObjectId::new();
    let token = app.token_for(&user_id, "user");

    let resp = app
        .auth_get(
            &format!(
                "/api/chat/messages/{}?participant_role=user",
                other_user_id.to_hex()
            ),
            &token,
        )
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(
        json["message"],
        "Direct chat must be between a user and a provider"
    );
}

#[tokio::test]
async fn unknown_participant_role_is_a_client_error() {
    let app = TestApp::spawn().await;
    let user_id = ObjectId::new();
    let provider_id = ObjectId::new();
    let token = app.token_for(&user_id, "user");

    // Query deserialization failure
    let resp = app
        .auth_get(
            &format!(
                "/api/chat/messages/{}?participant_role=banana",
                provider_id.to_hex()
            ),
            &token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);

    // Body deserialization failure
    let resp = app
        .auth_post(
            &format!("/api/chat/messages/{}", provider_id.to_hex()),
            &token,
        )
        .json(&serde_json::json!({
            "content": "hello",
            "participant_role": "banana",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let app = TestApp::spawn().await;

    let resp = app.client.get(app.url("/health")).send().await.unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "ok");
}
