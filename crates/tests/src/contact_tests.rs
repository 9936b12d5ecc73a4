use pawcare_db::models::ProviderType;
use serde_json::Value;

use crate::fixtures::test_app::TestApp;

// Run with a live database: `MONGO_URI=... cargo test -- --ignored`

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn provider_contacts_are_distinct_booked_users_sorted_by_name() {
    let app = TestApp::spawn().await;
    let provider_id = app
        .seed_provider("Groom Room", "groom@example.com", Some(ProviderType::Shop))
        .await;
    let bea = app.seed_user("Bea", "Adams", "bea@example.com").await;
    let al = app.seed_user("Al", "Baker", "al@example.com").await;

    app.seed_booking(Some(al), Some(provider_id)).await;
    app.seed_booking(Some(bea), Some(provider_id)).await;
    // A repeat customer still shows up once.
    app.seed_booking(Some(bea), Some(provider_id)).await;
    // A booking with no user attached is skipped.
    app.seed_booking(None, Some(provider_id)).await;

    let token = app.token_for(&provider_id, "provider");
    let resp = app
        .auth_get("/api/chat/contacts", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Chat contacts fetched");

    let contacts = json["data"].as_array().unwrap();
    assert_eq!(contacts.len(), 2);

    // Ordered by first name, then last name.
    assert_eq!(contacts[0]["participant_id"], al.to_hex());
    assert_eq!(contacts[0]["name"], "Al Baker");
    assert_eq!(contacts[0]["participant_role"], "user");
    assert_eq!(contacts[0]["subtitle"], "al@example.com");
    assert_eq!(contacts[1]["participant_id"], bea.to_hex());
    assert_eq!(contacts[1]["name"], "Bea Adams");
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn user_contacts_are_booked_providers_sorted_by_business_name() {
    let app = TestApp::spawn().await;
    let user_id = app.seed_user("Kai", "Moss", "kai@example.com").await;
    let vet = app
        .seed_provider("Zen Vets", "zen@example.com", Some(ProviderType::Vet))
        .await;
    let shop = app
        .seed_provider("Animal House", "house@example.com", Some(ProviderType::Shop))
        .await;

    app.seed_booking(Some(user_id), Some(vet)).await;
    app.seed_booking(Some(user_id), Some(shop)).await;

    let token = app.token_for(&user_id, "user");
    let resp = app
        .auth_get("/api/chat/contacts", &token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();

    let contacts = json["data"].as_array().unwrap();
    assert_eq!(contacts.len(), 2);
    assert_eq!(contacts[0]["name"], "Animal House");
    assert_eq!(contacts[0]["participant_role"], "provider");
    assert_eq!(contacts[0]["subtitle"], "shop provider");
    assert_eq!(contacts[1]["name"], "Zen Vets");
    assert_eq!(contacts[1]["subtitle"], "vet provider");
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn booked_but_never_messaged_counterparty_is_contact_only() {
    let app = TestApp::spawn().await;
    let user_id = app.seed_user("Ode", "Finn", "ode@example.com").await;
    let provider_id = app
        .seed_provider("Quiet Paws", "quiet@example.com", Some(ProviderType::Babysitter))
        .await;
    app.seed_booking(Some(user_id), Some(provider_id)).await;

    let token = app.token_for(&user_id, "user");

    let resp = app
        .auth_get("/api/chat/contacts", &token)
        .send()
        .await
        .unwrap();
    let contacts: Value = resp.json().await.unwrap();
    assert_eq!(contacts["data"].as_array().unwrap().len(), 1);
    assert_eq!(contacts["data"][0]["participant_id"], provider_id.to_hex());

    // A contact comes from bookings alone; with no messages exchanged there
    // is no conversation yet.
    let resp = app
        .auth_get("/api/chat/conversations", &token)
        .send()
        .await
        .unwrap();
    let conversations: Value = resp.json().await.unwrap();
    assert_eq!(conversations["data"]["total"], 0);
    assert_eq!(
        conversations["data"]["conversations"].as_array().unwrap().len(),
        0
    );
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn contacts_without_bookings_are_empty() {
    let app = TestApp::spawn().await;
    let user_id = app.seed_user("Sol", "Nash", "sol@example.com").await;

    let token = app.token_for(&user_id, "user");
    let resp = app
        .auth_get("/api/chat/contacts", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"], Value::Array(vec![]));
}
