mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::{TestServer, OTHER_TOKEN, TEST_TOKEN};

#[tokio::test]
async fn create_success() -> Result<()> {
    let server = TestServer::start().await?;
    let user = server.seed_user().await?;
    let contact = server.seed_contact(&user).await?;

    let (status, body) = server
        .post(
            &format!("/api/contacts/{}/addresses", contact.id),
            Some(TEST_TOKEN),
            json!({ "street": "test", "city": "test", "province": "test", "country": "test", "postal_code": "213123" }),
        )
        .await?;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["data"]["id"].as_i64().is_some());
    assert_eq!(body["data"]["street"], "test");
    assert_eq!(body["data"]["country"], "test");
    assert_eq!(body["data"]["postal_code"], "213123");
    Ok(())
}

#[tokio::test]
async fn create_requires_country() -> Result<()> {
    let server = TestServer::start().await?;
    let user = server.seed_user().await?;
    let contact = server.seed_contact(&user).await?;

    let (status, body) = server
        .post(
            &format!("/api/contacts/{}/addresses", contact.id),
            Some(TEST_TOKEN),
            json!({ "street": "test", "country": "", "postal_code": "12345678901" }),
        )
        .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "errors": {
            "country": ["The country field is required."],
            "postal_code": ["The postal code field must not be greater than 10 characters."],
        } })
    );
    Ok(())
}

#[tokio::test]
async fn create_for_missing_contact_is_not_found() -> Result<()> {
    let server = TestServer::start().await?;
    let user = server.seed_user().await?;
    let contact = server.seed_contact(&user).await?;

    let (status, body) = server
        .post(
            &format!("/api/contacts/{}/addresses", contact.id + 1),
            Some(TEST_TOKEN),
            json!({ "country": "test" }),
        )
        .await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "errors": { "message": ["not found"] } }));
    Ok(())
}

#[tokio::test]
async fn get_success() -> Result<()> {
    let server = TestServer::start().await?;
    let user = server.seed_user().await?;
    let contact = server.seed_contact(&user).await?;
    let address = server.seed_address(&contact).await?;

    let (status, body) = server
        .get(&format!("/api/contacts/{}/addresses/{}", contact.id, address.id), Some(TEST_TOKEN))
        .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "data": {
            "id": address.id,
            "street": "test",
            "city": "test",
            "province": "test",
            "country": "test",
            "postal_code": "11111",
        } })
    );
    Ok(())
}

#[tokio::test]
async fn missing_address_and_missing_contact_report_differently() -> Result<()> {
    let server = TestServer::start().await?;
    let user = server.seed_user().await?;
    let contact = server.seed_contact(&user).await?;
    let address = server.seed_address(&contact).await?;

    let (status, body) = server
        .get(&format!("/api/contacts/{}/addresses/{}", contact.id, address.id + 1), Some(TEST_TOKEN))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "errors": { "message": ["address not found"] } }));

    let (status, body) = server
        .get(&format!("/api/contacts/{}/addresses/{}", contact.id + 1, address.id), Some(TEST_TOKEN))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "errors": { "message": ["not found"] } }));
    Ok(())
}

#[tokio::test]
async fn address_under_another_contact_is_not_found() -> Result<()> {
    let server = TestServer::start().await?;
    let user = server.seed_user().await?;
    let first = server.seed_contact(&user).await?;
    let second = server.seed_contact(&user).await?;
    let address = server.seed_address(&first).await?;

    let (status, body) = server
        .get(&format!("/api/contacts/{}/addresses/{}", second.id, address.id), Some(TEST_TOKEN))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "errors": { "message": ["address not found"] } }));
    Ok(())
}

#[tokio::test]
async fn foreign_users_cannot_reach_addresses() -> Result<()> {
    let server = TestServer::start().await?;
    let user = server.seed_user().await?;
    server.seed_other_user().await?;
    let contact = server.seed_contact(&user).await?;
    let address = server.seed_address(&contact).await?;
    let path = format!("/api/contacts/{}/addresses/{}", contact.id, address.id);

    let (status, body) = server.get(&path, Some(OTHER_TOKEN)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "errors": { "message": ["not found"] } }));

    let (status, _) = server.delete(&path, Some(OTHER_TOKEN)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = server.get(&path, Some(TEST_TOKEN)).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn update_success() -> Result<()> {
    let server = TestServer::start().await?;
    let user = server.seed_user().await?;
    let contact = server.seed_contact(&user).await?;
    let address = server.seed_address(&contact).await?;

    let (status, body) = server
        .put(
            &format!("/api/contacts/{}/addresses/{}", contact.id, address.id),
            Some(TEST_TOKEN),
            json!({ "street": "update", "city": "update", "province": "update", "country": "update", "postal_code": "22222" }),
        )
        .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "data": {
            "id": address.id,
            "street": "update",
            "city": "update",
            "province": "update",
            "country": "update",
            "postal_code": "22222",
        } })
    );
    Ok(())
}

#[tokio::test]
async fn update_rejects_blank_country() -> Result<()> {
    let server = TestServer::start().await?;
    let user = server.seed_user().await?;
    let contact = server.seed_contact(&user).await?;
    let address = server.seed_address(&contact).await?;

    let (status, body) = server
        .put(
            &format!("/api/contacts/{}/addresses/{}", contact.id, address.id),
            Some(TEST_TOKEN),
            json!({ "country": "" }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["country"][0], "The country field is required.");
    Ok(())
}

#[tokio::test]
async fn delete_then_missing() -> Result<()> {
    let server = TestServer::start().await?;
    let user = server.seed_user().await?;
    let contact = server.seed_contact(&user).await?;
    let address = server.seed_address(&contact).await?;
    let path = format!("/api/contacts/{}/addresses/{}", contact.id, address.id);

    let (status, body) = server.delete(&path, Some(TEST_TOKEN)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": true }));

    let (status, body) = server.delete(&path, Some(TEST_TOKEN)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "errors": { "message": ["address not found"] } }));

    // The contact itself survives
    let (status, _) = server.get(&format!("/api/contacts/{}", contact.id), Some(TEST_TOKEN)).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn list_returns_only_this_contacts_addresses() -> Result<()> {
    let server = TestServer::start().await?;
    let user = server.seed_user().await?;
    let contact = server.seed_contact(&user).await?;
    let other = server.seed_contact(&user).await?;
    let first = server.seed_address(&contact).await?;
    let second = server.seed_address(&contact).await?;
    server.seed_address(&other).await?;

    let (status, body) = server
        .get(&format!("/api/contacts/{}/addresses", contact.id), Some(TEST_TOKEN))
        .await?;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body["data"]
        .as_array()
        .map(|items| items.iter().filter_map(|item| item["id"].as_i64()).collect())
        .unwrap_or_default();
    assert_eq!(ids, vec![first.id, second.id]);
    Ok(())
}
