mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{call, delete, get, post, test_app};

/// Sign up, file a bookmark into a new collection, then delete the collection
#[tokio::test]
async fn alice_reading_list_lifecycle() -> Result<()> {
    let (app, _) = test_app();

    let signup = call(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({ "email": "alice@example.com", "password": "secret1" })),
    )
    .await?;
    assert_eq!(signup.status, StatusCode::OK);
    let token = signup.body["session"]["accessToken"].as_str().unwrap_or_default().to_string();
    assert!(!token.is_empty());

    let collection = post(&app, "/api/collections", &token, json!({ "name": "Reading" })).await?;
    assert_eq!(collection.status, StatusCode::CREATED);
    let collection_id = collection.body["id"].as_str().unwrap_or_default().to_string();
    let bookmarks_path = format!("/api/collections/{}/bookmarks", collection_id);

    let created = post(&app, &bookmarks_path, &token, json!({ "url": "https://a.com", "title": "A" })).await?;
    assert_eq!(created.status, StatusCode::CREATED);

    let listed = get(&app, &bookmarks_path, &token).await?;
    assert_eq!(listed.status, StatusCode::OK);
    let listed = listed.body.as_array().cloned().unwrap_or_default();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["url"], "https://a.com");
    assert_eq!(listed[0]["title"], "A");
    assert_eq!(listed[0]["collectionId"], collection_id.as_str());

    let removed = delete(&app, &format!("/api/collections/{}", collection_id), &token).await?;
    assert_eq!(removed.status, StatusCode::OK);

    let after = get(&app, &bookmarks_path, &token).await?;
    assert_eq!(after.status, StatusCode::NOT_FOUND);

    let everything = get(&app, "/api/bookmarks", &token).await?;
    assert_eq!(everything.body, json!([]));
    Ok(())
}
