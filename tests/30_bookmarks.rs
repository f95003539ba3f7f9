mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{create_bookmark, create_collection, delete, get, post, put, signup, test_app};

#[tokio::test]
async fn create_returns_the_stored_bookmark() -> Result<()> {
    let (app, _) = test_app();
    let token = signup(&app, "alice@example.com").await?;

    let res = post(
        &app,
        "/api/bookmarks",
        &token,
        json!({
            "url": "https://a.com",
            "title": "A",
            "description": "  first  ",
            "tags": [" rust ", "", "web"]
        }),
    )
    .await?;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["url"], "https://a.com");
    assert_eq!(res.body["title"], "A");
    assert_eq!(res.body["description"], "first");
    assert_eq!(res.body["tags"], json!(["rust", "web"]));
    assert_eq!(res.body["collectionId"], serde_json::Value::Null);
    Ok(())
}

#[tokio::test]
async fn empty_collection_id_means_uncategorized() -> Result<()> {
    let (app, _) = test_app();
    let token = signup(&app, "alice@example.com").await?;

    let res = post(
        &app,
        "/api/bookmarks",
        &token,
        json!({ "url": "https://a.com", "title": "A", "collectionId": "" }),
    )
    .await?;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["collectionId"], serde_json::Value::Null);
    Ok(())
}

#[tokio::test]
async fn invalid_url_and_missing_title_are_reported() -> Result<()> {
    let (app, _) = test_app();
    let token = signup(&app, "alice@example.com").await?;

    let res = post(&app, "/api/bookmarks", &token, json!({ "url": "ftp://a.com" })).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert!(res.body["fieldErrors"]["url"].is_string());
    assert_eq!(res.body["fieldErrors"]["title"], "Title is required");
    Ok(())
}

#[tokio::test]
async fn list_is_newest_first() -> Result<()> {
    let (app, _) = test_app();
    let token = signup(&app, "alice@example.com").await?;

    let first = create_bookmark(&app, &token, json!({ "url": "https://a.com", "title": "A" })).await?;
    let second = create_bookmark(&app, &token, json!({ "url": "https://b.com", "title": "B" })).await?;

    let res = get(&app, "/api/bookmarks", &token).await?;
    let ids: Vec<_> = res
        .body
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .map(|b| b["id"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(ids, vec![second, first]);
    Ok(())
}

#[tokio::test]
async fn update_applies_partial_changes() -> Result<()> {
    let (app, _) = test_app();
    let token = signup(&app, "alice@example.com").await?;
    let reading = create_collection(&app, &token, "Reading").await?;
    let id = create_bookmark(
        &app,
        &token,
        json!({ "url": "https://a.com", "title": "A", "description": "d", "tags": ["x"] }),
    )
    .await?;
    let path = format!("/api/bookmarks/{}", id);

    let moved = put(&app, &path, &token, json!({ "title": "A2", "tags": ["y", "z"], "collectionId": reading })).await?;
    assert_eq!(moved.status, StatusCode::OK);
    assert_eq!(moved.body["url"], "https://a.com");
    assert_eq!(moved.body["title"], "A2");
    assert_eq!(moved.body["description"], "d");
    assert_eq!(moved.body["tags"], json!(["y", "z"]));
    assert_eq!(moved.body["collectionId"], reading.as_str());

    let cleared = put(&app, &path, &token, json!({ "description": null, "collectionId": null })).await?;
    assert_eq!(cleared.status, StatusCode::OK);
    assert_eq!(cleared.body["description"], serde_json::Value::Null);
    assert_eq!(cleared.body["collectionId"], serde_json::Value::Null);
    assert_eq!(cleared.body["tags"], json!([]));
    assert_eq!(cleared.body["title"], "A2");
    Ok(())
}

#[tokio::test]
async fn update_with_bad_url_changes_nothing() -> Result<()> {
    let (app, _) = test_app();
    let token = signup(&app, "alice@example.com").await?;
    let id = create_bookmark(&app, &token, json!({ "url": "https://a.com", "title": "A" })).await?;
    let path = format!("/api/bookmarks/{}", id);

    let res = put(&app, &path, &token, json!({ "url": "not a url", "title": "B" })).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let unchanged = get(&app, &path, &token).await?;
    assert_eq!(unchanged.body["title"], "A");
    Ok(())
}

#[tokio::test]
async fn delete_then_get_is_not_found() -> Result<()> {
    let (app, _) = test_app();
    let token = signup(&app, "alice@example.com").await?;
    let id = create_bookmark(&app, &token, json!({ "url": "https://a.com", "title": "A" })).await?;
    let path = format!("/api/bookmarks/{}", id);

    let res = delete(&app, &path, &token).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Bookmark deleted successfully");

    assert_eq!(get(&app, &path, &token).await?.status, StatusCode::NOT_FOUND);
    assert_eq!(delete(&app, &path, &token).await?.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn nested_routes_scope_to_the_collection() -> Result<()> {
    let (app, _) = test_app();
    let token = signup(&app, "alice@example.com").await?;
    let reading = create_collection(&app, &token, "Reading").await?;
    let work = create_collection(&app, &token, "Work").await?;
    let base = format!("/api/collections/{}/bookmarks", reading);

    // Body collectionId is ignored in favour of the route
    let created = post(
        &app,
        &base,
        &token,
        json!({ "url": "https://a.com", "title": "A", "collectionId": work }),
    )
    .await?;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["collectionId"], reading.as_str());
    let inside = created.body["id"].as_str().unwrap_or_default().to_string();

    let outside = create_bookmark(&app, &token, json!({ "url": "https://b.com", "title": "B" })).await?;

    let listed = get(&app, &base, &token).await?;
    let listed = listed.body.as_array().cloned().unwrap_or_default();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], inside.as_str());

    let renamed = put(&app, &format!("{}/{}", base, inside), &token, json!({ "title": "A2" })).await?;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.body["title"], "A2");

    let miss = put(&app, &format!("{}/{}", base, outside), &token, json!({ "title": "X" })).await?;
    assert_eq!(miss.status, StatusCode::NOT_FOUND);
    let miss = delete(&app, &format!("{}/{}", base, outside), &token).await?;
    assert_eq!(miss.status, StatusCode::NOT_FOUND);

    let removed = delete(&app, &format!("{}/{}", base, inside), &token).await?;
    assert_eq!(removed.status, StatusCode::OK);
    assert_eq!(get(&app, &base, &token).await?.body, json!([]));
    Ok(())
}
