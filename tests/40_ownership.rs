mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{call, create_bookmark, create_collection, delete, get, post, put, signup, test_app};

#[tokio::test]
async fn foreign_bookmarks_look_missing() -> Result<()> {
    let (app, _) = test_app();
    let alice = signup(&app, "alice@example.com").await?;
    let bob = signup(&app, "bob@example.com").await?;

    let id = create_bookmark(&app, &alice, json!({ "url": "https://a.com", "title": "A" })).await?;
    let path = format!("/api/bookmarks/{}", id);
    let missing = format!("/api/bookmarks/{}", uuid::Uuid::new_v4());

    for target in [&path, &missing] {
        let read = get(&app, target, &bob).await?;
        assert_eq!(read.status, StatusCode::NOT_FOUND);
        assert_eq!(read.body["error"], "Bookmark not found");

        let update = put(&app, target, &bob, json!({ "title": "pwned" })).await?;
        assert_eq!(update.status, StatusCode::NOT_FOUND);

        let remove = delete(&app, target, &bob).await?;
        assert_eq!(remove.status, StatusCode::NOT_FOUND);
    }

    let still_there = get(&app, &path, &alice).await?;
    assert_eq!(still_there.status, StatusCode::OK);
    assert_eq!(still_there.body["title"], "A");
    Ok(())
}

#[tokio::test]
async fn foreign_collections_look_missing() -> Result<()> {
    let (app, _) = test_app();
    let alice = signup(&app, "alice@example.com").await?;
    let bob = signup(&app, "bob@example.com").await?;

    let reading = create_collection(&app, &alice, "Reading").await?;
    create_bookmark(&app, &alice, json!({ "url": "https://a.com", "title": "A", "collectionId": reading })).await?;

    let base = format!("/api/collections/{}", reading);
    assert_eq!(get(&app, &base, &bob).await?.status, StatusCode::NOT_FOUND);
    assert_eq!(get(&app, &format!("{}/bookmarks", base), &bob).await?.status, StatusCode::NOT_FOUND);
    assert_eq!(delete(&app, &base, &bob).await?.status, StatusCode::NOT_FOUND);

    let listed = get(&app, "/api/collections", &bob).await?;
    assert_eq!(listed.body, json!([]));

    let intact = get(&app, &format!("{}/bookmarks", base), &alice).await?;
    assert_eq!(intact.body.as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn cannot_file_into_someone_elses_collection() -> Result<()> {
    let (app, _) = test_app();
    let alice = signup(&app, "alice@example.com").await?;
    let bob = signup(&app, "bob@example.com").await?;
    let reading = create_collection(&app, &alice, "Reading").await?;

    let direct = post(
        &app,
        "/api/bookmarks",
        &bob,
        json!({ "url": "https://b.com", "title": "B", "collectionId": reading }),
    )
    .await?;
    assert_eq!(direct.status, StatusCode::NOT_FOUND);
    assert_eq!(direct.body["error"], "Collection not found");

    let nested = post(
        &app,
        &format!("/api/collections/{}/bookmarks", reading),
        &bob,
        json!({ "url": "https://b.com", "title": "B" }),
    )
    .await?;
    assert_eq!(nested.status, StatusCode::NOT_FOUND);

    let own = create_bookmark(&app, &bob, json!({ "url": "https://b.com", "title": "B" })).await?;
    let moved = put(&app, &format!("/api/bookmarks/{}", own), &bob, json!({ "collectionId": reading })).await?;
    assert_eq!(moved.status, StatusCode::NOT_FOUND);

    assert_eq!(get(&app, "/api/bookmarks", &bob).await?.body.as_array().map(Vec::len), Some(1));
    let alice_view = get(&app, &format!("/api/collections/{}/bookmarks", reading), &alice).await?;
    assert_eq!(alice_view.body, json!([]));
    Ok(())
}

#[tokio::test]
async fn lists_only_show_the_callers_data() -> Result<()> {
    let (app, _) = test_app();
    let alice = signup(&app, "alice@example.com").await?;
    let bob = signup(&app, "bob@example.com").await?;

    create_bookmark(&app, &alice, json!({ "url": "https://a.com", "title": "A" })).await?;
    create_bookmark(&app, &bob, json!({ "url": "https://b.com", "title": "B" })).await?;

    let mine = get(&app, "/api/bookmarks", &alice).await?;
    let mine = mine.body.as_array().cloned().unwrap_or_default();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["title"], "A");
    Ok(())
}

#[tokio::test]
async fn unauthenticated_requests_are_rejected_without_side_effects() -> Result<()> {
    let (app, state) = test_app();
    let alice = signup(&app, "alice@example.com").await?;
    let id = create_bookmark(&app, &alice, json!({ "url": "https://a.com", "title": "A" })).await?;
    let path = format!("/api/bookmarks/{}", id);

    let attempts = [
        (Method::GET, "/api/bookmarks".to_string(), None),
        (Method::POST, "/api/bookmarks".to_string(), Some(json!({ "url": "https://x.com", "title": "X" }))),
        (Method::PUT, path.clone(), Some(json!({ "title": "X" }))),
        (Method::DELETE, path.clone(), None),
        (Method::POST, "/api/collections".to_string(), Some(json!({ "name": "X" }))),
        (Method::GET, "/api/auth/user".to_string(), None),
    ];

    for (method, target, body) in attempts {
        let res = call(&app, method.clone(), &target, None, body.clone()).await?;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED, "{} {}", method, target);
        assert_eq!(res.body["error"], "Unauthorized");

        let forged = call(&app, method.clone(), &target, Some("not-a-token"), body).await?;
        assert_eq!(forged.status, StatusCode::UNAUTHORIZED, "{} {} with forged token", method, target);
    }

    let me = get(&app, "/api/auth/user", &alice).await?;
    let owner_id = me.body["id"].as_str().unwrap_or_default().to_string();
    let bookmarks = state.store.list_bookmarks(&owner_id).await?;
    assert_eq!(bookmarks.len(), 1);
    assert_eq!(bookmarks[0].title, "A");
    assert!(state.store.list_collections(&owner_id).await?.is_empty());
    Ok(())
}
