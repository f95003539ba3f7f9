mod common;

use std::time::Duration;

use anyhow::Result;

use bookmark_api::client::{ApiClient, BookmarkFeed, CollectionFeed};
use bookmark_api::services::{CreateBookmarkRequest, UpdateBookmarkRequest};

use common::{spawn_server, PASSWORD};

fn bookmark(url: &str, title: &str) -> CreateBookmarkRequest {
    CreateBookmarkRequest {
        url: Some(url.into()),
        title: Some(title.into()),
        ..Default::default()
    }
}

async fn signed_in_client(base_url: &str, email: &str) -> Result<ApiClient> {
    let client = ApiClient::new(base_url)?;
    client.signup(email, PASSWORD, None).await?;
    Ok(client)
}

#[tokio::test]
async fn mutations_advance_the_refresh_generation() -> Result<()> {
    let server = spawn_server().await?;
    let client = signed_in_client(&server.base_url, "alice@example.com").await?;
    let start = client.refresh().generation();

    let created = client.create_bookmark(&bookmark("https://a.com", "A")).await?;
    assert_eq!(client.refresh().generation(), start + 1);

    client
        .update_bookmark(
            created.id,
            &UpdateBookmarkRequest {
                title: Some("A2".into()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(client.refresh().generation(), start + 2);

    // Reads leave the generation alone
    client.list_bookmarks().await?;
    assert_eq!(client.refresh().generation(), start + 2);

    client.delete_bookmark(created.id).await?;
    assert_eq!(client.refresh().generation(), start + 3);
    Ok(())
}

#[tokio::test]
async fn failed_mutations_do_not_refresh() -> Result<()> {
    let server = spawn_server().await?;
    let client = signed_in_client(&server.base_url, "alice@example.com").await?;
    let start = client.refresh().generation();

    let err = client
        .create_bookmark(&bookmark("not a url", "A"))
        .await
        .expect_err("invalid url must fail");
    assert_eq!(err.status(), Some(400));

    let missing = client.get_bookmark(uuid::Uuid::new_v4()).await.expect_err("unknown id");
    assert!(missing.is_not_found());
    assert_eq!(missing.to_string(), "Bookmark not found (404)");

    assert_eq!(client.refresh().generation(), start);
    Ok(())
}

#[tokio::test]
async fn feeds_refetch_after_mutations() -> Result<()> {
    let server = spawn_server().await?;
    let client = signed_in_client(&server.base_url, "alice@example.com").await?;

    let mut bookmarks = BookmarkFeed::all(&client);
    let mut collections = CollectionFeed::collections(&client);
    assert!(bookmarks.next().await?.is_empty());
    assert!(collections.next().await?.is_empty());

    let reading = client.create_collection("Reading").await?;
    let mut in_reading = BookmarkFeed::in_collection(&client, reading.id);
    assert!(in_reading.next().await?.is_empty());

    client
        .create_collection_bookmark(reading.id, &bookmark("https://a.com", "A"))
        .await?;

    let all = tokio::time::timeout(Duration::from_secs(5), bookmarks.next()).await??;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "A");

    let scoped = tokio::time::timeout(Duration::from_secs(5), in_reading.next()).await??;
    assert_eq!(scoped.len(), 1);

    let summaries = tokio::time::timeout(Duration::from_secs(5), collections.next()).await??;
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].collection.name, "Reading");
    assert_eq!(summaries[0].count.bookmarks, 1);
    Ok(())
}

#[tokio::test]
async fn clones_share_token_and_notifier() -> Result<()> {
    let server = spawn_server().await?;
    let client = ApiClient::new(&server.base_url)?;
    let view = client.clone();
    let mut feed = BookmarkFeed::all(&view);

    client.signup("carol@example.com", PASSWORD, Some("Carol")).await?;
    assert!(view.token().await.is_some());

    let me = view.current_user().await?;
    assert_eq!(me.name, "Carol");

    assert!(feed.next().await?.is_empty());
    client.create_bookmark(&bookmark("https://c.com", "C")).await?;
    let refreshed = tokio::time::timeout(Duration::from_secs(5), feed.next()).await??;
    assert_eq!(refreshed.len(), 1);
    Ok(())
}

#[tokio::test]
async fn logout_forgets_the_token() -> Result<()> {
    let server = spawn_server().await?;
    let client = signed_in_client(&server.base_url, "alice@example.com").await?;

    client.logout().await?;
    assert!(client.token().await.is_none());

    let err = client.list_bookmarks().await.expect_err("signed out");
    assert_eq!(err.status(), Some(401));
    Ok(())
}

#[tokio::test]
async fn health_reports_ok() -> Result<()> {
    let server = spawn_server().await?;
    let client = ApiClient::new(&server.base_url)?;
    let health = client.health().await?;
    assert_eq!(health["status"], "ok");
    Ok(())
}
