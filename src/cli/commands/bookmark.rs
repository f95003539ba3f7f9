use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::cli::config::*;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::services::{CreateBookmarkRequest, UpdateBookmarkRequest};

#[derive(Subcommand)]
pub enum BookmarkCommands {
    #[command(about = "List bookmarks, newest first")]
    List {
        #[arg(long, help = "Only bookmarks in this collection")]
        collection: Option<Uuid>,
    },

    #[command(about = "Show one bookmark")]
    Show {
        #[arg(help = "Bookmark ID")]
        id: Uuid,
    },

    #[command(about = "Add a bookmark")]
    Add {
        #[arg(help = "Absolute http(s) URL")]
        url: String,
        #[arg(help = "Title")]
        title: String,
        #[arg(long, help = "Description")]
        description: Option<String>,
        #[arg(long = "tag", help = "Tag (repeatable)")]
        tags: Vec<String>,
        #[arg(long, help = "File into this collection")]
        collection: Option<Uuid>,
    },

    #[command(about = "Update a bookmark; omitted options keep their current value")]
    Update {
        #[arg(help = "Bookmark ID")]
        id: Uuid,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        #[arg(long, help = "Remove the description")]
        clear_description: bool,
        #[arg(long = "tag", help = "Replace tags (repeatable)")]
        tags: Vec<String>,
        #[arg(long, help = "Remove every tag")]
        clear_tags: bool,
        #[arg(long, conflicts_with = "uncategorize", help = "Move into this collection")]
        collection: Option<Uuid>,
        #[arg(long, help = "Take the bookmark out of its collection")]
        uncategorize: bool,
    },

    #[command(about = "Delete a bookmark")]
    Delete {
        #[arg(help = "Bookmark ID")]
        id: Uuid,
    },
}

pub async fn handle(cmd: BookmarkCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = load_session()?.client()?;

    match cmd {
        BookmarkCommands::List { collection } => {
            let bookmarks = match collection {
                Some(id) => client.list_collection_bookmarks(id).await?,
                None => client.list_bookmarks().await?,
            };
            output_bookmarks(&output_format, &bookmarks)
        }
        BookmarkCommands::Show { id } => {
            let bookmark = client.get_bookmark(id).await?;
            output_bookmark(&output_format, &bookmark)
        }
        BookmarkCommands::Add {
            url,
            title,
            description,
            tags,
            collection,
        } => {
            let request = CreateBookmarkRequest {
                url: Some(url),
                title: Some(title),
                description,
                tags: Some(tags),
                collection_id: collection.map(|id| id.to_string()),
            };
            let bookmark = client.create_bookmark(&request).await?;
            output_success(
                &output_format,
                &format!("Added bookmark '{}' ({})", bookmark.title, bookmark.id),
                Some(json!({ "bookmark": bookmark })),
            )
        }
        BookmarkCommands::Update {
            id,
            url,
            title,
            description,
            clear_description,
            tags,
            clear_tags,
            collection,
            uncategorize,
        } => {
            // Tags are replaced wholesale, so carry the current ones unless told otherwise
            let tags = if tags.is_empty() && !clear_tags {
                client.get_bookmark(id).await?.tags
            } else {
                tags
            };

            let request = UpdateBookmarkRequest {
                url,
                title,
                description: if clear_description { Some(None) } else { description.map(Some) },
                tags: Some(tags),
                collection_id: if uncategorize {
                    Some(None)
                } else {
                    collection.map(|c| Some(c.to_string()))
                },
            };
            let bookmark = client.update_bookmark(id, &request).await?;
            output_success(
                &output_format,
                &format!("Updated bookmark '{}'", bookmark.title),
                Some(json!({ "bookmark": bookmark })),
            )
        }
        BookmarkCommands::Delete { id } => {
            let message = client.delete_bookmark(id).await?;
            output_success(&output_format, &message.message, Some(json!({ "id": id })))
        }
    }
}
