use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::cli::config::*;
use crate::cli::utils::*;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum CollectionCommands {
    #[command(about = "List collections with bookmark counts")]
    List,

    #[command(about = "Create a collection")]
    Create {
        #[arg(help = "Collection name")]
        name: String,
    },

    #[command(about = "Delete a collection and every bookmark in it")]
    Delete {
        #[arg(help = "Collection ID")]
        id: Uuid,
    },

    #[command(about = "List the bookmarks in a collection")]
    Bookmarks {
        #[arg(help = "Collection ID")]
        id: Uuid,
    },
}

pub async fn handle(cmd: CollectionCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = load_session()?.client()?;

    match cmd {
        CollectionCommands::List => {
            let collections = client.list_collections().await?;
            output_collections(&output_format, &collections)
        }
        CollectionCommands::Create { name } => {
            let collection = client.create_collection(&name).await?;
            output_success(
                &output_format,
                &format!("Created collection '{}' ({})", collection.name, collection.id),
                Some(json!({ "collection": collection })),
            )
        }
        CollectionCommands::Delete { id } => {
            let message = client.delete_collection(id).await?;
            output_success(&output_format, &message.message, Some(json!({ "id": id })))
        }
        CollectionCommands::Bookmarks { id } => {
            let bookmarks = client.list_collection_bookmarks(id).await?;
            output_bookmarks(&output_format, &bookmarks)
        }
    }
}
