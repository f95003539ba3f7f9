use std::io::{self, Write};

use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::database::models::{Bookmark, CollectionSummary};

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Print any serializable payload as pretty JSON
pub fn output_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn output_bookmarks(output_format: &OutputFormat, bookmarks: &[Bookmark]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => output_json(&json!({ "bookmarks": bookmarks })),
        OutputFormat::Text => {
            if bookmarks.is_empty() {
                println!("No bookmarks");
                return Ok(());
            }

            println!("{:<36} {:<30} {:<40} {}", "ID", "TITLE", "URL", "TAGS");
            println!("{}", "-".repeat(120));
            for bookmark in bookmarks {
                println!(
                    "{:<36} {:<30} {:<40} {}",
                    bookmark.id,
                    truncate(&bookmark.title, 30),
                    truncate(&bookmark.url, 40),
                    bookmark.tags.join(", ")
                );
            }
            Ok(())
        }
    }
}

pub fn output_bookmark(output_format: &OutputFormat, bookmark: &Bookmark) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => output_json(bookmark),
        OutputFormat::Text => {
            println!("ID: {}", bookmark.id);
            println!("Title: {}", bookmark.title);
            println!("URL: {}", bookmark.url);
            if let Some(description) = &bookmark.description {
                println!("Description: {}", description);
            }
            if !bookmark.tags.is_empty() {
                println!("Tags: {}", bookmark.tags.join(", "));
            }
            match bookmark.collection_id {
                Some(id) => println!("Collection: {}", id),
                None => println!("Collection: (uncategorized)"),
            }
            println!("Created: {}", bookmark.created_at.format("%Y-%m-%d %H:%M"));
            Ok(())
        }
    }
}

pub fn output_collections(output_format: &OutputFormat, collections: &[CollectionSummary]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => output_json(&json!({ "collections": collections })),
        OutputFormat::Text => {
            if collections.is_empty() {
                println!("No collections");
                return Ok(());
            }

            println!("{:<36} {:<30} {:>9} {}", "ID", "NAME", "BOOKMARKS", "CREATED");
            println!("{}", "-".repeat(100));
            for summary in collections {
                println!(
                    "{:<36} {:<30} {:>9} {}",
                    summary.collection.id,
                    truncate(&summary.collection.name, 30),
                    summary.count.bookmarks,
                    summary.collection.created_at.format("%Y-%m-%d %H:%M")
                );
            }
            Ok(())
        }
    }
}

/// Password from the flag, otherwise read from stdin
pub fn resolve_password(provided: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = provided {
        return Ok(password);
    }

    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut short: String = value.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}
