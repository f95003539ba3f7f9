use clap::Subcommand;
use serde_json::json;

use crate::cli::config::*;
use crate::cli::utils::*;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Point the CLI at a server (clears any saved login)")]
    Use {
        #[arg(help = "Server URL, e.g. http://localhost:3000")]
        url: String,
    },

    #[command(about = "Show the selected server")]
    Current,

    #[command(about = "Check server health status from API /health endpoint")]
    Health,

    #[command(about = "Show server information from API root endpoint")]
    Info,
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Use { url } => {
            let parsed = url::Url::parse(&url).map_err(|e| anyhow::anyhow!("Invalid server URL '{}': {}", url, e))?;
            let mut session = load_session()?;
            session.server = parsed.as_str().trim_end_matches('/').to_string();
            session.sign_out();
            save_session(&session)?;

            output_success(
                &output_format,
                &format!("Using server {}", session.server),
                Some(json!({ "server": session.server })),
            )
        }
        ServerCommands::Current => {
            let session = load_session()?;
            match output_format {
                OutputFormat::Json => output_json(&json!({
                    "server": session.server,
                    "email": session.email,
                    "logged_in": session.is_logged_in(),
                })),
                OutputFormat::Text => {
                    println!("Server: {}", session.server);
                    match &session.email {
                        Some(email) if session.is_logged_in() => println!("Logged in as: {}", email),
                        _ => println!("Not logged in"),
                    }
                    Ok(())
                }
            }
        }
        ServerCommands::Health => {
            let session = load_session()?;
            let status = ping_server(&session.server).await;
            match output_format {
                OutputFormat::Json => output_json(&json!({ "server": session.server, "status": status })),
                OutputFormat::Text => {
                    let label = match status {
                        ServerStatus::Up => "up",
                        ServerStatus::Down => "down",
                    };
                    println!("{} is {}", session.server, label);
                    Ok(())
                }
            }
        }
        ServerCommands::Info => {
            let info = load_session()?.client()?.root().await?;
            output_json(&info)
        }
    }
}
