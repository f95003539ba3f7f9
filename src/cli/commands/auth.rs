use clap::Subcommand;
use serde_json::json;

use crate::cli::config::*;
use crate::cli::utils::*;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Create an account")]
    Signup {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
        #[arg(long, help = "Display name")]
        name: Option<String>,
    },

    #[command(about = "Login to server")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Logout from server")]
    Logout,

    #[command(about = "Show current user information")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Signup { email, password, name } => {
            let password = resolve_password(password)?;
            let mut session = load_session()?;
            let response = session.client()?.signup(&email, &password, name.as_deref()).await?;

            let token = response.session.map(|s| s.access_token);
            let logged_in = token.is_some();
            session.sign_in(&response.user.email, token);
            save_session(&session)?;

            let message = response.message.unwrap_or_else(|| "Signed up".to_string());
            output_success(
                &output_format,
                &message,
                Some(json!({ "user": response.user, "logged_in": logged_in })),
            )
        }
        AuthCommands::Login { email, password } => {
            let password = resolve_password(password)?;
            let mut session = load_session()?;
            let response = session.client()?.login(&email, &password).await?;

            session.sign_in(&response.user.email, response.session.map(|s| s.access_token));
            save_session(&session)?;

            output_success(
                &output_format,
                &format!("Logged in as {}", response.user.email),
                Some(json!({ "user": response.user })),
            )
        }
        AuthCommands::Logout => {
            let mut session = load_session()?;
            if session.is_logged_in() {
                session.client()?.logout().await?;
            }
            session.sign_out();
            save_session(&session)?;

            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Whoami => {
            let user = load_session()?.client()?.current_user().await?;
            match output_format {
                OutputFormat::Json => output_json(&user),
                OutputFormat::Text => {
                    println!("ID: {}", user.id);
                    println!("Email: {}", user.email);
                    println!("Name: {}", user.name);
                    println!("Member since: {}", user.created_at.format("%Y-%m-%d"));
                    Ok(())
                }
            }
        }
    }
}
