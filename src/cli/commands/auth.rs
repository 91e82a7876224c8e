use clap::Subcommand;
use serde_json::json;

use crate::cli::client::ApiClient;
use crate::cli::config::{clear_session, load_session, save_session, Session};
use crate::cli::utils::{client_from_session, output_success, resolve_server};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login and store the access token")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password")]
        password: String,
    },

    #[command(about = "Logout and forget the stored token")]
    Logout,

    #[command(about = "Show stored session and token expiry")]
    Status,

    #[command(about = "Show current user information from the server")]
    Whoami,
}

pub async fn handle(
    cmd: AuthCommands,
    server: Option<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { username, password } => {
            let base = resolve_server(server, load_session()?.as_ref());
            let client = ApiClient::new(base);

            let token = client.login(&username, &password).await?;
            save_session(&Session::new(client.base_url().to_string(), username.clone(), token))?;

            output_success(
                &output_format,
                &format!("Logged in as '{}' on {}", username, client.base_url()),
                Some(json!({ "username": username, "server": client.base_url() })),
            )
        }
        AuthCommands::Logout => {
            let client = client_from_session(server)?;

            // Nothing is revoked server-side; a failed call changes nothing
            if let Err(e) = client.logout().await {
                tracing::debug!("Logout request failed: {}", e);
            }

            let had_session = clear_session()?;
            let message = if had_session { "Logged out" } else { "No stored session" };
            output_success(&output_format, message, None)
        }
        AuthCommands::Status => {
            let Some(session) = load_session()? else {
                return output_success(
                    &output_format,
                    "Not logged in",
                    Some(json!({ "logged_in": false })),
                );
            };

            let expires_at = session.expires_at();
            let expired = session.is_expired();

            match output_format {
                OutputFormat::Json => output_success(
                    &output_format,
                    if expired { "Session expired" } else { "Logged in" },
                    Some(json!({
                        "logged_in": !expired,
                        "username": session.username,
                        "server": session.server,
                        "created_at": session.created_at,
                        "expires_at": expires_at,
                    })),
                ),
                OutputFormat::Text => {
                    println!("User: {}", session.username);
                    println!("Server: {}", session.server);
                    match expires_at {
                        Some(exp) if !expired => println!("Token expires: {}", exp.to_rfc3339()),
                        Some(exp) => println!("Token expired: {}", exp.to_rfc3339()),
                        None => println!("Token expiry unknown"),
                    }
                    Ok(())
                }
            }
        }
        AuthCommands::Whoami => {
            let client = client_from_session(server)?;
            let user = client.me().await?;

            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json!({ "user": user }))?),
                OutputFormat::Text => {
                    println!("ID: {}", user.id);
                    println!("Username: {}", user.username);
                    println!("Role: {}", user.role);
                }
            }
            Ok(())
        }
    }
}
