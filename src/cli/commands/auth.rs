use chrono::Utc;
use clap::Subcommand;
use serde_json::{json, Value};

use super::password_or_prompt;
use crate::cli::session::Session;
use crate::cli::utils::{output_success, output_value};
use crate::cli::{Context, OutputFormat};
use crate::database::models::UserProfile;
use crate::handlers::public::auth::login::LoginResponse;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Create an account with an institutional email")]
    Signup {
        #[arg(help = "Display name")]
        name: String,
        #[arg(help = "Institutional email")]
        email: String,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Login and save the session token")]
    Login {
        #[arg(help = "Institutional email")]
        email: String,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the saved session")]
    Logout,

    #[command(about = "Show saved session status")]
    Status,

    #[command(about = "Ask the server who the saved token belongs to")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, ctx: &Context) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Signup { name, email, password } => {
            let password = password_or_prompt(password)?;
            let body = json!({ "name": name, "email": email, "password": password });
            let response: Value = ctx.client()?.post("api/auth/signup", &body).await?;

            let message = response["message"].as_str().unwrap_or("User created.");
            output_success(&ctx.output, message, Some(json!({ "email": email })))
        }
        AuthCommands::Login { email, password } => {
            let password = password_or_prompt(password)?;
            let body = json!({ "email": email, "password": password });
            let response: LoginResponse = ctx.client()?.post("api/auth/login", &body).await?;

            let session = Session::new(ctx.server.clone(), response.token, response.user);
            ctx.store.save(&session)?;
            tracing::debug!("session saved to {}", ctx.store.path().display());

            output_success(
                &ctx.output,
                &format!("Logged in as {} <{}>", session.user.name, session.user.email),
                Some(json!({ "user": session.user, "expires_at": session.expires_at })),
            )
        }
        AuthCommands::Logout => {
            let removed = ctx.store.clear()?;
            let message = if removed { "Logged out" } else { "No saved session" };
            output_success(&ctx.output, message, None)
        }
        AuthCommands::Status => status(ctx),
        AuthCommands::Whoami => {
            let user: UserProfile = ctx.authed_client()?.get("api/auth/me").await?;
            output_value(&ctx.output, &user, |user| {
                println!("{} <{}> (id {})", user.name, user.email, user.id);
            })
        }
    }
}

fn status(ctx: &Context) -> anyhow::Result<()> {
    let Some(session) = &ctx.session else {
        return match ctx.output {
            OutputFormat::Json => {
                println!("{}", json!({ "logged_in": false }));
                Ok(())
            }
            OutputFormat::Text => {
                println!("Not logged in");
                Ok(())
            }
        };
    };

    let expired = session.is_expired(Utc::now());
    let report = json!({
        "logged_in": !expired,
        "expired": expired,
        "server": session.server,
        "user": session.user,
        "expires_at": session.expires_at,
    });

    output_value(&ctx.output, &report, |_| {
        println!("User:    {} <{}>", session.user.name, session.user.email);
        println!("Server:  {}", session.server);
        match session.expires_at {
            Some(at) if expired => println!("Token:   expired at {}", at),
            Some(at) => println!("Token:   valid until {}", at),
            None => println!("Token:   unknown expiry"),
        }
    })
}
