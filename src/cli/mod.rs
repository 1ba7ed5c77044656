pub mod client;
pub mod commands;
pub mod session;
pub mod utils;

use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use client::ApiClient;
use session::{Session, SessionStore};

pub const DEFAULT_SERVER: &str = "http://localhost:3000";

#[derive(Parser)]
#[command(name = "campus")]
#[command(about = "Campus CLI - Command-line client for the Campus API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "API base URL (default: saved session, $CAMPUS_SERVER, or localhost:3000)")]
    pub server: Option<String>,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Signup, login and session management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Blog posts and comments")]
    Posts {
        #[command(subcommand)]
        cmd: commands::posts::PostCommands,
    },

    #[command(about = "Communities and membership")]
    Communities {
        #[command(subcommand)]
        cmd: commands::communities::CommunityCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Everything a command needs, resolved once per invocation
pub struct Context {
    pub output: OutputFormat,
    pub server: String,
    pub store: SessionStore,
    pub session: Option<Session>,
}

impl Context {
    pub fn new(cli_server: Option<String>, output: OutputFormat, store: SessionStore) -> anyhow::Result<Self> {
        // An unreadable session must not block `auth logout` or a fresh login
        let session = match store.load() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("ignoring unreadable session: {}", e);
                None
            }
        };
        let server = cli_server
            .or_else(|| session.as_ref().map(|s| s.server.clone()))
            .or_else(|| std::env::var("CAMPUS_SERVER").ok())
            .unwrap_or_else(|| DEFAULT_SERVER.to_string());

        Ok(Self {
            output,
            server,
            store,
            session,
        })
    }

    /// Client without credentials, for public endpoints
    pub fn client(&self) -> anyhow::Result<ApiClient> {
        Ok(ApiClient::new(&self.server)?)
    }

    /// Client carrying the saved token; fails early when there is none or it has expired
    pub fn authed_client(&self) -> anyhow::Result<ApiClient> {
        let session = self
            .session
            .as_ref()
            .ok_or(client::ClientError::Unauthenticated)?;
        if session.is_expired(Utc::now()) {
            anyhow::bail!("session expired, run `campus auth login` again");
        }
        Ok(self.client()?.with_token(session.token.clone()))
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let ctx = Context::new(cli.server, output_format, SessionStore::open_default()?)?;

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &ctx).await,
        Commands::Posts { cmd } => commands::posts::handle(cmd, &ctx).await,
        Commands::Communities { cmd } => commands::communities::handle(cmd, &ctx).await,
    }
}
