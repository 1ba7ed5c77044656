#![allow(dead_code)]

use anyhow::{Context, Result};
use reqwest::{Response, StatusCode};
use serde_json::{json, Value};

use campus_api::config::AppConfig;
use campus_api::database::DatabaseManager;
use campus_api::server::app;
use campus_api::state::AppState;

pub const PASSWORD: &str = "abcdef";

/// In-process server with its own in-memory database.
///
/// The server task lives on the calling test's runtime, so every test gets a
/// fresh instance and nothing leaks between tests.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
    pub config: AppConfig,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.url("/api/auth/signup"))
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await?)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?)
    }

    /// Sign up `<name>@nutech.edu.pk` and return (token, user id)
    pub async fn user(&self, name: &str) -> Result<(String, i64)> {
        let email = format!("{}@nutech.edu.pk", name.to_lowercase());
        let signup = self.signup(name, &email, PASSWORD).await?;
        anyhow::ensure!(signup.status() == StatusCode::CREATED, "signup failed: {}", signup.status());

        let body: Value = self.login(&email, PASSWORD).await?.json().await?;
        let token = body["token"].as_str().context("login returned no token")?.to_string();
        let id = body["user"]["id"].as_i64().context("login returned no user id")?;
        Ok((token, id))
    }

    pub async fn create_post(&self, token: &str, title: &str) -> Result<Value> {
        let resp = self
            .client
            .post(self.url("/api/posts"))
            .bearer_auth(token)
            .json(&json!({
                "title": title,
                "content": "Starting university can be overwhelming.",
                "category": "Student Life"
            }))
            .send()
            .await?;
        anyhow::ensure!(resp.status() == StatusCode::CREATED, "create post failed: {}", resp.status());
        Ok(resp.json().await?)
    }

    pub async fn create_community(&self, token: &str, name: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.url("/api/communities"))
            .bearer_auth(token)
            .json(&json!({ "name": name, "description": "For builders" }))
            .send()
            .await?)
    }
}

pub async fn spawn_server() -> Result<TestServer> {
    let mut config = AppConfig::for_testing();
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    config.server.host = "127.0.0.1".to_string();
    config.server.port = port;

    let pool = DatabaseManager::connect(&config.database).await?;
    let router = app(AppState::new(pool, &config), &config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(TestServer {
        port,
        base_url: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
        config,
    })
}
