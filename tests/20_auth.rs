mod common;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};

use campus_api::auth::{TokenIssuer, TOKEN_TTL_SECS};
use campus_api::database::models::UserProfile;

#[tokio::test]
async fn signup_login_then_gatekeeping() -> Result<()> {
    let server = common::spawn_server().await?;

    let resp = server.signup("A", "a@nutech.edu.pk", "abcdef").await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await?;
    assert_eq!(body["message"], "User created.");

    let resp = server.login("a@nutech.edu.pk", "abcdef").await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await?;
    let token = body["token"].as_str().context("token")?.to_string();
    assert!(!token.is_empty());
    assert_eq!(body["user"]["name"], "A");
    assert_eq!(body["user"]["email"], "a@nutech.edu.pk");
    assert!(body["user"].get("password").is_none());

    // Reads are public
    let resp = server.client.get(server.url("/api/posts")).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let posts: Vec<Value> = resp.json().await?;
    assert!(posts.is_empty());

    let new_post = json!({ "title": "t", "content": "c" });

    // No credential
    let resp = server.client.post(server.url("/api/posts")).json(&new_post).send().await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.text().await?.is_empty());

    // Tampered credential: corrupt the first signature character
    let sig_start = token.rfind('.').context("token has no signature")? + 1;
    let mut tampered = token.clone().into_bytes();
    tampered[sig_start] = if tampered[sig_start] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(tampered)?;

    let resp = server
        .client
        .post(server.url("/api/posts"))
        .bearer_auth(&tampered)
        .json(&new_post)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(resp.text().await?.is_empty());

    // Valid credential
    let resp = server
        .client
        .post(server.url("/api/posts"))
        .bearer_auth(&token)
        .json(&new_post)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    Ok(())
}

#[tokio::test]
async fn signup_rejections_are_400_with_message() -> Result<()> {
    let server = common::spawn_server().await?;

    let cases = [
        ("A", "a@gmail.com", "abcdef", "Only @nutech.edu.pk emails are allowed."),
        ("A", "a@nutech.edu.pk", "abc", "Password too short."),
        ("  ", "a@nutech.edu.pk", "abcdef", "Name is required."),
    ];
    for (name, email, password, message) in cases {
        let resp = server.signup(name, email, password).await?;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", email);
        let body: Value = resp.json().await?;
        assert_eq!(body["message"], message);
    }

    assert_eq!(server.signup("A", "a@nutech.edu.pk", "abcdef").await?.status(), StatusCode::CREATED);
    let resp = server.signup("A again", "A@NUTECH.edu.pk", "abcdef").await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await?;
    assert_eq!(body["message"], "User already exists.");
    Ok(())
}

#[tokio::test]
async fn missing_fields_are_rejected_not_crashed() -> Result<()> {
    let server = common::spawn_server().await?;

    let resp = server
        .client
        .post(server.url("/api/auth/signup"))
        .json(&json!({ "email": "a@nutech.edu.pk" }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn malformed_auth_bodies_are_400_json() -> Result<()> {
    let server = common::spawn_server().await?;

    for path in ["/api/auth/signup", "/api/auth/login"] {
        // Form body instead of JSON
        let resp = server
            .client
            .post(server.url(path))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body("email=a%40nutech.edu.pk&password=abcdef")
            .send()
            .await?;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", path);
        let body: Value = resp.json().await?;
        assert!(body["message"].is_string(), "{}", path);

        // Wrong field type
        let resp = server
            .client
            .post(server.url(path))
            .json(&json!({ "email": 5, "password": "abcdef" }))
            .send()
            .await?;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", path);
        let body: Value = resp.json().await?;
        assert!(body["message"].is_string(), "{}", path);

        // Broken JSON
        let resp = server
            .client
            .post(server.url(path))
            .header("Content-Type", "application/json")
            .body("{\"email\":")
            .send()
            .await?;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", path);
    }
    Ok(())
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() -> Result<()> {
    let server = common::spawn_server().await?;
    server.signup("A", "a@nutech.edu.pk", "abcdef").await?;

    let wrong = server.login("a@nutech.edu.pk", "abcdeg").await?;
    let unknown = server.login("nobody@nutech.edu.pk", "abcdef").await?;

    assert_eq!(wrong.status(), StatusCode::BAD_REQUEST);
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
    let wrong: Value = wrong.json().await?;
    let unknown: Value = unknown.json().await?;
    assert_eq!(wrong, unknown);
    assert_eq!(wrong["message"], "Invalid credentials.");
    Ok(())
}

#[tokio::test]
async fn me_returns_token_identity() -> Result<()> {
    let server = common::spawn_server().await?;
    let (token, id) = server.user("Sarah").await?;

    let resp = server
        .client
        .get(server.url("/api/auth/me"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let me: UserProfile = resp.json().await?;
    assert_eq!(me.id, id);
    assert_eq!(me.name, "Sarah");
    assert_eq!(me.email, "sarah@nutech.edu.pk");
    Ok(())
}

#[tokio::test]
async fn expired_token_is_forbidden() -> Result<()> {
    let server = common::spawn_server().await?;
    let (_, id) = server.user("Sarah").await?;

    let issuer = TokenIssuer::new(&server.config.security.jwt_secret);
    let identity = UserProfile {
        id,
        name: "Sarah".to_string(),
        email: "sarah@nutech.edu.pk".to_string(),
    };
    let issued_at = Utc::now() - Duration::seconds(TOKEN_TTL_SECS + 60);
    let stale = issuer.issue_at(&identity, issued_at)?;

    let resp = server
        .client
        .get(server.url("/api/auth/me"))
        .bearer_auth(&stale)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn token_from_another_secret_is_forbidden() -> Result<()> {
    let server = common::spawn_server().await?;

    let forged = TokenIssuer::new("someone-elses-secret").issue(&UserProfile {
        id: 1,
        name: "Mallory".to_string(),
        email: "mallory@nutech.edu.pk".to_string(),
    })?;

    let resp = server
        .client
        .get(server.url("/api/auth/me"))
        .bearer_auth(&forged)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn non_bearer_scheme_is_unauthenticated() -> Result<()> {
    let server = common::spawn_server().await?;

    let resp = server
        .client
        .get(server.url("/api/auth/me"))
        .header("Authorization", "Basic YTpi")
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
