//! Login and registration, used before an authenticated `InterviewClient`
//! exists.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

use neurovisa_core::api::ApiError;

use crate::client::{check, transport};

#[derive(serde::Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// The authenticated user's profile from `GET /users/me`.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub target_country: Option<String>,
    #[serde(default)]
    pub visa_type: Option<String>,
}

/// Registration payload for `POST /users/`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visa_type: Option<String>,
}

/// Exchange credentials for a bearer token. The endpoint follows the OAuth2
/// password form convention, so the email travels as `username`.
pub async fn login(
    base_url: &str,
    email: &str,
    password: &SecretString,
) -> Result<SecretString, ApiError> {
    let http = Client::new();
    let resp = http
        .post(format!("{}/auth/login", base_url.trim_end_matches('/')))
        .form(&[("username", email), ("password", password.expose_secret())])
        .send()
        .await
        .map_err(transport)?;
    let token = check(resp)
        .await?
        .json::<TokenResponse>()
        .await
        .map_err(transport)?;
    tracing::info!(email, "logged in");
    Ok(SecretString::from(token.access_token))
}

pub async fn register(base_url: &str, registration: &Registration) -> Result<UserProfile, ApiError> {
    let http = Client::new();
    let resp = http
        .post(format!("{}/users/", base_url.trim_end_matches('/')))
        .json(registration)
        .send()
        .await
        .map_err(transport)?;
    check(resp)
        .await?
        .json::<UserProfile>()
        .await
        .map_err(transport)
}

pub async fn me(base_url: &str, token: &SecretString) -> Result<UserProfile, ApiError> {
    let http = Client::new();
    let resp = http
        .get(format!("{}/users/me", base_url.trim_end_matches('/')))
        .bearer_auth(token.expose_secret())
        .send()
        .await
        .map_err(transport)?;
    check(resp)
        .await?
        .json::<UserProfile>()
        .await
        .map_err(transport)
}
