//! Username/password login against the directory service.

use serde::{Deserialize, Serialize};

use crate::client::DirectoryClient;
use crate::error::{AppError, Result};
use crate::session::{SessionStore, Token};

const DEFAULT_LOGIN_ERROR: &str = "Login failed";

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Deserialize)]
struct LoginErrorBody {
    message: Option<String>,
}

/// Exchange credentials for a session token.
///
/// On success the token is stored in the client's session and mirrored into
/// its cookie jar.
pub async fn login(client: &DirectoryClient, username: &str, password: &str) -> Result<Token> {
    let response = client
        .http()
        .post(client.login_url())
        .json(&LoginRequest { username, password })
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let message = response
            .json::<LoginErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOGIN_ERROR.to_string());
        tracing::warn!("Login rejected for '{}' ({}): {}", username, status, message);
        return Err(AppError::login_failed(message));
    }

    let body: LoginResponse = response.json().await?;
    let token = Token::new(body.token);
    if token.as_str().is_empty() {
        return Err(AppError::login_failed(DEFAULT_LOGIN_ERROR));
    }

    client.session().set_token(token.clone());
    client.mirror_session_cookie(&token);
    tracing::info!("Logged in as '{}'", username);

    Ok(token)
}

/// End the current session and expire its cookie.
pub fn logout(client: &DirectoryClient) {
    client.session().clear();
    client.clear_session_cookie();
    tracing::info!("Logged out");
}
