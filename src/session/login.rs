use crate::api::client::RequestOptions;
use crate::core::error::{LoginError, GENERIC_ERROR_MESSAGE};
use crate::core::state::PortalState;
use crate::session::context::CurrentUser;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Token payload returned by a successful login
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub user: CurrentUser,
}

#[derive(Debug, Deserialize)]
struct LoginFailure {
    error: Option<String>,
    message: Option<String>,
}

/// Exchange credentials for a session and persist it
pub async fn login(state: &PortalState, username: &str, password: &str) -> Result<CurrentUser, LoginError> {
    let endpoint = &state.config.portal.login_endpoint;

    let options = RequestOptions::new(Method::POST)
        .json(&LoginRequest { username, password })
        .map_err(|e| LoginError::InvalidResponse(e.to_string()))?;

    let response = state.client.fetch(endpoint, options).await?;
    let status = response.status();

    if !status.is_success() {
        let message = response
            .json::<LoginFailure>()
            .await
            .ok()
            .and_then(|body| body.error.or(body.message))
            .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());

        warn!(username, status = %status, error = %message, "Login rejected");
        return Err(LoginError::Rejected { status, message });
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| LoginError::InvalidResponse(e.to_string()))?;

    if token.access_token.is_empty() {
        return Err(LoginError::InvalidResponse("empty access_token".to_string()));
    }

    state
        .session
        .store(state.storage.as_ref(), &token.access_token, token.user.clone())?;

    info!(
        username,
        expires_in = ?token.expires_in,
        token_type = ?token.token_type,
        "Signed in"
    );

    Ok(token.user)
}
