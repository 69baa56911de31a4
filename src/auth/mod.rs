use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Resolves bearer tokens to stable user identifiers
///
/// Credential verification lives entirely in the identity provider; this
/// service only forwards the token and trusts the identifier it gets back.
#[async_trait::async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, token: &str) -> AppResult<String>;
}

/// Authenticator backed by an OIDC userinfo endpoint (Auth0-style)
#[derive(Clone)]
pub struct UserinfoAuthenticator {
    http_client: reqwest::Client,
    userinfo_url: String,
}

#[derive(Debug, Deserialize)]
struct UserinfoResponse {
    sub: String,
}

impl UserinfoAuthenticator {
    pub fn new(userinfo_url: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            userinfo_url,
        }
    }
}

#[async_trait::async_trait]
impl Authenticator for UserinfoAuthenticator {
    async fn authenticate(&self, token: &str) -> AppResult<String> {
        let response = self
            .http_client
            .get(&self.userinfo_url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::Unauthorized(format!("Identity provider unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Unauthorized("Invalid bearer token".to_string()));
        }

        let userinfo: UserinfoResponse = response
            .json()
            .await
            .map_err(|e| AppError::Unauthorized(format!("Malformed userinfo response: {}", e)))?;

        Ok(userinfo.sub)
    }
}

/// Authenticated user identifier, inserted into request extensions by
/// [`require_auth`]
#[derive(Clone, Debug)]
pub struct CurrentUser(pub String);

/// Middleware guarding all user-scoped routes.
///
/// Extracts the `Authorization: Bearer` token, resolves it through the
/// configured [`Authenticator`] and hands the owner id to the handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let token = header
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Authorization token missing".to_string()))?;

    let owner = state.authenticator.authenticate(token).await?;
    request.extensions_mut().insert(CurrentUser(owner));

    Ok(next.run(request).await)
}
