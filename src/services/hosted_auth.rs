//! HTTP client for the hosted auth provider's REST API.
//!
//! Implements [`AuthProvider`] against a GoTrue-style endpoint surface
//! (`/auth/v1/signup`, `/auth/v1/token`, `/auth/v1/logout`, `/auth/v1/recover`,
//! `/auth/v1/user`). The provider owns trust decisions; this client only
//! carries credentials and maps responses.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::Deserialize;

use crate::services::auth_service::AuthProvider;
use crate::types::auth::AuthSession;
use crate::types::errors::AuthError;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: UserInfo,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "error_description", alias = "msg", alias = "message")]
    error: Option<String>,
}

/// Hosted auth provider client.
pub struct HostedAuthProvider {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
    // Last session returned by the provider; consulted by current_session.
    session: Mutex<Option<AuthSession>>,
}

impl HostedAuthProvider {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
            session: Mutex::new(None),
        }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn store_session(&self, session: &AuthSession) {
        let mut guard = self.session.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(session.clone());
    }

    fn stored_session(&self) -> Option<AuthSession> {
        self.session
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn clear_session(&self) {
        let mut guard = self.session.lock().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    async fn provider_error(response: reqwest::Response) -> AuthError {
        let status = response.status();
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| format!("provider returned status {}", status));
        AuthError::ProviderError(message)
    }

    fn session_from_token(token: TokenResponse) -> AuthSession {
        let expires_at = token
            .expires_at
            .or_else(|| token.expires_in.map(|secs| Self::now() + secs))
            .unwrap_or_else(|| Self::now() + 3600);
        AuthSession {
            user_id: token.user.id,
            access_token: token.access_token,
            expires_at,
        }
    }

    async fn token_request(
        &self,
        url: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        let response = self
            .http
            .post(url)
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::provider_error(response).await);
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::ProviderError(format!("unexpected response shape: {}", e)))?;

        let session = Self::session_from_token(token);
        self.store_session(&session);
        Ok(session)
    }
}

#[async_trait]
impl AuthProvider for HostedAuthProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        self.token_request(&self.endpoint("signup"), email, password)
            .await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        self.token_request(
            &self.endpoint("token?grant_type=password"),
            email,
            password,
        )
        .await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(session) = self.stored_session() else {
            return Ok(());
        };

        let response = self
            .http
            .post(self.endpoint("logout"))
            .header("apikey", &self.api_key)
            .bearer_auth(&session.access_token)
            .send()
            .await
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;

        // The local session is gone either way
        self.clear_session();

        if !response.status().is_success() {
            return Err(Self::provider_error(response).await);
        }
        Ok(())
    }

    async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        let response = self
            .http
            .post(self.endpoint("recover"))
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::provider_error(response).await);
        }
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<AuthSession>, AuthError> {
        let Some(session) = self.stored_session() else {
            return Ok(None);
        };

        if session.expires_at <= Self::now() {
            self.clear_session();
            return Ok(None);
        }

        let response = self
            .http
            .get(self.endpoint("user"))
            .header("apikey", &self.api_key)
            .bearer_auth(&session.access_token)
            .send()
            .await
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            self.clear_session();
            return Ok(None);
        }

        Ok(Some(session))
    }
}
