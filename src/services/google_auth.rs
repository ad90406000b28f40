use serde::Deserialize;
use thiserror::Error;

use crate::core::config::Settings;

#[derive(Debug, Error)]
pub(crate) enum AuthError {
    #[error("google sign-in is not configured")]
    NotConfigured,
    #[error("invalid google id token")]
    InvalidToken,
    #[error("token email does not match the supplied email")]
    EmailMismatch,
    #[error("token verification request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    email: String,
}

/// Verifies Google ID tokens against the tokeninfo endpoint.
#[derive(Debug, Clone)]
pub(crate) struct GoogleAuthService {
    client: reqwest::Client,
    client_id: String,
    tokeninfo_url: String,
}

impl GoogleAuthService {
    pub(crate) fn from_settings(settings: &Settings) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id: settings.google().client_id.clone(),
            tokeninfo_url: settings.google().tokeninfo_url.clone(),
        }
    }

    /// Checks the token with Google and confirms it was issued for this
    /// application and for the claimed email address.
    pub(crate) async fn verify(&self, id_token: &str, email: &str) -> Result<(), AuthError> {
        if self.client_id.is_empty() {
            return Err(AuthError::NotConfigured);
        }

        let response = self
            .client
            .get(&self.tokeninfo_url)
            .query(&[("id_token", id_token)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::InvalidToken);
        }

        let info: TokenInfo = response.json().await.map_err(|_| AuthError::InvalidToken)?;

        if info.aud != self.client_id {
            return Err(AuthError::InvalidToken);
        }

        if !info.email.eq_ignore_ascii_case(email.trim()) {
            return Err(AuthError::EmailMismatch);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthError, GoogleAuthService};

    #[tokio::test]
    async fn missing_client_id_is_rejected_before_any_request() {
        let service = GoogleAuthService {
            client: reqwest::Client::new(),
            client_id: String::new(),
            tokeninfo_url: "http://localhost:9/tokeninfo".to_string(),
        };

        let result = service.verify("token", "user@example.com").await;
        assert!(matches!(result, Err(AuthError::NotConfigured)));
    }
}
