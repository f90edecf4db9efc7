//! Login, refresh and logout orchestration.

use std::sync::Arc;

use thiserror::Error;

use crate::application::services::TokenService;
use crate::domain::RequestDeadline;
use crate::domain::entities::{Subject, TokenPair};
use crate::domain::repositories::CredentialRepository;
use crate::error::AppError;

/// Failures of the upstream credential check.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Unknown email or wrong password; the two are not distinguished.
    #[error("invalid email or password")]
    Mismatch,
    #[error("credential store unavailable: {0}")]
    Unavailable(#[source] AppError),
}

impl From<CredentialError> for AppError {
    fn from(e: CredentialError) -> Self {
        match e {
            CredentialError::Mismatch => AppError::invalid_credentials(),
            CredentialError::Unavailable(inner) => inner,
        }
    }
}

/// Service behind the `/auth` endpoints and the authentication stage.
///
/// The credential check is delegated to a [`CredentialRepository`]; this
/// service only turns its answer (a user id) into tokens.
pub struct AuthService {
    tokens: Arc<TokenService>,
    credentials: Arc<dyn CredentialRepository>,
}

impl AuthService {
    /// Creates a new authentication service.
    pub fn new(tokens: Arc<TokenService>, credentials: Arc<dyn CredentialRepository>) -> Self {
        Self {
            tokens,
            credentials,
        }
    }

    /// Verifies `email`/`password` and issues a fresh token pair.
    ///
    /// Both credential store calls are bounded by `deadline`. A failure to
    /// record the login timestamp is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidCredentials`] on a mismatch.
    /// Returns [`AppError::RequestTimedOut`] if the credential check outlives `deadline`.
    /// Returns [`AppError::Internal`] on database or signing errors.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        deadline: &RequestDeadline,
    ) -> Result<TokenPair, AppError> {
        let user_id = self.verify(email, password, deadline).await?;

        if let Err(e) = deadline
            .bound(self.credentials.record_login(user_id))
            .await
        {
            tracing::warn!(user_id, error = %e, "failed to record login");
        }

        let pair = self.tokens.issue_pair(user_id)?;
        tracing::info!(user_id, "user logged in");

        Ok(pair)
    }

    async fn verify(
        &self,
        email: &str,
        password: &str,
        deadline: &RequestDeadline,
    ) -> Result<Subject, CredentialError> {
        deadline
            .bound(self.credentials.verify(email, password))
            .await
            .map_err(CredentialError::Unavailable)?
            .ok_or(CredentialError::Mismatch)
    }

    /// Exchanges a refresh token for a new pair.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ExpiredToken`] or [`AppError::InvalidToken`].
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        Ok(self.tokens.refresh(refresh_token)?)
    }

    /// Revokes a refresh token. Always succeeds.
    pub fn logout(&self, refresh_token: &str) {
        self.tokens.revoke(refresh_token);
    }
}
