//! Repository trait for the upstream credential check.

use crate::domain::entities::Subject;
use crate::error::AppError;
use async_trait::async_trait;

/// Verifies login credentials and yields the matching user id.
///
/// Credential validation is opaque to the token pipeline: the token service
/// only ever sees the resulting [`Subject`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCredentialRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Returns the user id when `email`/`password` match a user.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(id))` on a match
    /// - `Ok(None)` for an unknown email or a wrong password (not distinguished)
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn verify(&self, email: &str, password: &str) -> Result<Option<Subject>, AppError>;

    /// Records a successful login.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn record_login(&self, user_id: Subject) -> Result<(), AppError>;
}
