//! Token service: issuance, validation and revocation of identity tokens.
//!
//! Tokens are HS256 JWTs. Access and refresh tokens are signed with
//! different secrets, so holding one never lets a caller forge the other.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde_json::json;
use thiserror::Error;

use crate::domain::entities::{Claims, Subject, TokenClass, TokenPair};
use crate::domain::repositories::RevocationStore;
use crate::error::AppError;

/// Validation and signing failures.
///
/// Everything other than an elapsed `exp` collapses into [`TokenError::Invalid`]
/// so callers cannot tell which check failed.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Expired => AppError::expired_token(),
            TokenError::Invalid => AppError::invalid_token(),
            TokenError::Signing(err) => {
                tracing::error!(error = %err, "token signing failed");
                AppError::internal("Failed to generate tokens", json!({}))
            }
        }
    }
}

/// Static token configuration, loaded once at startup.
#[derive(Clone)]
pub struct TokenSettings {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub issuer: String,
    /// Revoke the presented refresh token whenever it is exchanged.
    pub rotate_refresh_tokens: bool,
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("access_secret", &"***")
            .field("refresh_secret", &"***")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("issuer", &self.issuer)
            .field("rotate_refresh_tokens", &self.rotate_refresh_tokens)
            .finish()
    }
}

struct ClassKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl ClassKeys {
    fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }
}

/// Mints, verifies and revokes identity tokens.
///
/// Issuance is stateless. The only shared mutable state is the injected
/// [`RevocationStore`]; keys and lifetimes are immutable after construction.
pub struct TokenService {
    access: ClassKeys,
    refresh: ClassKeys,
    issuer: String,
    rotate_refresh_tokens: bool,
    validation: Validation,
    revocations: Arc<dyn RevocationStore>,
}

impl TokenService {
    /// Creates a token service.
    ///
    /// # Arguments
    ///
    /// - `settings` - secrets, lifetimes and issuer
    /// - `revocations` - store consulted on every validation
    pub fn new(settings: TokenSettings, revocations: Arc<dyn RevocationStore>) -> Self {
        // Time bounds are checked by hand so that an expired token is only
        // reported as such once its signature has been verified.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "sub"]);
        validation.set_issuer(&[settings.issuer.as_str()]);

        Self {
            access: ClassKeys::new(&settings.access_secret, settings.access_ttl),
            refresh: ClassKeys::new(&settings.refresh_secret, settings.refresh_ttl),
            issuer: settings.issuer,
            rotate_refresh_tokens: settings.rotate_refresh_tokens,
            validation,
            revocations,
        }
    }

    fn keys(&self, class: TokenClass) -> &ClassKeys {
        match class {
            TokenClass::Access => &self.access,
            TokenClass::Refresh => &self.refresh,
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Issues an access/refresh pair for `subject`, valid from now.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if encoding fails.
    pub fn issue_pair(&self, subject: Subject) -> Result<TokenPair, TokenError> {
        self.issue_pair_at(subject, Utc::now())
    }

    /// Issues a pair as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if encoding fails.
    pub fn issue_pair_at(
        &self,
        subject: Subject,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, TokenError> {
        let access_token = self.mint(subject, TokenClass::Access, now)?;
        let refresh_token = self.mint(subject, TokenClass::Refresh, now)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.access.ttl.num_seconds(),
        })
    }

    fn mint(
        &self,
        subject: Subject,
        class: TokenClass,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        self.mint_with_keys(subject, class, self.keys(class), now)
    }

    fn mint_with_keys(
        &self,
        subject: Subject,
        class: TokenClass,
        keys: &ClassKeys,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject.to_string(),
            token_type: class,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + keys.ttl).timestamp(),
            iss: self.issuer.clone(),
            jti: hex::encode(rand::random::<[u8; 16]>()),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(TokenError::Signing)
    }

    /// Validates an access token.
    ///
    /// # Errors
    ///
    /// - [`TokenError::Expired`] if the token is genuine but past `exp`
    /// - [`TokenError::Invalid`] for any other failure
    pub fn validate_access(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_at(token, TokenClass::Access, Utc::now())
    }

    /// Validates a refresh token, rejecting revoked ones.
    ///
    /// # Errors
    ///
    /// See [`Self::validate_access`].
    pub fn validate_refresh(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_at(token, TokenClass::Refresh, Utc::now())
    }

    /// Validates `token` as `class` at time `now`.
    ///
    /// Checks run in order: signature and structure, issuer, class,
    /// revocation, not-before, expiry.
    ///
    /// # Errors
    ///
    /// See [`Self::validate_access`].
    pub fn validate_at(
        &self,
        token: &str,
        class: TokenClass,
        now: DateTime<Utc>,
    ) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.keys(class).decoding, &self.validation)
            .map_err(|e| {
                let reason = match e.kind() {
                    ErrorKind::InvalidSignature => "signature",
                    ErrorKind::InvalidIssuer => "issuer",
                    ErrorKind::MissingRequiredClaim(_) => "missing_claim",
                    _ => "malformed",
                };
                tracing::debug!(class = %class, reason, "token rejected");
                TokenError::Invalid
            })?
            .claims;

        if claims.token_type != class {
            tracing::debug!(class = %class, reason = "class", "token rejected");
            return Err(TokenError::Invalid);
        }

        if claims.subject().is_none() {
            tracing::debug!(class = %class, reason = "subject", "token rejected");
            return Err(TokenError::Invalid);
        }

        if self.revocations.is_revoked(token) {
            tracing::debug!(class = %class, reason = "revoked", "token rejected");
            return Err(TokenError::Invalid);
        }

        if claims.is_premature_at(now) {
            tracing::debug!(class = %class, reason = "not_yet_valid", "token rejected");
            return Err(TokenError::Invalid);
        }

        if claims.is_expired_at(now) {
            tracing::debug!(class = %class, reason = "expired", "token rejected");
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Revokes a refresh token. Idempotent; no signature check is made.
    pub fn revoke(&self, token: &str) {
        if self.revocations.mark_revoked(token, Utc::now()) {
            tracing::info!("refresh token revoked");
        }
    }

    /// Exchanges a valid refresh token for a brand-new pair.
    ///
    /// Without rotation the presented token stays valid until it expires or
    /// is revoked. With rotation it is revoked first, and only the caller
    /// that performed the revocation receives a pair; a concurrent second
    /// use of the same token fails.
    ///
    /// # Errors
    ///
    /// - [`TokenError::Expired`] / [`TokenError::Invalid`] from validation
    /// - [`TokenError::Invalid`] if rotation is on and the token was already consumed
    /// - [`TokenError::Signing`] if minting the replacement fails
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, TokenError> {
        let claims = self.validate_refresh(refresh_token)?;
        let subject = claims.subject().ok_or(TokenError::Invalid)?;

        if self.rotate_refresh_tokens && !self.revocations.mark_revoked(refresh_token, Utc::now())
        {
            tracing::warn!(user_id = subject, "refresh token reused during rotation");
            return Err(TokenError::Invalid);
        }

        self.issue_pair(subject)
    }

    /// Evicts revocation entries that can no longer match a live token.
    ///
    /// A token revoked at `t` was issued before `t`, so it has expired by
    /// `t + refresh_ttl`.
    pub fn sweep_revocations(&self, now: DateTime<Utc>) -> usize {
        self.revocations.evict_before(now - self.refresh.ttl)
    }

    /// Number of entries in the revocation set.
    pub fn revoked_count(&self) -> usize {
        self.revocations.len()
    }
}
