//! Bearer credential extraction from HTTP request headers.

use axum::http::{HeaderMap, header};

use crate::AppError;

/// Extracts the token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively. The header must consist of
/// exactly the scheme and one non-empty token separated by a single space.
///
/// # Errors
///
/// Returns [`AppError::MissingCredential`] if the header is absent.
///
/// Returns [`AppError::MalformedCredential`] if:
/// - The header value is not valid UTF-8
/// - The scheme is not `Bearer`
/// - The token is empty or followed by extra parts
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert(header::AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
///
/// assert_eq!(extract_bearer(&headers).unwrap(), "abc.def.ghi");
/// ```
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::missing_credential("Authorization header is required"))?
        .to_str()
        .map_err(|_| AppError::malformed_credential("Authorization header is not valid text"))?;

    let mut parts = value.split(' ');
    let (Some(scheme), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(malformed());
    };

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(malformed());
    }

    Ok(token)
}

fn malformed() -> AppError {
    AppError::malformed_credential("Authorization header must be 'Bearer <token>'")
}
