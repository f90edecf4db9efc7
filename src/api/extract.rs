//! Request extractors that report rejections through [`AppError`].

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::api::middleware::body_limit::BodyLimit;
use crate::error::AppError;

/// axum's own body ceiling, in effect on routes without a body-limit stage.
const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// JSON request body whose rejections use the API error envelope.
///
/// Behaves like [`axum::Json`] but a body that runs past the ceiling while
/// being read answers `413 payload_too_large`, the same as an oversized
/// declared `Content-Length`. Unreadable or mistyped JSON answers
/// `400 validation_error`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let limit = req
            .extensions()
            .get::<BodyLimit>()
            .map_or(DEFAULT_BODY_LIMIT, |BodyLimit(limit)| *limit);

        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejection_to_error(rejection, limit)),
        }
    }
}

fn rejection_to_error(rejection: JsonRejection, limit: usize) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!(limit, "request body too large");
        return AppError::body_too_large(limit);
    }

    AppError::bad_request("Invalid JSON body", json!({ "reason": rejection.body_text() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde_json::Value;

    async fn extract(body: &'static str, limit: Option<usize>) -> Result<Value, AppError> {
        let mut req = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        if let Some(limit) = limit {
            req.extensions_mut().insert(BodyLimit(limit));
        }

        JsonBody::<Value>::from_request(req, &())
            .await
            .map(|JsonBody(value)| value)
    }

    #[tokio::test]
    async fn test_valid_body() {
        let value = extract(r#"{"a":1}"#, None).await.unwrap();
        assert_eq!(value["a"], 1);
    }

    #[tokio::test]
    async fn test_syntax_error_is_validation_error() {
        let err = extract("{not json", None).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_content_type_is_validation_error() {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from("{}"))
            .unwrap();

        let err = JsonBody::<Value>::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_overrun_while_reading_is_payload_too_large() {
        let body = Body::new(http_body_util::Limited::new(
            Body::from(r#"{"title":"this body is longer than sixteen bytes"}"#),
            16,
        ));
        let mut req = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        req.extensions_mut().insert(BodyLimit(16));

        let err = JsonBody::<Value>::from_request(req, &()).await.unwrap_err();

        match err {
            AppError::BodyTooLarge { details, .. } => assert_eq!(details["limit_bytes"], 16),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
