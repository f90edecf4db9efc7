//! One access-log line per request.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use crate::utils::client_ip::client_key;

/// Logs method, path, client, status and latency once the rest of the chain
/// has answered. `/favicon.ico` is skipped.
///
/// The state is the `behind_proxy` flag used to resolve the client address.
pub async fn layer(State(behind_proxy): State<bool>, req: Request, next: Next) -> Response {
    if req.uri().path() == "/favicon.ico" {
        return next.run(req).await;
    }

    let start = Instant::now();

    let client = client_key(&req, behind_proxy);
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let version = format!("{:?}", req.version());

    let ua = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let ms = start.elapsed().as_millis();

    tracing::info!(
        r#"{client} "{method} {path} {version}" {status} "{ua}" {ms}ms"#,
        client = client,
        method = method,
        path = path,
        version = version,
        status = status,
        ua = ua,
        ms = ms,
    );

    response
}
