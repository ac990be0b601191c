//! Shared HTTP plumbing for the Capitol Trades connectors.

use std::time::Duration;

use reqwest::Response;
use rotunda_core::RotundaError;

/// Browser-like identification; the document endpoint serves a reduced page to
/// unknown clients.
pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub(crate) fn build_client(accept: &'static str) -> reqwest::Client {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static(accept),
    );
    headers.insert(
        reqwest::header::ACCEPT_LANGUAGE,
        reqwest::header::HeaderValue::from_static("en-US,en;q=0.9"),
    );
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .expect("reqwest client construction only fails on TLS backend misconfiguration")
}

/// Map a reqwest failure into the transport classification.
pub(crate) fn transport(err: &reqwest::Error) -> RotundaError {
    RotundaError::transport(err.to_string())
}

/// Pass a successful response through; classify everything else, honoring a
/// `Retry-After` seconds hint on 429s.
pub(crate) fn check_status(response: Response) -> Result<Response, RotundaError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let retry_after = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs);
    Err(RotundaError::from_status(status.as_u16(), retry_after))
}
