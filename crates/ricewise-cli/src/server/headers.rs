//! Response headers that stop browsers and proxies from caching answers.

use axum::http::header::{self, HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use ricewise_core::epoch_seconds;

const NO_STORE: &str = "no-store, no-cache, must-revalidate, max-age=0";

/// Render `body` with no-cache headers and an `X-Timestamp` of the current epoch second.
pub fn no_cache(body: impl IntoResponse) -> Response {
    let mut response = body.into_response();
    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_STORE));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    headers.insert(
        HeaderName::from_static("x-timestamp"),
        HeaderValue::from(epoch_seconds()),
    );
    response
}
