//! Cross-origin isolation response decorator
//!
//! Browsers only grant cross-origin isolation (needed for SharedArrayBuffer
//! and high-resolution timers in WebGPU apps) when both the
//! Cross-Origin-Opener-Policy and Cross-Origin-Embedder-Policy headers are
//! present. The decorator is applied at the connection's service boundary so
//! every response carries them, error responses included.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderName, HeaderValue};
use hyper::Response;

const OPENER_POLICY: HeaderName = HeaderName::from_static("cross-origin-opener-policy");
const EMBEDDER_POLICY: HeaderName = HeaderName::from_static("cross-origin-embedder-policy");

/// Attach the two cross-origin isolation headers to a response.
///
/// Unconditional: applies to every status code.
pub fn apply_isolation(mut response: Response<Full<Bytes>>) -> Response<Full<Bytes>> {
    let headers = response.headers_mut();
    headers.insert(OPENER_POLICY, HeaderValue::from_static("same-origin"));
    headers.insert(EMBEDDER_POLICY, HeaderValue::from_static("require-corp"));
    response
}
