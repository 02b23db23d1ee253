//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, static file
//! dispatch, access logging, and the isolation-header decoration every
//! response passes through.

use crate::config::ServeConfig;
use crate::handler::{headers, static_files};
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Main entry point for HTTP request handling.
///
/// Request-level failures are turned into status codes here; the error type
/// is `Infallible` so nothing can escape past the handler boundary.
pub async fn handle_request<B>(
    req: Request<B>,
    config: Arc<ServeConfig>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let http_version = version_str(req.version());

    let response = if method == Method::GET || method == Method::HEAD {
        static_files::serve(&config, &path, method == Method::HEAD).await
    } else if method == Method::OPTIONS {
        http::build_options_response()
    } else {
        logger::log_warning(&format!("Method not allowed: {method}"));
        http::build_405_response()
    };

    // Every response path, errors included, gets the isolation headers
    let response = headers::apply_isolation(response);

    let body_bytes = response.body().size_hint().exact().unwrap_or(0);
    logger::log_access(
        &peer_addr,
        method.as_str(),
        &path,
        http_version,
        response.status().as_u16(),
        body_bytes,
    );

    Ok(response)
}

fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}
