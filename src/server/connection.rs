// Per-connection serving
// Wraps the accepted stream for hyper and serves HTTP/1.1 with keep-alive.
// Connection failures are logged, never fatal to the server.

use crate::config::ServeConfig;
use crate::handler::router;
use crate::logger;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;

/// Serve an accepted connection in its own task.
pub fn handle_connection(stream: TcpStream, peer_addr: SocketAddr, config: Arc<ServeConfig>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let service =
            service_fn(move |req| router::handle_request(req, Arc::clone(&config), peer_addr));

        if let Err(err) = http1::Builder::new()
            .keep_alive(true)
            .serve_connection(io, service)
            .await
        {
            logger::log_connection_error(&err);
        }
    });
}
