// Accept loop
// One spawned task per connection. Accept errors are logged and the loop
// continues; a shutdown notification stops the loop cleanly and releases
// the listening socket.

use crate::config::ServeConfig;
use crate::logger;
use crate::server::connection;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

/// Run the accept loop until the shutdown signal fires.
pub async fn run(listener: TcpListener, config: Arc<ServeConfig>, shutdown: Arc<Notify>) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connection::handle_connection(stream, peer_addr, Arc::clone(&config));
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = shutdown.notified() => {
                logger::log_stopped_by_user();
                // Dropping the listener frees the port immediately
                return;
            }
        }
    }
}
