//! Logger module
//!
//! Startup banner and access logs go to stdout; warnings, errors, and
//! operator diagnostics go to stderr. The server is stateless, so there is
//! no file-based logging.

use crate::config::ServeConfig;
use chrono::Local;
use std::net::SocketAddr;

pub fn log_server_start(config: &ServeConfig) {
    println!("Serving files from: {}", config.root.display());
    println!("Web server available at: http://localhost:{}", config.port);
    println!(
        "Ensure your browser supports WebGPU (e.g., Chrome, Edge, Firefox Nightly with flags)."
    );
    println!("Press CTRL-C to stop the server.");
}

pub fn log_stopped_by_user() {
    println!("\nServer stopped by user (Ctrl+C).");
}

/// Operator guidance when the requested port is already bound elsewhere.
pub fn log_port_in_use(port: u16) {
    eprintln!("\nERROR: Port {port} is already in use by another process.");
    eprintln!("To find which process is using the port, run:");
    eprintln!("  sudo ss -tulnp | grep :{port}");
    eprintln!("  (Look for the PID in the output, e.g., 'pid=12345')");
    eprintln!("\nTo attempt to kill the process gracefully (replace 12345 with the actual PID):");
    eprintln!("  kill 12345");
    eprintln!("\nAlternatively, a more direct (but requires `lsof`) command to kill the process:");
    eprintln!("  sudo kill $(sudo lsof -t -i:{port})");
    eprintln!("\nAfter stopping the other process, try running this server again.");
}

pub fn log_startup_error(message: &str) {
    eprintln!("ERROR: {message}");
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[ERROR] Failed to serve connection: {err:?}");
}

/// Common Log Format access line:
/// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
pub fn log_access(
    peer_addr: &SocketAddr,
    method: &str,
    path: &str,
    http_version: &str,
    status: u16,
    body_bytes: u64,
) {
    println!(
        "{} - - [{}] \"{} {} HTTP/{}\" {} {}",
        peer_addr.ip(),
        Local::now().format("%d/%b/%Y:%H:%M:%S %z"),
        method,
        path,
        http_version,
        status,
        body_bytes,
    );
}
