use clap::Parser;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::Notify;

mod cli;
mod config;
mod handler;
mod http;
mod logger;
mod server;

fn main() -> ExitCode {
    let args = cli::Args::parse();

    // Validate the serve directory before any socket is opened
    let cfg = match config::ServeConfig::from_args(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            logger::log_startup_error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            logger::log_startup_error(&format!("Failed to start async runtime: {e}"));
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(serve(cfg))
}

async fn serve(cfg: config::ServeConfig) -> ExitCode {
    let addr = cfg.socket_addr();

    let listener = match server::create_listener(addr) {
        Ok(listener) => listener,
        Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
            logger::log_port_in_use(cfg.port);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            logger::log_startup_error(&format!("An unexpected OS error occurred: {e}"));
            return ExitCode::FAILURE;
        }
    };

    let config = Arc::new(cfg);
    logger::log_server_start(&config);

    let shutdown = Arc::new(Notify::new());
    server::signal::start_signal_handler(Arc::clone(&shutdown));

    server::server_loop::run(listener, config, shutdown).await;
    ExitCode::SUCCESS
}
