//! Command line surface.

use clap::Parser;
use std::path::PathBuf;

/// A simple HTTP server for WebGPU development.
///
/// Serves static files with the Cross-Origin-Opener-Policy and
/// Cross-Origin-Embedder-Policy response headers required for cross-origin
/// isolation. Only GET, HEAD, and OPTIONS requests are served.
#[derive(Debug, Clone, Parser)]
#[command(name = "isoserve", version, about)]
pub struct Args {
    /// Directory to serve files from (default: current directory)
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Port number to serve on
    #[arg(long, default_value_t = 8000)]
    pub port: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_cwd_and_port_8000() {
        let args = Args::parse_from(["isoserve"]);
        assert_eq!(args.directory, PathBuf::from("."));
        assert_eq!(args.port, 8000);
    }

    #[test]
    fn accepts_positional_directory_and_port() {
        let args = Args::parse_from(["isoserve", "public", "--port", "9001"]);
        assert_eq!(args.directory, PathBuf::from("public"));
        assert_eq!(args.port, 9001);
    }
}
