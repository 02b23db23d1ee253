// Server configuration
// Resolved once at startup, immutable for the process lifetime.
// Handlers receive it behind an Arc.

use crate::cli::Args;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Immutable server configuration: the resolved serve root and the port.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    /// Absolute path below which all served files are resolved
    pub root: PathBuf,
    /// TCP port to listen on
    pub port: u16,
}

/// Fatal configuration failure, reported before any socket is opened.
#[derive(Debug)]
pub enum ConfigError {
    /// The serve directory does not exist or is not a directory
    NotADirectory(PathBuf),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotADirectory(path) => {
                write!(f, "Directory '{}' does not exist.", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ServeConfig {
    /// Resolve and validate the CLI arguments.
    ///
    /// The directory is resolved to an absolute path; the error names the
    /// resolved path so the operator sees what was actually checked.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        match args.directory.canonicalize() {
            Ok(root) if root.is_dir() => Ok(Self {
                root,
                port: args.port,
            }),
            Ok(root) => Err(ConfigError::NotADirectory(root)),
            Err(_) => Err(ConfigError::NotADirectory(absolutize(&args.directory))),
        }
    }

    /// Listen address across all local interfaces.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// Best-effort absolute form of a path that could not be canonicalized.
fn absolutize(path: &std::path::Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_existing_directory_to_absolute_path() {
        let args = Args {
            directory: PathBuf::from("."),
            port: 8000,
        };
        let cfg = ServeConfig::from_args(&args).unwrap();
        assert!(cfg.root.is_absolute());
        assert!(cfg.root.is_dir());
    }

    #[test]
    fn missing_directory_is_reported_with_absolute_path() {
        let args = Args {
            directory: PathBuf::from("no-such-dir-isoserve"),
            port: 8000,
        };
        let err = ServeConfig::from_args(&args).unwrap_err();
        let ConfigError::NotADirectory(path) = err;
        assert!(path.is_absolute());
        assert!(path.ends_with("no-such-dir-isoserve"));
    }

    #[test]
    fn binds_all_interfaces_on_requested_port() {
        let cfg = ServeConfig {
            root: PathBuf::from("/"),
            port: 9123,
        };
        assert_eq!(cfg.socket_addr().to_string(), "0.0.0.0:9123");
    }
}
