use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_ERROR_LOG: &str = "error.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub cors_origins: Vec<String>,
    /// Extra log file receiving INFO and above, without ANSI colours.
    pub error_log: Option<PathBuf>,
    pub production: bool,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unparseable values fall back
    /// to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("FYYUR_BIND_ADDR")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| {
                DEFAULT_BIND_ADDR
                    .parse()
                    .unwrap_or(SocketAddr::from(([0, 0, 0, 0], 5000)))
            });

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let production = lookup("FYYUR_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let error_log = match lookup("FYYUR_ERROR_LOG") {
            Some(path) if path.trim().is_empty() => None,
            Some(path) => Some(PathBuf::from(path)),
            None if production => Some(PathBuf::from(DEFAULT_ERROR_LOG)),
            None => None,
        };

        Self {
            bind_addr,
            cors_origins,
            error_log,
            production,
        }
    }
}
