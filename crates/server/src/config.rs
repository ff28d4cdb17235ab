//! Server configuration
//!
//! This module provides the listener configuration and default port for the
//! Ballots HTTP server.

use crate::error::{Result, ServerError};

/// Standard port assignments
pub mod ports {
    /// Default HTTP port
    pub const HTTP: u16 = 8080;
}

/// Server listener configuration
///
/// # Example
///
/// ```
/// use server::config::ServerConfig;
///
/// let config = ServerConfig::http_only("localhost", 8080);
/// assert_eq!(config.listen_addr(), "localhost:8080");
///
/// let config = ServerConfig::parse_listen_addr(":9000").unwrap();
/// assert_eq!(config.host, "0.0.0.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// HTTP port (0 picks an ephemeral port)
    pub http_port: u16,
}

impl ServerConfig {
    /// Create a server config for HTTP only
    pub fn http_only(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            http_port: port,
        }
    }

    /// Parse a listen address of the form `host:port` or `:port`
    pub fn parse_listen_addr(addr: &str) -> Result<Self> {
        let (host, port) = addr
            .rsplit_once(':')
            .ok_or_else(|| ServerError::InvalidAddress(addr.to_string()))?;

        let port = port
            .parse::<u16>()
            .map_err(|_| ServerError::InvalidAddress(addr.to_string()))?;

        let host = if host.is_empty() { "0.0.0.0" } else { host };
        Ok(Self::http_only(host, port))
    }

    /// `host:port` as configured; the host may be a name, resolved at bind time
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            http_port: ports::HTTP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_http_only() {
        let config = ServerConfig::http_only("127.0.0.1", 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.http_port, 8080);
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_parse_listen_addr() {
        assert_eq!(
            ServerConfig::parse_listen_addr(":8080").unwrap(),
            ServerConfig::http_only("0.0.0.0", 8080)
        );
        assert_eq!(
            ServerConfig::parse_listen_addr("127.0.0.1:3000").unwrap(),
            ServerConfig::http_only("127.0.0.1", 3000)
        );
        assert_eq!(
            ServerConfig::parse_listen_addr("localhost:8080").unwrap(),
            ServerConfig::http_only("localhost", 8080)
        );
        assert!(ServerConfig::parse_listen_addr("8080").is_err());
        assert!(ServerConfig::parse_listen_addr("localhost:http").is_err());
    }
}
