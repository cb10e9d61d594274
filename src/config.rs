use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::banguat;
use crate::error::{AppError, Result};

/// Runtime configuration, sourced from the environment.
///
/// Every field has a default so the server starts with no configuration at
/// all; `.env` files are honored via dotenvy before this is read.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub db_path: PathBuf,
    pub soap_url: String,
    pub soap_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let host = match std::env::var("BANGUAT_HOST") {
            Ok(raw) => raw
                .parse::<IpAddr>()
                .map_err(|e| AppError::Config(format!("BANGUAT_HOST: {}", e)))?,
            Err(_) => IpAddr::from([127, 0, 0, 1]),
        };

        let port = match std::env::var("BANGUAT_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|e| AppError::Config(format!("BANGUAT_PORT: {}", e)))?,
            Err(_) => 3001,
        };

        let db_path = std::env::var("BANGUAT_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("banguat_rates.db"));

        let soap_url = std::env::var("BANGUAT_SOAP_URL")
            .unwrap_or_else(|_| banguat::SOAP_ENDPOINT.to_string());

        let soap_timeout = match std::env::var("BANGUAT_SOAP_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .map_err(|e| AppError::Config(format!("BANGUAT_SOAP_TIMEOUT_SECS: {}", e)))?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(30),
        };

        Ok(Config {
            host,
            port,
            db_path,
            soap_url,
            soap_timeout,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-global, so all cases share one test.
    #[test]
    fn test_from_env() {
        std::env::remove_var("BANGUAT_HOST");
        std::env::remove_var("BANGUAT_PORT");
        std::env::remove_var("BANGUAT_DB_PATH");
        std::env::remove_var("BANGUAT_SOAP_URL");
        std::env::remove_var("BANGUAT_SOAP_TIMEOUT_SECS");

        let config = Config::from_env().unwrap();
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:3001");
        assert_eq!(config.db_path, PathBuf::from("banguat_rates.db"));
        assert_eq!(config.soap_url, banguat::SOAP_ENDPOINT);
        assert_eq!(config.soap_timeout, Duration::from_secs(30));

        std::env::set_var("BANGUAT_HOST", "0.0.0.0");
        std::env::set_var("BANGUAT_PORT", "8080");
        std::env::set_var("BANGUAT_DB_PATH", "/tmp/rates.db");
        std::env::set_var("BANGUAT_SOAP_TIMEOUT_SECS", "5");

        let config = Config::from_env().unwrap();
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.db_path, PathBuf::from("/tmp/rates.db"));
        assert_eq!(config.soap_timeout, Duration::from_secs(5));

        std::env::set_var("BANGUAT_PORT", "not-a-port");
        assert!(Config::from_env().is_err());

        std::env::remove_var("BANGUAT_HOST");
        std::env::remove_var("BANGUAT_PORT");
        std::env::remove_var("BANGUAT_DB_PATH");
        std::env::remove_var("BANGUAT_SOAP_TIMEOUT_SECS");
    }
}
