//! Process configuration.
//!
//! This module loads configuration for the mailer server and the example
//! client from environment variables.
//!
//! # Environment Variables
//!
//! - `MAILER_DB`: SQLite database file (default: `mailer.db`)
//! - `MAILER_BIND_JSON`: HTTP bind address (default: `0.0.0.0:8080`)
//! - `MAILER_BIND_GRPC`: RPC bind address (default: `0.0.0.0:8081`)
//! - `MAILER_DB_MAX_CONNECTIONS`: connection pool size (default: `5`)
//! - `MAILER_GRPC_ADDR`: RPC server the client connects to (default: `127.0.0.1:8081`)
//!
//! Bind addresses also accept the `:port` shorthand, meaning every interface.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// SQLite database file. Created on first start.
    pub database_path: PathBuf,
    /// Address the JSON-over-HTTP front-end listens on.
    pub json_bind_addr: SocketAddr,
    /// Address the RPC front-end listens on.
    pub rpc_bind_addr: SocketAddr,
    /// Maximum pooled database connections shared by both front-ends.
    pub max_connections: u32,
}

/// Example client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// RPC server address.
    pub rpc_addr: SocketAddr,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ServerConfig {
    /// Default database file.
    pub const DEFAULT_DATABASE_PATH: &'static str = "mailer.db";
    /// Default HTTP bind address.
    pub const DEFAULT_JSON_BIND: &'static str = "0.0.0.0:8080";
    /// Default RPC bind address.
    pub const DEFAULT_RPC_BIND: &'static str = "0.0.0.0:8081";
    /// Default pool size.
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a bind address or the pool size is set but
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load configuration through `var`, which returns the value of a
    /// variable or `None` when it is unset.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_path = var("MAILER_DB")
            .filter(|value| !value.is_empty())
            .map_or_else(|| PathBuf::from(Self::DEFAULT_DATABASE_PATH), PathBuf::from);
        let json_bind_addr = load_addr(&var, "MAILER_BIND_JSON", Self::DEFAULT_JSON_BIND)?;
        let rpc_bind_addr = load_addr(&var, "MAILER_BIND_GRPC", Self::DEFAULT_RPC_BIND)?;
        let max_connections = load_max_connections(&var)?;

        Ok(Self {
            database_path,
            json_bind_addr,
            rpc_bind_addr,
            max_connections,
        })
    }
}

impl ClientConfig {
    /// Default RPC server address.
    pub const DEFAULT_RPC_ADDR: &'static str = "127.0.0.1:8081";

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // `:port` is all interfaces when binding, but a client needs a host.
        let rpc_addr = match var("MAILER_GRPC_ADDR") {
            Some(value) if value.starts_with(':') => {
                parse_addr("MAILER_GRPC_ADDR", &format!("127.0.0.1{value}"))?
            }
            Some(value) if !value.is_empty() => parse_addr("MAILER_GRPC_ADDR", &value)?,
            _ => parse_addr("MAILER_GRPC_ADDR", Self::DEFAULT_RPC_ADDR)?,
        };
        Ok(Self { rpc_addr })
    }
}

/// Load a bind address, falling back to `default` when unset or empty.
fn load_addr(
    var: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: &str,
) -> Result<SocketAddr, ConfigError> {
    match var(name) {
        Some(value) if value.starts_with(':') => parse_addr(name, &format!("0.0.0.0{value}")),
        Some(value) if !value.is_empty() => parse_addr(name, &value),
        _ => parse_addr(name, default),
    }
}

fn load_max_connections(var: &impl Fn(&str) -> Option<String>) -> Result<u32, ConfigError> {
    let Some(value) = var("MAILER_DB_MAX_CONNECTIONS") else {
        return Ok(ServerConfig::DEFAULT_MAX_CONNECTIONS);
    };
    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidValue {
            name: "MAILER_DB_MAX_CONNECTIONS".to_string(),
            message: format!("'{value}' is not a positive integer"),
        }),
    }
}

fn parse_addr(name: &str, value: &str) -> Result<SocketAddr, ConfigError> {
    value.parse::<SocketAddr>().map_err(|_| ConfigError::InvalidValue {
        name: name.to_string(),
        message: format!("'{value}' is not a valid socket address (expected host:port)"),
    })
}
