//! Configuration management for console services

use crate::error::{IotcError, Result};
use serde::Deserialize;
use std::env;
use std::net::SocketAddr;

/// Deployment environment. Only `Development` exposes internal error detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl std::str::FromStr for Environment {
    type Err = IotcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(IotcError::Config(format!("Invalid APP_ENV: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub service_name: String,
    pub http_bind: SocketAddr,
    pub log_level: String,
    pub json_logs: bool,
    pub environment: Environment,
    pub cors_enabled: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_name: "console-api".to_string(),
            http_bind: SocketAddr::from(([0, 0, 0, 0], 3001)),
            log_level: "info".to_string(),
            json_logs: true,
            environment: Environment::Production,
            cors_enabled: true,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let mut http_bind: SocketAddr = match lookup("HTTP_BIND") {
            Some(bind) => bind
                .parse()
                .map_err(|e| IotcError::Config(format!("Invalid HTTP_BIND: {}", e)))?,
            None => defaults.http_bind,
        };
        if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .parse()
                .map_err(|e| IotcError::Config(format!("Invalid PORT: {}", e)))?;
            http_bind.set_port(port);
        }

        Ok(Self {
            service_name: lookup("SERVICE_NAME").unwrap_or(defaults.service_name),
            http_bind,
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            json_logs: parse_flag(lookup("JSON_LOGS"), "JSON_LOGS", defaults.json_logs)?,
            environment: match lookup("APP_ENV") {
                Some(env) => env.parse()?,
                None => defaults.environment,
            },
            cors_enabled: parse_flag(lookup("CORS_ENABLED"), "CORS_ENABLED", defaults.cors_enabled)?,
        })
    }
}

fn parse_flag(value: Option<String>, name: &str, default: bool) -> Result<bool> {
    match value.as_deref() {
        None => Ok(default),
        Some("true") | Some("1") => Ok(true),
        Some("false") | Some("0") => Ok(false),
        Some(other) => Err(IotcError::Config(format!("Invalid {}: {}", name, other))),
    }
}
