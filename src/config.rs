// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup, after an optional `.env` file has been applied.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | Token signing secret | Required |
//! | `TOKEN_TTL_SECS` | Session token lifetime in seconds | `86400` |
//! | `DATA_DIR` | Directory holding the database file | `./data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `ALLOWED_ORIGINS` | Comma-separated CORS origins | `http://localhost:3000,http://localhost:5173` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use chrono::TimeDelta;

use crate::auth::SigningSecret;

pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const TOKEN_TTL_ENV: &str = "TOKEN_TTL_SECS";
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const ALLOWED_ORIGINS_ENV: &str = "ALLOWED_ORIGINS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

/// Name of the database file inside `DATA_DIR`.
pub const DATABASE_FILE: &str = "vocab.redb";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    /// `json` (any case) selects JSON; anything else is pretty.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }

    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(LOG_FORMAT_ENV).ok().as_deref())
    }
}

/// Token settings handed to the auth core.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub secret: SigningSecret,
    pub token_ttl: TimeDelta,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub auth: AuthSettings,
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to resolve variable names. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let secret = get(JWT_SECRET_ENV).ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;

        let token_ttl = match get(TOKEN_TTL_ENV) {
            Some(raw) => {
                let secs: i64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::Invalid {
                        name: TOKEN_TTL_ENV,
                        value: raw.clone(),
                        reason: e.to_string(),
                    }
                })?;
                if secs <= 0 {
                    return Err(ConfigError::Invalid {
                        name: TOKEN_TTL_ENV,
                        value: raw,
                        reason: "must be positive".to_string(),
                    });
                }
                TimeDelta::try_seconds(secs).ok_or_else(|| ConfigError::Invalid {
                    name: TOKEN_TTL_ENV,
                    value: raw,
                    reason: "out of range".to_string(),
                })?
            }
            None => TimeDelta::seconds(DEFAULT_TOKEN_TTL_SECS),
        };

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let ip: IpAddr = host.trim().parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::Invalid {
                name: HOST_ENV,
                value: host.clone(),
                reason: e.to_string(),
            }
        })?;

        let port = match get(PORT_ENV) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: PORT_ENV,
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let raw_origins =
            get(ALLOWED_ORIGINS_ENV).unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string());
        let allowed_origins: Vec<String> = raw_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
        // Credentialed CORS cannot be combined with a wildcard origin.
        if allowed_origins.iter().any(|o| o == "*") {
            return Err(ConfigError::Invalid {
                name: ALLOWED_ORIGINS_ENV,
                value: raw_origins,
                reason: "wildcard origin is not allowed with credentials; list origins explicitly"
                    .to_string(),
            });
        }

        Ok(Self {
            auth: AuthSettings {
                secret: SigningSecret::new(secret),
                token_ttl,
            },
            data_dir: PathBuf::from(get(DATA_DIR_ENV).unwrap_or_else(|| DEFAULT_DATA_DIR.into())),
            bind_addr: SocketAddr::new(ip, port),
            allowed_origins,
        })
    }

    /// Full path of the database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = load(&[(JWT_SECRET_ENV, "s3cret")]).unwrap();

        assert_eq!(config.auth.token_ttl, TimeDelta::hours(24));
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.database_path(), PathBuf::from("./data/vocab.redb"));
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000", "http://localhost:5173"]
        );
        assert!(config.auth.secret.is_weak());
    }

    #[test]
    fn missing_or_blank_secret_is_an_error() {
        assert!(matches!(load(&[]), Err(ConfigError::Missing(JWT_SECRET_ENV))));
        assert!(matches!(
            load(&[(JWT_SECRET_ENV, "   ")]),
            Err(ConfigError::Missing(JWT_SECRET_ENV))
        ));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            (JWT_SECRET_ENV, "0123456789abcdef0123456789abcdef"),
            (TOKEN_TTL_ENV, "60"),
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "9000"),
            (DATA_DIR_ENV, "/var/lib/vocab"),
            (ALLOWED_ORIGINS_ENV, "https://a.example, ,https://b.example"),
        ])
        .unwrap();

        assert_eq!(config.auth.token_ttl, TimeDelta::seconds(60));
        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/vocab"));
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert!(!config.auth.secret.is_weak());
    }

    #[test]
    fn invalid_values_are_rejected() {
        for (name, value) in [
            (TOKEN_TTL_ENV, "soon"),
            (TOKEN_TTL_ENV, "0"),
            (PORT_ENV, "70000"),
            (HOST_ENV, "not-an-ip"),
            (ALLOWED_ORIGINS_ENV, "*"),
            (ALLOWED_ORIGINS_ENV, "http://localhost:3000, *"),
        ] {
            let result = load(&[(JWT_SECRET_ENV, "s3cret"), (name, value)]);
            assert!(
                matches!(result, Err(ConfigError::Invalid { name: n, .. }) if n == name),
                "{name}={value} should be rejected"
            );
        }
    }

    #[test]
    fn log_format_parsing() {
        assert_eq!(LogFormat::from_env_value(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value(Some("JSON")), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value(Some("pretty")), LogFormat::Pretty);
        assert_eq!(LogFormat::from_env_value(None), LogFormat::Pretty);
    }
}
