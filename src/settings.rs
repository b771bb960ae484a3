//! Process settings read from the environment (after `.env` is loaded by main).

use crate::error::ConfigError;
use sqlx::postgres::PgConnectOptions;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

/// Which persistence backend serves requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            other => Err(format!("unknown store {} (expected postgres or memory)", other)),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Maximum request body size in bytes.
    pub body_limit: usize,
}

impl ServerSettings {
    pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Invalid {
                key: "APP_HOST",
                reason: format!("{}", e),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
    pub store: StoreKind,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        Ok(Settings {
            database: DatabaseSettings {
                host: text("DB_HOST", "localhost"),
                port: parse(&lookup, "DB_PORT", 5432)?,
                user: text("DB_USER", "postgres"),
                password: text("DB_PASSWORD", "postgres"),
                name: text("DB_NAME", "book_catalog"),
                max_connections: parse(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            },
            server: ServerSettings {
                host: text("APP_HOST", "0.0.0.0"),
                port: parse(&lookup, "APP_PORT", 8080)?,
                body_limit: parse(&lookup, "APP_BODY_LIMIT", 1024 * 1024)?,
            },
            store: parse(&lookup, "CATALOG_STORE", StoreKind::Postgres)?,
        })
    }
}

fn parse<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let env: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.database.host, "localhost");
        assert_eq!(s.database.port, 5432);
        assert_eq!(s.database.name, "book_catalog");
        assert_eq!(s.server.port, 8080);
        assert_eq!(s.server.body_limit, 1024 * 1024);
        assert_eq!(s.store, StoreKind::Postgres);
        assert_eq!(s.server.addr().unwrap().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn overrides() {
        let s = settings(&[("DB_PORT", "6543"), ("APP_PORT", "9000"), ("CATALOG_STORE", "Memory")]).unwrap();
        assert_eq!(s.database.port, 6543);
        assert_eq!(s.server.port, 9000);
        assert_eq!(s.store, StoreKind::Memory);
    }

    #[test]
    fn invalid_values_name_the_key() {
        let err = settings(&[("APP_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "APP_PORT", .. }));
        assert!(settings(&[("CATALOG_STORE", "redis")]).is_err());
    }

    #[test]
    fn debug_hides_password() {
        let s = settings(&[("DB_PASSWORD", "hunter2")]).unwrap();
        assert!(!format!("{:?}", s).contains("hunter2"));
    }
}
