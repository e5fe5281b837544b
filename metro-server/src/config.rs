//! Server configuration.
//!
//! Everything is read from `METRO_*` environment variables with defaults
//! suitable for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheConfig;

/// Error returned for an environment variable that cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {var}={value:?}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Configuration for the server binary.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Metro data file (`METRO_GRAPH_PATH`).
    pub graph_path: PathBuf,

    /// Trips file (`METRO_TRIPS_PATH`).
    pub trips_path: PathBuf,

    /// Address to bind (`METRO_LISTEN_ADDR`).
    pub listen_addr: SocketAddr,

    /// How often to reload the trips file (`METRO_TRIPS_REFRESH_SECS`).
    /// Zero disables the reload.
    pub trips_refresh: Duration,

    /// Ranking cache settings (`METRO_RANKING_CACHE_TTL_SECS`,
    /// `METRO_RANKING_CACHE_CAPACITY`).
    pub cache: CacheConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            graph_path: PathBuf::from("data/metro_data.json"),
            trips_path: PathBuf::from("data/trips.json"),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            trips_refresh: Duration::from_secs(300),
            cache: CacheConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// unset variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = lookup("METRO_GRAPH_PATH") {
            config.graph_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("METRO_TRIPS_PATH") {
            config.trips_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("METRO_LISTEN_ADDR") {
            config.listen_addr = parse("METRO_LISTEN_ADDR", &v)?;
        }
        if let Some(v) = lookup("METRO_TRIPS_REFRESH_SECS") {
            config.trips_refresh = Duration::from_secs(parse("METRO_TRIPS_REFRESH_SECS", &v)?);
        }
        if let Some(v) = lookup("METRO_RANKING_CACHE_TTL_SECS") {
            config.cache.ttl = Duration::from_secs(parse("METRO_RANKING_CACHE_TTL_SECS", &v)?);
        }
        if let Some(v) = lookup("METRO_RANKING_CACHE_CAPACITY") {
            config.cache.max_capacity = parse("METRO_RANKING_CACHE_CAPACITY", &v)?;
        }

        Ok(config)
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.listen_addr.port(), 3000);
        assert_eq!(config.trips_refresh, Duration::from_secs(300));
    }

    #[test]
    fn overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("METRO_GRAPH_PATH", "/srv/delhi.json"),
            ("METRO_TRIPS_PATH", "/srv/trips.json"),
            ("METRO_LISTEN_ADDR", "0.0.0.0:8080"),
            ("METRO_TRIPS_REFRESH_SECS", "0"),
            ("METRO_RANKING_CACHE_TTL_SECS", " 5 "),
            ("METRO_RANKING_CACHE_CAPACITY", "20"),
        ]))
        .unwrap();

        assert_eq!(config.graph_path, PathBuf::from("/srv/delhi.json"));
        assert_eq!(config.trips_path, PathBuf::from("/srv/trips.json"));
        assert_eq!(config.listen_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.trips_refresh, Duration::ZERO);
        assert_eq!(config.cache.ttl, Duration::from_secs(5));
        assert_eq!(config.cache.max_capacity, 20);
    }

    #[test]
    fn invalid_value_names_variable() {
        let err = ServerConfig::from_lookup(lookup(&[("METRO_TRIPS_REFRESH_SECS", "soon")]))
            .unwrap_err();
        assert_eq!(err.var, "METRO_TRIPS_REFRESH_SECS");
        assert_eq!(err.value, "soon");
        assert!(err.to_string().starts_with("invalid METRO_TRIPS_REFRESH_SECS=\"soon\""));
    }

    #[test]
    fn invalid_address() {
        let err = ServerConfig::from_lookup(lookup(&[("METRO_LISTEN_ADDR", "localhost")]))
            .unwrap_err();
        assert_eq!(err.var, "METRO_LISTEN_ADDR");
    }
}
