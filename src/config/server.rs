//! Process settings from the environment (`.env` is loaded by the binary).

use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Service model JSON to load instead of the built-in blogging model.
    pub service_model_path: Option<PathBuf>,
    /// Request body limit for write endpoints.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            service_model_path: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    /// Read `BIND_ADDR`, `SERVICE_MODEL_PATH` and `MAX_BODY_BYTES`. Unparseable values fall back to defaults with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = bind_raw.parse().unwrap_or_else(|_| {
            tracing::warn!("invalid BIND_ADDR '{}', using {}", bind_raw, DEFAULT_BIND_ADDR);
            defaults.bind_addr
        });
        let service_model_path = lookup("SERVICE_MODEL_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);
        let max_body_bytes = match lookup("MAX_BODY_BYTES") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("invalid MAX_BODY_BYTES '{}', using {}", raw, DEFAULT_MAX_BODY_BYTES);
                defaults.max_body_bytes
            }),
            None => defaults.max_body_bytes,
        };
        Self {
            bind_addr,
            service_model_path,
            max_body_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config.bind_addr.port(), 3000);
        assert!(config.service_model_path.is_none());
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
    }

    #[test]
    fn test_reads_values() {
        let env: HashMap<&str, &str> = [
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("SERVICE_MODEL_PATH", "model.json"),
            ("MAX_BODY_BYTES", "1024"),
        ]
        .into_iter()
        .collect();
        let config = ServerConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.service_model_path, Some(PathBuf::from("model.json")));
        assert_eq!(config.max_body_bytes, 1024);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = ServerConfig::from_lookup(|k| match k {
            "BIND_ADDR" => Some("not an addr".into()),
            "MAX_BODY_BYTES" => Some("lots".into()),
            _ => None,
        });
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
    }
}
