//! Client Configuration
//!
//! Optional JSON supplied by the host page; every field has a default.

use serde::{Deserialize, Serialize};

use crate::error::ClientResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Prefix for every API path; empty means same origin
    pub base_url: String,
    /// WebSocket endpoint for execution/stage events
    pub realtime_url: Option<String>,
    /// Rows in the dashboard's recent executions list
    pub recent_executions_limit: usize,
    /// Toast lifetime
    pub notification_ttl_ms: u32,
    /// `log` level filter name
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            realtime_url: None,
            recent_executions_limit: 5,
            notification_ttl_ms: 5000,
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_json(raw: &str) -> ClientResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Base URL, falling back to `origin` when none is configured
    pub fn resolved_base_url(&self, origin: &str) -> String {
        if self.base_url.is_empty() {
            origin.trim_end_matches('/').to_string()
        } else {
            self.base_url.trim_end_matches('/').to_string()
        }
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ClientConfig::from_json(r#"{"recent_executions_limit": 10}"#).unwrap();
        assert_eq!(config.recent_executions_limit, 10);
        assert_eq!(config.notification_ttl_ms, 5000);
        assert_eq!(config.realtime_url, None);
    }

    #[test]
    fn base_url_falls_back_to_origin() {
        let config = ClientConfig::default();
        assert_eq!(config.resolved_base_url("http://localhost:8080/"), "http://localhost:8080");

        let config = ClientConfig {
            base_url: "https://ci.example.com/".into(),
            ..ClientConfig::default()
        };
        assert_eq!(config.resolved_base_url("http://localhost:8080"), "https://ci.example.com");
    }

    #[test]
    fn bad_log_level_defaults_to_info() {
        let config = ClientConfig {
            log_level: "chatty".into(),
            ..ClientConfig::default()
        };
        assert_eq!(config.log_level_filter(), log::LevelFilter::Info);
    }
}
