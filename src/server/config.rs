//! Server configuration types
//!
//! Mirrors `config/default.toml`; every section has a `Default` so partial
//! files and environment overrides deserialize cleanly.

use serde::{Deserialize, Serialize};
use switchyard_core::memory::DEFAULT_CONVERSATION_TTL_SECS;
use switchyard_core::SuspiciousFilterConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; `"*"` allows any
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            cors_origins: Vec::new(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Only `openai` (and OpenAI-compatible gateways) is supported
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Custom endpoint for compatible gateways
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_model")]
    pub router_model: String,
    #[serde(default = "default_model")]
    pub math_model: String,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    switchyard_llm::openai::DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: None,
            router_model: default_model(),
            math_model: default_model(),
            temperature: 0.0,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Retrieval service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    #[serde(default)]
    pub enabled: bool,
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "http://127.0.0.1:8100".to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Conversation store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// When false, history is kept in process memory
    #[serde(default)]
    pub enabled: bool,
    pub url: String,
    #[serde(default)]
    pub key_prefix: String,
    #[serde(default = "default_ttl")]
    pub conversation_ttl_secs: u64,
}

fn default_ttl() -> u64 {
    DEFAULT_CONVERSATION_TTL_SECS
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: String::new(),
            conversation_ttl_secs: default_ttl(),
        }
    }
}

/// Safety filter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(default = "default_true")]
    pub suspicious_filter_enabled: bool,
    /// Extra lower-case substrings treated as suspicious
    #[serde(default)]
    pub extra_patterns: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            suspicious_filter_enabled: true,
            extra_patterns: Vec::new(),
        }
    }
}

impl From<&SecurityConfig> for SuspiciousFilterConfig {
    fn from(config: &SecurityConfig) -> Self {
        Self {
            enabled: config.suspicious_filter_enabled,
            extra_patterns: config.extra_patterns.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_maps_to_filter_config() {
        let security = SecurityConfig {
            suspicious_filter_enabled: false,
            extra_patterns: vec!["drop table".to_string()],
        };
        let filter: SuspiciousFilterConfig = (&security).into();
        assert!(!filter.enabled);
        assert_eq!(filter.extra_patterns, vec!["drop table".to_string()]);
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.redis.conversation_ttl_secs, 2_592_000);
        assert!(config.security.suspicious_filter_enabled);
    }
}
