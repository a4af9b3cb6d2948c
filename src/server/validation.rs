//! Production configuration validation
//!
//! Security checks for production deployments. Findings are warnings only.

use super::config::AppConfig;
use super::loader::ENV_VAR;
use tracing::warn;

fn is_production() -> bool {
    std::env::var(ENV_VAR)
        .map(|v| v.eq_ignore_ascii_case("production"))
        .unwrap_or(false)
}

/// Collect warnings for a production deployment of `config`
pub fn production_warnings(config: &AppConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.server.host == "0.0.0.0" {
        warnings.push(
            "Server is binding to all interfaces (0.0.0.0). \
             Consider binding to 127.0.0.1 behind a reverse proxy."
                .to_string(),
        );
    }

    if config.server.cors_origins.iter().any(|o| o == "*") {
        warnings.push("CORS allows any origin (\"*\").".to_string());
    }

    if config.redis.enabled
        && config.redis.url.starts_with("redis://")
        && !config.redis.url.contains('@')
    {
        warnings.push(
            "Redis connection appears to have no authentication. Consider enabling Redis AUTH."
                .to_string(),
        );
    }

    if !config.redis.enabled {
        warnings.push(
            "Conversation history is kept in process memory and lost on restart.".to_string(),
        );
    }

    if !config.security.suspicious_filter_enabled {
        warnings.push("Suspicious-content routing filter is disabled.".to_string());
    }

    warnings
}

/// Log production warnings when `SWITCHYARD_ENV=production`
pub fn validate_production_config(config: &AppConfig) {
    if !is_production() {
        return;
    }
    for warning in production_warnings(config) {
        warn!("SECURITY WARNING: {}", warning);
    }
}
