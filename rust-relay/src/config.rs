//! Configuration module for environment variable parsing.
//!
//! Only process-level wiring lives here. Telex integration settings (API keys,
//! list ids, the webhook secret) arrive with every request and are never stored.

use std::env;
use std::time::Duration;
use tracing::warn;

/// Origins allowed to call the relay from a browser when `CORS_ALLOWED_ORIGINS` is unset.
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://staging.telextest.im",
    "http://telextest.im",
    "https://staging.telex.im",
    "https://telex.im",
];

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Origin of the Trello REST API (cards are created under `/1/cards`)
    pub trello_api_base: String,

    /// Timeout for the outbound card request in milliseconds
    pub request_timeout_ms: u64,

    /// Browser origins permitted by the CORS layer
    pub cors_allowed_origins: Vec<String>,

    /// Path of the image served by `GET /logo`
    pub logo_path: String,

    /// Largest webhook body accepted, in bytes
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8000,
            trello_api_base: "https://api.trello.com".to_string(),
            request_timeout_ms: 10_000,
            cors_allowed_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
            logo_path: "trello-logo.png".to_string(),
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Config {
            port: parse_number("PORT", defaults.port),

            trello_api_base: env::var("TRELLO_API_BASE")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.trello_api_base),

            request_timeout_ms: parse_number("REQUEST_TIMEOUT_MS", defaults.request_timeout_ms),

            cors_allowed_origins: parse_csv("CORS_ALLOWED_ORIGINS")
                .filter(|origins| !origins.is_empty())
                .unwrap_or(defaults.cors_allowed_origins),

            logo_path: env::var("LOGO_PATH").unwrap_or(defaults.logo_path),

            max_body_bytes: parse_number("MAX_BODY_BYTES", defaults.max_body_bytes),
        }
    }

    /// Outbound request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Parse a numeric variable, keeping the default when unset or malformed.
fn parse_number<T: std::str::FromStr>(name: &str, default: T) -> T {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid numeric value, using default");
            default
        }
    }
}

/// Parse a comma-separated list of strings.
fn parse_csv(name: &str) -> Option<Vec<String>> {
    env::var(name).ok().map(|raw| {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_valid() {
        env::set_var("RELAY_TEST_PORT", "9090");
        let result: u16 = parse_number("RELAY_TEST_PORT", 8000);
        assert_eq!(result, 9090);
        env::remove_var("RELAY_TEST_PORT");
    }

    #[test]
    fn test_parse_number_invalid_uses_default() {
        env::set_var("RELAY_TEST_TIMEOUT", "soon");
        let result: u64 = parse_number("RELAY_TEST_TIMEOUT", 10_000);
        assert_eq!(result, 10_000);
        env::remove_var("RELAY_TEST_TIMEOUT");
    }

    #[test]
    fn test_parse_number_default() {
        let result: u16 = parse_number("RELAY_NONEXISTENT_VAR", 42);
        assert_eq!(result, 42);
    }

    #[test]
    fn test_parse_csv() {
        env::set_var("RELAY_TEST_CSV", "https://a.example, ,https://b.example");
        let result = parse_csv("RELAY_TEST_CSV");
        assert_eq!(
            result,
            Some(vec!["https://a.example".to_string(), "https://b.example".to_string()])
        );
        env::remove_var("RELAY_TEST_CSV");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.trello_api_base, "https://api.trello.com");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.cors_allowed_origins.len(), 4);
        assert!(config.cors_allowed_origins.contains(&"https://telex.im".to_string()));
        assert_eq!(config.max_body_bytes, 10 * 1024 * 1024);
    }
}
