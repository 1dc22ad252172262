use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 10_000;
pub const DEFAULT_NOTIFICATION_DURATION_MS: u32 = 6_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_url: String,
    pub use_mock_api: bool,
    pub request_timeout_ms: u32,
    pub notification_duration_ms: u32,
    pub enable_logging: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            use_mock_api: true,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            notification_duration_ms: DEFAULT_NOTIFICATION_DURATION_MS,
            enable_logging: true,
        }
    }
}

impl AppConfig {
    /// Loads the configuration from compile-time environment variables
    pub fn from_env() -> Self {
        Self::from_values(
            option_env!("API_URL"),
            option_env!("USE_MOCK_API"),
            option_env!("REQUEST_TIMEOUT_MS"),
            option_env!("NOTIFICATION_DURATION_MS"),
            option_env!("ENABLE_LOGGING"),
        )
    }

    /// Builds a config from raw optional values; unparsable values fall back to defaults.
    pub fn from_values(
        api_url: Option<&str>,
        use_mock_api: Option<&str>,
        request_timeout_ms: Option<&str>,
        notification_duration_ms: Option<&str>,
        enable_logging: Option<&str>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            api_url: api_url
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
            use_mock_api: use_mock_api
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.use_mock_api),
            request_timeout_ms: request_timeout_ms
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_ms),
            notification_duration_ms: notification_duration_ms
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.notification_duration_ms),
            enable_logging: enable_logging
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.enable_logging),
        }
    }

    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }
}

lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_use_local_defaults() {
        let config = AppConfig::from_values(None, None, None, None, None);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api_url, "http://localhost:3000/api");
        assert_eq!(config.request_timeout_ms, 10_000);
        assert_eq!(config.notification_duration_ms, 6_000);
    }

    #[test]
    fn api_url_is_trimmed_and_garbage_numbers_fall_back() {
        let config = AppConfig::from_values(
            Some("https://api.vidaplus.com/v1/ "),
            Some("false"),
            Some("abc"),
            Some("3000"),
            Some("nope"),
        );
        assert_eq!(config.api_url, "https://api.vidaplus.com/v1");
        assert!(!config.use_mock_api);
        assert_eq!(config.request_timeout_ms, DEFAULT_REQUEST_TIMEOUT_MS);
        assert_eq!(config.notification_duration_ms, 3000);
        assert!(config.is_logging_enabled());
    }
}
