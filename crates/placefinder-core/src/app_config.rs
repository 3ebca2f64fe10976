use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Where the search anchor comes from, if anywhere.
///
/// A fixed coordinate skips geocoding entirely; a location string is
/// geocoded once per search call.
#[derive(Debug, Clone, PartialEq)]
pub enum AnchorSetting {
    None,
    Location(String),
    Coordinate { latitude: f64, longitude: f64 },
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub places_api_key: String,
    pub places_base_url: String,
    pub maps_embed_api_key: Option<String>,
    pub anchor: AnchorSetting,
    pub search_radius_m: u32,
    pub page_token_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub search_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub rewrite_api_key: Option<String>,
    pub rewrite_model: String,
    pub rewrite_base_url: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("places_api_key", &"[redacted]")
            .field("places_base_url", &self.places_base_url)
            .field(
                "maps_embed_api_key",
                &self.maps_embed_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("anchor", &self.anchor)
            .field("search_radius_m", &self.search_radius_m)
            .field("page_token_delay_ms", &self.page_token_delay_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("search_timeout_secs", &self.search_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field(
                "rewrite_api_key",
                &self.rewrite_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("rewrite_model", &self.rewrite_model)
            .field("rewrite_base_url", &self.rewrite_base_url)
            .finish()
    }
}
