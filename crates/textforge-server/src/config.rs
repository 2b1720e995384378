use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "ServerConfig::default_max_body_bytes")]
    pub max_body_bytes: usize,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl ServerConfig {
    pub const DEFAULT_LISTEN_ADDR: &'static str = "127.0.0.1:8080";
    pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

    fn default_listen_addr() -> String {
        Self::DEFAULT_LISTEN_ADDR.to_string()
    }

    fn default_max_body_bytes() -> usize {
        Self::DEFAULT_MAX_BODY_BYTES
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: Self::default_listen_addr(),
            max_body_bytes: Self::default_max_body_bytes(),
            cors: CorsConfig::default(),
        }
    }
}

/// Cross-origin settings. Enabled by default; an enabled layer with no
/// `allow_origins` allows any origin.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    #[serde(default = "CorsConfig::default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub allow_origins: Vec<String>,
    #[serde(default = "CorsConfig::default_allow_methods")]
    pub allow_methods: Vec<String>,
    #[serde(default = "CorsConfig::default_allow_headers")]
    pub allow_headers: Vec<String>,
    #[serde(default)]
    pub expose_headers: Vec<String>,
    #[serde(default)]
    pub allow_credentials: bool,
    #[serde(default = "CorsConfig::default_max_age_secs")]
    pub max_age_secs: u64,
}

impl CorsConfig {
    fn default_enabled() -> bool {
        true
    }

    fn default_allow_methods() -> Vec<String> {
        vec!["GET".to_string(), "POST".to_string(), "OPTIONS".to_string()]
    }

    fn default_allow_headers() -> Vec<String> {
        vec!["content-type".to_string(), "x-request-id".to_string()]
    }

    fn default_max_age_secs() -> u64 {
        600
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            allow_origins: Vec::new(),
            allow_methods: Self::default_allow_methods(),
            allow_headers: Self::default_allow_headers(),
            expose_headers: Vec::new(),
            allow_credentials: false,
            max_age_secs: Self::default_max_age_secs(),
        }
    }
}
