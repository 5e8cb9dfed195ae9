//! Configuration model loaded from external sources.

use std::time::Duration;

use serde::Deserialize;

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_items_per_page() -> usize {
    20
}

fn default_currency() -> String {
    "KSh".to_string()
}

fn default_max_photo_bytes() -> usize {
    2 * 1024 * 1024
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    /// Session and flash cookie key material, at least 64 bytes.
    pub secret: String,
    pub backend_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_max_photo_bytes")]
    pub max_photo_bytes: usize,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
