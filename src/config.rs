use serde::Deserialize;
use std::time::Duration;
use config::{Config, ConfigError, Environment, File};

/// Upper bound for an uploaded image when no configuration overrides it.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

/// How the list controller catches up after a successful create, edit or delete.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MutationSync {
    /// Re-fetch page 1 and let the server response replace the list.
    #[default]
    Refetch,
    /// Patch the in-memory list and skip the round trip.
    LocalPatch,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub storage_base_url: String,
    pub placeholder_image_url: String,
    pub request_timeout_secs: u64,
    pub max_upload_bytes: u64,
    pub mutation_sync: MutationSync,
    pub log_level: String,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .set_default("placeholder_image_url", "https://placehold.co/600x400.png")?
            .set_default("request_timeout_secs", 30)?
            .set_default("max_upload_bytes", DEFAULT_MAX_UPLOAD_BYTES)?
            .set_default("mutation_sync", "refetch")?
            .set_default("log_level", "info")?
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("PHOTO_CATALOG").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
impl AppConfig {
    pub fn for_tests(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.to_string(),
            storage_base_url: "http://127.0.0.1:8000/storage".to_string(),
            placeholder_image_url: "https://placehold.co/600x400.png".to_string(),
            request_timeout_secs: 5,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            mutation_sync: MutationSync::Refetch,
            log_level: "debug".to_string(),
        }
    }
}
