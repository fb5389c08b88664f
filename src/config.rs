use anyhow::Result;
use config::{Config, Environment};
use serde::Deserialize;

/// Process configuration, read from `VIDEOGEN_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Credential for a real video-generation provider. The agent runs in
    /// demo mode either way; the token is only acknowledged in the logs.
    #[serde(default)]
    pub replicate_api_token: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            replicate_api_token: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let conf = Config::builder()
            .add_source(Environment::with_prefix("VIDEOGEN"))
            .build()?;

        Ok(conf.try_deserialize()?)
    }
}
