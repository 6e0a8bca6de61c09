use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::http::connection::{Limits, DEFAULT_MAX_BODY_BYTES, DEFAULT_MAX_REQUEST_BYTES};

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:42069";

/// Server settings.
///
/// Loaded from defaults, then an optional YAML file named by `CONFIG`,
/// then the `LISTEN` environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    /// Read buffer size per connection; a request line or header block
    /// that does not fit is rejected
    pub max_request_bytes: usize,
    /// Largest `Content-Length` accepted
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("CONFIG") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };

        if let Ok(listen_addr) = std::env::var("LISTEN") {
            cfg.listen_addr = listen_addr;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(raw).context("Failed to parse YAML config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_request_bytes: self.max_request_bytes,
            max_body_bytes: self.max_body_bytes,
        }
    }

    pub(crate) fn validate(&self) -> anyhow::Result<()> {
        if self.max_request_bytes == 0 {
            anyhow::bail!("max_request_bytes must be greater than zero");
        }
        Ok(())
    }
}
