mod env;
mod types;


pub use types::*;

use std::path::Path;

use anyhow::{Context, bail};

use crate::secret::Secret;

/// Environment variables checked for the Gemini credential, highest priority first.
pub const API_KEY_VARS: [&str; 2] = ["DOCQA_GEMINI_API_KEY", "GOOGLE_API_KEY"];

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to sensible defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Reject values that would make the assistant unusable.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid field.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.llm.model.trim().is_empty() {
            bail!("llm.model must not be empty");
        }
        if self.llm.base_url.trim().is_empty() {
            bail!("llm.base_url must not be empty");
        }
        if self.video.poll_interval_secs == 0 {
            bail!("video.poll_interval_secs must be greater than zero");
        }
        if self.video.processing_timeout_secs == 0 {
            bail!("video.processing_timeout_secs must be greater than zero");
        }
        if self.timeouts.connect_secs == 0 {
            bail!("timeouts.connect_secs must be greater than zero");
        }
        if self.timeouts.llm_secs == 0 {
            bail!("timeouts.llm_secs must be greater than zero");
        }
        if self.ingest.max_file_size == 0 {
            bail!("ingest.max_file_size must be greater than zero");
        }
        Ok(())
    }

    /// Pick up the Gemini credential from the environment.
    ///
    /// A missing key is not an error here; the first model call reports it.
    pub fn resolve_secrets(&mut self) {
        for var in API_KEY_VARS {
            if let Ok(val) = std::env::var(var)
                && !val.trim().is_empty()
            {
                self.secrets.gemini_api_key = Some(Secret::new(val));
                return;
            }
        }
        tracing::debug!("no Gemini API key found in environment");
    }
}
