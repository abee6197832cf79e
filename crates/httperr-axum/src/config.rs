use std::path::Path;

use http::HeaderName;
use serde::Deserialize;

/// How an [`HttpError`](httperr_core::HttpError) is rendered as a response
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponseConfig {
    /// Include debug params in the response body
    #[serde(default)]
    pub expose_params: bool,
    /// Include the diagnostic trace in the response body
    #[serde(default)]
    pub expose_trace: bool,
    /// Header names never copied from the error onto the response
    #[serde(default)]
    pub redact_headers: Vec<String>,
}

impl ResponseConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, TOML parsing fails, or
    /// validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml_str(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if TOML parsing fails or a redacted header name is
    /// not a valid HTTP header name
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that every redacted header is a valid header name
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid header
    pub fn validate(&self) -> anyhow::Result<()> {
        self.redacted_header_names().map(|_| ())
    }

    /// Redacted headers as HTTP header names
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid header
    pub fn redacted_header_names(&self) -> anyhow::Result<Vec<HeaderName>> {
        self.redact_headers
            .iter()
            .map(|name| {
                HeaderName::try_from(name.as_str())
                    .map_err(|e| anyhow::anyhow!("invalid header name in redact_headers '{name}': {e}"))
            })
            .collect()
    }
}
