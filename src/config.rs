//! Source configuration supplied on the command line.

use serde::Deserialize;

/// Release channels the downstream catalog understands.
const ALLOWED_CHANNELS: [&str; 4] = ["stable", "beta", "edge", "incubator"];

fn default_repo_url() -> String {
    "https://awesome-docker-compose.com".to_string()
}

/// Source configuration parsed from an inline JSON document.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the catalog site.
    #[serde(default = "default_repo_url")]
    pub repo_url: String,
    /// Requested release channel; normalized by [`SourceConfig::channel`].
    #[serde(default)]
    pub channel: Option<String>,
}

impl SourceConfig {
    /// Parses a source configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON or does not
    /// match the expected shape.
    pub fn from_json(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| format!("Failed to parse source config: {e}"))
    }

    /// Returns the base URL with any trailing slashes removed.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.repo_url.trim_end_matches('/').to_string()
    }

    /// Returns the normalized channel.
    ///
    /// An absent or empty channel defaults to `beta`; anything outside the
    /// allowed set maps to `incubator`.
    #[must_use]
    pub fn channel(&self) -> String {
        let requested = match self.channel.as_deref() {
            Some(c) if !c.is_empty() => c,
            _ => "beta",
        };
        if ALLOWED_CHANNELS.contains(&requested) {
            requested.to_string()
        } else {
            "incubator".to_string()
        }
    }
}
