//! Run-level statistics document.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Stats written to `.source-stats.json` at the end of a run.
///
/// Fields are declared in sorted key order so the pretty-printed JSON
/// matches what a sorted-key dump produces.
#[derive(Debug, Serialize)]
pub struct RunStats {
    /// Base URL the catalog was scraped from.
    pub base_url: String,
    /// Build identifier of the scraped bundle.
    pub build_id: String,
    /// Entry count per descriptor status; only statuses that occurred.
    pub compose_status_counts: BTreeMap<String, u64>,
    /// Generation timestamp, RFC 3339 UTC.
    pub generated_at: String,
    /// Total number of catalog entries written.
    pub total_apps: usize,
}

impl RunStats {
    /// Assembles the stats document for a completed run.
    #[must_use]
    pub fn new(
        generated_at: DateTime<Utc>,
        base_url: &str,
        build_id: &str,
        total_apps: usize,
        compose_status_counts: BTreeMap<String, u64>,
    ) -> Self {
        Self {
            base_url: base_url.to_string(),
            build_id: build_id.to_string(),
            compose_status_counts,
            generated_at: generated_at.to_rfc3339(),
            total_apps,
        }
    }

    /// Serializes the document as pretty-printed JSON with a trailing
    /// newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self)
            .map(|json| format!("{json}\n"))
            .map_err(|e| format!("Failed to serialize run stats: {e}"))
    }
}
