//! Per-app output: deployment descriptor plus metadata manifest.

use std::path::Path;

use serde::Serialize;

use crate::catalog::ExtractedApp;
use crate::ports::filesystem::FileSystem;

/// Schema version of the metadata manifest.
const MANIFEST_VERSION: f64 = 1.1;

/// Fixed submitter label recorded in every manifest.
const SUBMITTER: &str = "Hiveden";

/// Metadata manifest written next to each app's compose file.
///
/// Field order matters: the document serializes in declaration order and
/// downstream tooling diffs these files textually.
#[derive(Debug, Serialize)]
pub struct AppManifest {
    #[serde(rename = "manifestVersion")]
    manifest_version: f64,
    id: String,
    category: String,
    name: String,
    version: String,
    tagline: String,
    description: String,
    developer: String,
    dependencies: Vec<String>,
    gallery: Vec<String>,
    path: String,
    #[serde(rename = "defaultUsername")]
    default_username: String,
    #[serde(rename = "deterministicPassword")]
    deterministic_password: bool,
    #[serde(rename = "torOnly")]
    tor_only: bool,
    submitter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    support: Option<String>,
}

impl AppManifest {
    /// Builds the manifest for a finalized entry.
    #[must_use]
    pub fn for_app(app: &ExtractedApp) -> Self {
        let optional = |value: &str| {
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        };
        Self {
            manifest_version: MANIFEST_VERSION,
            id: app.id.clone(),
            category: if app.category_slug.is_empty() {
                "utilities".to_string()
            } else {
                app.category_slug.clone()
            },
            name: app.title.clone(),
            version: app.version.clone(),
            tagline: app.tagline.clone(),
            description: app.description.clone(),
            developer: app.developer.clone(),
            dependencies: Vec::new(),
            gallery: Vec::new(),
            path: "/".to_string(),
            default_username: String::new(),
            deterministic_password: false,
            tor_only: false,
            submitter: SUBMITTER.to_string(),
            website: optional(&app.website),
            repo: optional(&app.repo),
            support: optional(&app.support),
        }
    }
}

/// Writes one app directory: `docker-compose.yml` and `hiveden-app.yml`.
///
/// # Errors
///
/// Returns an error if serialization or either file write fails.
pub fn write_app(fs: &dyn FileSystem, app_dir: &Path, app: &ExtractedApp) -> Result<(), String> {
    fs.write(&app_dir.join("docker-compose.yml"), &app.compose)
        .map_err(|e| format!("Failed to write compose file for {}: {e}", app.id))?;

    let manifest = AppManifest::for_app(app);
    let yaml = serde_yaml::to_string(&manifest)
        .map_err(|e| format!("Failed to serialize manifest for {}: {e}", app.id))?;
    fs.write(&app_dir.join("hiveden-app.yml"), &yaml)
        .map_err(|e| format!("Failed to write manifest for {}: {e}", app.id))
}
