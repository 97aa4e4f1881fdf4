//! Catalog assembly: per-app metadata derivation and output writing.

pub mod ids;
pub mod manifest;
pub mod stats;

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static SENTENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.+?[.!?])(\s|$)").expect("static regex must compile"));

static IMAGE_VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*image\s*:\s*([^\s#]+)").expect("static regex must compile"));

/// Developer label used when no GitHub owner can be determined.
pub const DEFAULT_DEVELOPER: &str = "Awesome Docker Compose";

/// One finalized catalog entry.
///
/// Built per route during extraction; `id` is assigned last, once the
/// full entry set is known (see [`ids::choose_ids`]).
#[derive(Debug, Clone)]
pub struct ExtractedApp {
    /// Final unique identifier; empty until id assignment runs.
    pub id: String,
    /// Identifier slugified from the route's leaf segment.
    pub base_id: String,
    /// Slug of the route's category path.
    pub category_slug: String,
    /// App title from the page heading.
    pub title: String,
    /// Full description text.
    pub description: String,
    /// First-sentence summary of the description.
    pub tagline: String,
    /// Validated compose descriptor text.
    pub compose: String,
    /// How the descriptor was obtained: `as-is`, `repaired`, or `fallback`.
    pub compose_status: &'static str,
    /// Version inferred from the first tagged image reference.
    pub version: String,
    /// Developer or owner label.
    pub developer: String,
    /// Resolved website link.
    pub website: String,
    /// Resolved source-repository link.
    pub repo: String,
    /// Resolved support/configuration link.
    pub support: String,
}

/// Normalizes a resource URL against the catalog base.
///
/// Protocol-relative URLs gain `https:`; absolute URLs pass through
/// unchanged; relative URLs resolve against the base with leading slashes
/// stripped from the relative part. Empty or unjoinable input yields
/// `None`.
#[must_use]
pub fn normalize_url(url_value: Option<&str>, base_url: &str) -> Option<String> {
    let value = url_value?.trim();
    if value.is_empty() {
        return None;
    }

    if value.starts_with("//") {
        return Some(format!("https:{value}"));
    }

    if Url::parse(value).is_ok() {
        return Some(value.to_string());
    }

    let base = Url::parse(&format!("{}/", base_url.trim_end_matches('/'))).ok()?;
    base.join(value.trim_start_matches('/')).ok().map(String::from)
}

/// Derives a tagline: the first sentence of the text, truncated to
/// `max_len` characters with a `...` marker when longer.
#[must_use]
pub fn first_sentence(text: &str, max_len: usize) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }

    let sentence = SENTENCE_RE
        .captures(text)
        .map_or(text, |c| c.get(1).map_or(text, |m| m.as_str()))
        .trim();

    if sentence.chars().count() <= max_len {
        return sentence.to_string();
    }
    let truncated: String = sentence.chars().take(max_len - 1).collect();
    format!("{}...", truncated.trim_end())
}

/// Extracts the owner segment from a GitHub URL; `None` for other hosts.
#[must_use]
pub fn github_owner(github_url: Option<&str>) -> Option<String> {
    let parsed = Url::parse(github_url?).ok()?;
    if !parsed.host_str()?.to_lowercase().contains("github.com") {
        return None;
    }
    parsed
        .path()
        .split('/')
        .find(|segment| !segment.is_empty())
        .map(ToString::to_string)
}

/// Infers a version from the first tagged `image:` line of a descriptor.
///
/// Digest suffixes (`@sha256:...`) are stripped before the tag is read.
/// Untagged images are skipped in case a later line carries a tag; when
/// none does, the version is `latest`.
#[must_use]
pub fn extract_image_version(compose_text: &str) -> String {
    for line in compose_text.lines() {
        let Some(captures) = IMAGE_VALUE_RE.captures(line) else {
            continue;
        };
        let image = captures[1].trim().trim_matches(|c| c == '"' || c == '\'');
        let image = image.split('@').next().unwrap_or(image);
        if let Some((_, tag)) = image.rsplit_once(':') {
            return tag.to_string();
        }
    }
    "latest".to_string()
}
