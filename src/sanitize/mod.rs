//! Three-tier descriptor sanitizer.
//!
//! Upstream compose text is untrusted, inconsistently formatted
//! HTML-embedded content. Each tier is tried only when the previous one
//! failed: accept the text as-is, apply line-level repair patches, or
//! synthesize a minimal single-service descriptor. The last tier cannot
//! fail, so every catalog entry ends up with a structurally valid
//! descriptor.

use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::Value;

/// Placeholder image used when no image reference can be inferred at all.
const PLACEHOLDER_IMAGE: &str = "ghcr.io/example/app:latest";

static BARE_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*version\s*:\s*$").expect("static regex must compile"));

static TRAILING_COMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*(#.*)?)$").expect("static regex must compile"));

static IMAGE_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*image\s*[:=]\s*([^\n#]+)").expect("static regex must compile"));

/// A descriptor that passed validation, tagged with how it got there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sanitized {
    /// The candidate text validated unchanged.
    AsIs(String),
    /// The candidate validated after line-level repair.
    Repaired(String),
    /// A minimal synthesized descriptor replaced the candidate.
    Fallback(String),
}

impl Sanitized {
    /// Returns the status tag recorded in run stats.
    #[must_use]
    pub fn status(&self) -> &'static str {
        match self {
            Sanitized::AsIs(_) => "as-is",
            Sanitized::Repaired(_) => "repaired",
            Sanitized::Fallback(_) => "fallback",
        }
    }

    /// Returns the validated descriptor text.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Sanitized::AsIs(text) | Sanitized::Repaired(text) | Sanitized::Fallback(text) => text,
        }
    }

    /// Consumes the value, returning the validated descriptor text.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Sanitized::AsIs(text) | Sanitized::Repaired(text) | Sanitized::Fallback(text) => text,
        }
    }
}

/// Checks whether compose text is structurally usable: it parses as YAML,
/// the top level is a mapping, and `services` is a non-empty mapping.
#[must_use]
pub fn compose_is_valid(compose_text: &str) -> bool {
    let Ok(parsed) = serde_yaml::from_str::<Value>(compose_text) else {
        return false;
    };
    let Value::Mapping(mapping) = parsed else {
        return false;
    };
    match mapping.get(Value::from("services")) {
        Some(Value::Mapping(services)) => !services.is_empty(),
        _ => false,
    }
}

/// Applies the fixed set of line-level repair patches.
///
/// Normalizes line endings and tabs, drops lines that are a lone comma,
/// rewrites a bare `version:` line to a quoted default, and strips a
/// trailing comma (optionally followed by a comment) from each line end.
/// No structural repair is attempted beyond these patches.
#[must_use]
pub fn repair_compose_text(compose_text: &str) -> String {
    let normalized =
        compose_text.replace("\r\n", "\n").replace('\r', "\n").replace('\t', "  ");

    let mut lines: Vec<String> = Vec::new();
    for line in normalized.split('\n') {
        let current = line.trim_end();
        if current.trim() == "," {
            continue;
        }
        let current = if BARE_VERSION_RE.is_match(current) {
            "version: \"3.8\"".to_string()
        } else {
            TRAILING_COMMA_RE.replace(current, "$1").into_owned()
        };
        lines.push(current);
    }

    format!("{}\n", lines.join("\n").trim())
}

/// Finds the first `image:` reference in descriptor text.
///
/// The captured value is trimmed and stripped of surrounding quotes and a
/// trailing comma; `None` when no usable image line exists.
#[must_use]
pub fn first_image_reference(compose_text: &str) -> Option<String> {
    for line in compose_text.lines() {
        let Some(captures) = IMAGE_LINE_RE.captures(line) else {
            continue;
        };
        let image = captures[1].trim().trim_end_matches(',');
        let image = image.trim_end().trim_matches(|c| c == '"' || c == '\'');
        if !image.is_empty() {
            return Some(image.to_string());
        }
    }
    None
}

/// Infers an image reference from a Docker Hub URL.
///
/// `/r/<namespace>/<name>` maps to `docker.io/<namespace>/<name>:latest`,
/// `/_/<name>` to `docker.io/<name>:latest`. Hosts outside docker.com
/// yield `None`.
#[must_use]
pub fn image_from_docker_hub(docker_hub_url: Option<&str>) -> Option<String> {
    let parsed = url::Url::parse(docker_hub_url?).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    if !host.contains("docker.com") {
        return None;
    }

    let parts: Vec<&str> =
        parsed.path().split('/').filter(|segment| !segment.is_empty()).collect();
    let repo = match parts.as_slice() {
        ["r", namespace, name, ..] => format!("{namespace}/{name}"),
        ["r", name] | ["_", name, ..] => (*name).to_string(),
        _ => return None,
    };

    Some(format!("docker.io/{repo}:latest"))
}

/// Synthesizes a minimal fallback descriptor.
///
/// The single service is named from the base id (`app` when empty); its
/// image comes from the first image line of the repaired text, else from
/// the Docker Hub URL, else a placeholder. Always structurally valid.
#[must_use]
pub fn build_fallback_compose(
    base_id: &str,
    raw_compose: &str,
    docker_hub_url: Option<&str>,
) -> String {
    let image = first_image_reference(raw_compose)
        .or_else(|| image_from_docker_hub(docker_hub_url))
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());

    let service_name = if base_id.is_empty() { "app" } else { base_id };
    format!(
        "version: \"3.8\"\n\nservices:\n  {service_name}:\n    image: {image}\n    restart: unless-stopped\n"
    )
}

/// Runs the three-tier sanitation pipeline over a descriptor candidate.
#[must_use]
pub fn sanitize_compose(
    base_id: &str,
    compose_text: &str,
    docker_hub_url: Option<&str>,
) -> Sanitized {
    if compose_is_valid(compose_text) {
        return Sanitized::AsIs(compose_text.to_string());
    }

    let repaired = repair_compose_text(compose_text);
    if compose_is_valid(&repaired) {
        return Sanitized::Repaired(repaired);
    }

    Sanitized::Fallback(build_fallback_compose(base_id, &repaired, docker_hub_url))
}
