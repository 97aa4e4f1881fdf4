//! Route discovery from the catalog site's build manifest.
//!
//! The site is a compiled Next.js bundle: the home page embeds a build id,
//! and `_buildManifest.js` for that build maps each app route to the script
//! chunk that renders it. Only leaf routes (actual app pages, not category
//! indexes) are kept.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

static BUILD_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""buildId":"([^"]+)""#).expect("static regex must compile"));

static ROUTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(/apps/[^"]+)":\[(.*?)\]"#).expect("static regex must compile"));

static CHUNK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(static/chunks/pages/apps/[^"]+\.js)""#).expect("static regex must compile")
});

/// Extracts the build id embedded in the home page HTML.
///
/// Returns `None` if the marker is absent, which callers treat as fatal:
/// without a build id the asset bundle cannot be located.
#[must_use]
pub fn extract_build_id(home_html: &str) -> Option<String> {
    BUILD_ID_RE.captures(home_html).map(|c| c[1].to_string())
}

/// Parses the build manifest into a route-to-chunk mapping of leaf routes.
///
/// Collects every `/apps/...` route with a recognizable page chunk, then
/// filters in a second pass: the `/apps` index itself, metadata routes,
/// the upstream template entry, and any route that is a strict path-prefix
/// of another discovered route are all dropped. The returned map iterates
/// in lexicographic route order, which keeps downstream id assignment
/// deterministic.
#[must_use]
pub fn parse_route_chunks(manifest_js: &str) -> BTreeMap<String, String> {
    let mut route_to_chunk: BTreeMap<String, String> = BTreeMap::new();
    for captures in ROUTE_RE.captures_iter(manifest_js) {
        let route = &captures[1];
        let array_text = &captures[2];
        if let Some(chunk) = CHUNK_RE.captures(array_text) {
            route_to_chunk.insert(route.to_string(), chunk[1].to_string());
        }
    }

    let all_routes: Vec<String> = route_to_chunk.keys().cloned().collect();
    route_to_chunk
        .into_iter()
        .filter(|(route, _)| is_leaf_route(route, &all_routes))
        .collect()
}

fn is_leaf_route(route: &str, all_routes: &[String]) -> bool {
    if route == "/apps" || route == "/apps/" {
        return false;
    }
    if route.contains("/_meta") {
        return false;
    }
    if route == "/apps/A-Template" {
        return false;
    }
    let prefix = format!("{route}/");
    !all_routes.iter().any(|other| other != route && other.starts_with(&prefix))
}

/// Slugifies a value: lowercase, runs of non-alphanumeric characters
/// collapse to a single `-`, leading and trailing `-` stripped.
#[must_use]
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut last_was_dash = false;
    for ch in value.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }
    slug.trim_matches('-').to_string()
}

/// Decodes percent-escaped sequences in a route segment.
///
/// Invalid or truncated escapes pass through unchanged; the decoded bytes
/// are interpreted as UTF-8 with lossy replacement.
#[must_use]
pub fn percent_decode(segment: &str) -> String {
    let bytes = segment.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let Some(byte) = segment
                .get(i + 1..i + 3)
                .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Splits a route into percent-decoded path segments.
#[must_use]
pub fn route_segments(route: &str) -> Vec<String> {
    route.trim_matches('/').split('/').map(percent_decode).collect()
}
