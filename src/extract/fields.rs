//! Field extractors for title, description, and resource links.
//!
//! Each extractor tries an ordered list of pattern alternatives against the
//! chunk payload and decodes the first capture. The patterns target the
//! bundler's stable output shape (heading/paragraph props, resource rows);
//! a miss is answered with a defined default, never an error.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::extract::decode::decode_js_string;

/// Title returned when no heading or title prop matches.
pub const DEFAULT_TITLE: &str = "Untitled App";

static TITLE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r#"\.h1,\{children:"((?:\\.|[^"\\])*)"\}"#).expect("static regex must compile"),
        Regex::new(r#"title:"((?:\\.|[^"\\])*)"\}"#).expect("static regex must compile"),
    ]
});

static DESCRIPTION_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![Regex::new(r#"\.p,\{children:"((?:\\.|[^"\\])*)"\}"#).expect("static regex must compile")]
});

static RESOURCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"children:\["(Website|GitHub|Docker Hub|Configuration): ","#,
        r#"\([^)]*\)\([^,]+,\{href:"([^"]+)""#,
    ))
    .expect("static regex must compile")
});

/// Returns the first capture of the first matching pattern, decoded and
/// trimmed.
fn find_first(matchers: &[Regex], text: &str) -> Option<String> {
    matchers
        .iter()
        .find_map(|re| re.captures(text))
        .map(|c| decode_js_string(&c[1]).trim().to_string())
}

/// Extracts the app title, falling back to [`DEFAULT_TITLE`].
#[must_use]
pub fn extract_title(chunk_js: &str) -> String {
    find_first(&TITLE_RES, chunk_js).unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// Extracts the app description; empty when no paragraph prop matches.
#[must_use]
pub fn extract_description(chunk_js: &str) -> String {
    find_first(&DESCRIPTION_RES, chunk_js).unwrap_or_default()
}

/// Extracts the resource-link rows into a label-to-URL map.
///
/// Labels are the fixed set `Website`, `GitHub`, `Docker Hub`, and
/// `Configuration`; labels missing from the payload are simply absent
/// from the map, which callers must treat as "unknown".
#[must_use]
pub fn extract_resources(chunk_js: &str) -> BTreeMap<String, String> {
    let mut resources = BTreeMap::new();
    for captures in RESOURCE_RE.captures_iter(chunk_js) {
        resources.insert(captures[1].to_string(), decode_js_string(&captures[2]));
    }
    resources
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_prefers_heading_prop() {
        let chunk = r#"(0,n.jsx)(e.h1,{children:"Gitea"}) title:"Fallback"}"#;
        assert_eq!(extract_title(chunk), "Gitea");
    }

    #[test]
    fn title_falls_back_to_title_prop() {
        let chunk = r#"meta={title:"Jellyfin"}"#;
        assert_eq!(extract_title(chunk), "Jellyfin");
    }

    #[test]
    fn title_defaults_when_absent() {
        assert_eq!(extract_title("no props at all"), DEFAULT_TITLE);
    }

    #[test]
    fn title_is_decoded_and_trimmed() {
        let chunk = r#".h1,{children:" Navidrome \u2014 Music "}"#;
        assert_eq!(extract_title(chunk), "Navidrome \u{2014} Music");
    }

    #[test]
    fn description_defaults_to_empty() {
        assert_eq!(extract_description("nothing"), "");
    }

    #[test]
    fn description_matches_paragraph_prop() {
        let chunk = r#"(0,n.jsx)(e.p,{children:"A self-hosted git service."})"#;
        assert_eq!(extract_description(chunk), "A self-hosted git service.");
    }

    #[test]
    fn resources_collects_known_labels() {
        let chunk = concat!(
            r#"children:["Website: ",(0,n.jsx)(e.a,{href:"https://gitea.io"}"#,
            r#"children:["GitHub: ",(0,n.jsx)(e.a,{href:"https://github.com/go-gitea/gitea"}"#,
        );
        let resources = extract_resources(chunk);
        assert_eq!(resources["Website"], "https://gitea.io");
        assert_eq!(resources["GitHub"], "https://github.com/go-gitea/gitea");
        assert!(!resources.contains_key("Docker Hub"));
    }

    #[test]
    fn unknown_label_is_ignored() {
        let chunk = r#"children:["Forum: ",(0,n.jsx)(e.a,{href:"https://forum.example"}"#;
        assert!(extract_resources(chunk).is_empty());
    }
}
