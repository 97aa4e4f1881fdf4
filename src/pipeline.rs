//! End-to-end extraction pipeline.
//!
//! One run fully regenerates the catalog: discover the build, walk every
//! leaf route, extract and sanitize each descriptor, then assign ids and
//! write the output tree. Failures while processing a single route are
//! logged and skip that entry; only a missing build id or an empty route
//! manifest abort the run.

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, info, warn};
use url::Url;

use crate::catalog::stats::RunStats;
use crate::catalog::{self, ids, manifest, ExtractedApp, DEFAULT_DEVELOPER};
use crate::config::SourceConfig;
use crate::context::ServiceContext;
use crate::extract;
use crate::routes;
use crate::sanitize;

/// Runs a full catalog sync.
///
/// # Errors
///
/// Returns an error when the home page or build manifest cannot be
/// fetched, the build id or route manifest is missing (the upstream site
/// changed shape), or output writing fails.
pub async fn run(
    ctx: &ServiceContext,
    config: &SourceConfig,
    out_dir: &Path,
    commit_file: &Path,
) -> Result<(), String> {
    let base_url = config.base_url();
    let channel = config.channel();
    info!("Syncing catalog from {base_url} (channel {channel})");

    let home_html = ctx
        .http
        .fetch(&format!("{base_url}/"))
        .await
        .map_err(|e| format!("Failed to fetch home page: {e}"))?;
    let build_id = routes::extract_build_id(&home_html)
        .ok_or_else(|| "Could not determine build id from home page".to_string())?;
    debug!("Build id {build_id}");

    let manifest_url = format!("{base_url}/_next/static/{build_id}/_buildManifest.js");
    let manifest_js = ctx
        .http
        .fetch(&manifest_url)
        .await
        .map_err(|e| format!("Failed to fetch build manifest: {e}"))?;
    let route_to_chunk = routes::parse_route_chunks(&manifest_js);
    if route_to_chunk.is_empty() {
        return Err("No app routes found in build manifest".to_string());
    }
    info!("Discovered {} app routes", route_to_chunk.len());

    let mut entries: Vec<ExtractedApp> = Vec::new();
    let mut status_counts: BTreeMap<String, u64> = BTreeMap::new();

    for (route, chunk_path) in &route_to_chunk {
        match extract_entry(ctx, &base_url, route, chunk_path).await {
            Ok(Some(app)) => {
                *status_counts.entry(app.compose_status.to_string()).or_insert(0) += 1;
                entries.push(app);
            }
            Ok(None) => {}
            Err(e) => warn!("Skipping {route}: {e}"),
        }
    }

    ids::choose_ids(&mut entries);

    for app in &entries {
        manifest::write_app(ctx.fs.as_ref(), &out_dir.join(&app.id), app)?;
    }

    ctx.fs
        .write(commit_file, &format!("{build_id}\n"))
        .map_err(|e| format!("Failed to write commit file: {e}"))?;

    let stats =
        RunStats::new(ctx.clock.now(), &base_url, &build_id, entries.len(), status_counts);
    ctx.fs
        .write(&out_dir.join(".source-stats.json"), &stats.to_json()?)
        .map_err(|e| format!("Failed to write run stats: {e}"))?;

    info!("Wrote {} apps to {}", entries.len(), out_dir.display());
    Ok(())
}

/// Extracts one catalog entry from its route.
///
/// `Ok(None)` means the route is structurally not an app page (too few
/// segments, or a slug that slugifies to nothing); an `Err` means the
/// chunk fetch failed and the entry is skipped with a diagnostic.
async fn extract_entry(
    ctx: &ServiceContext,
    base_url: &str,
    route: &str,
    chunk_path: &str,
) -> Result<Option<ExtractedApp>, String> {
    let segments = routes::route_segments(route);
    if segments.len() < 3 {
        debug!("Ignoring non-app route {route}");
        return Ok(None);
    }
    let category_slug = routes::slugify(&segments[1..segments.len() - 1].join("-"));
    let base_id = routes::slugify(&segments[segments.len() - 1]);
    if base_id.is_empty() {
        debug!("Ignoring route {route} with empty slug");
        return Ok(None);
    }

    let chunk_url = join_base(base_url, &format!("_next/{}", chunk_path.trim()))?;
    let chunk_js = ctx
        .http
        .fetch(&chunk_url)
        .await
        .map_err(|e| format!("Failed to fetch chunk: {e}"))?;

    let resources = extract::fields::extract_resources(&chunk_js);
    let resource = |label: &str| {
        catalog::normalize_url(resources.get(label).map(String::as_str), base_url)
    };
    let website = resource("Website");
    let github = resource("GitHub");
    let config_url = resource("Configuration");
    let docker_hub = resource("Docker Hub");

    let title = extract::fields::extract_title(&chunk_js);
    let mut description = extract::fields::extract_description(&chunk_js);

    let sanitized = match extract::extract_compose(&chunk_js) {
        Some(compose) => sanitize::sanitize_compose(&base_id, &compose, docker_hub.as_deref()),
        None => sanitize::Sanitized::Fallback(sanitize::build_fallback_compose(
            &base_id,
            "",
            docker_hub.as_deref(),
        )),
    };
    if sanitized.status() != "as-is" {
        debug!("Descriptor for {route} degraded to {}", sanitized.status());
    }

    let route_url = join_base(base_url, route.trim_start_matches('/'))?;
    let website = website.unwrap_or_else(|| route_url.clone());
    let repo = github.clone().or_else(|| config_url.clone()).unwrap_or_else(|| route_url.clone());
    let support = config_url.or_else(|| github.clone()).unwrap_or_else(|| route_url.clone());
    let developer =
        catalog::github_owner(github.as_deref()).unwrap_or_else(|| DEFAULT_DEVELOPER.to_string());

    let compose_status = sanitized.status();
    let compose = sanitized.into_text();
    let version = catalog::extract_image_version(&compose);

    if description.is_empty() {
        description = title.clone();
    }
    let tagline = match catalog::first_sentence(&description, 120) {
        t if t.is_empty() => title.clone(),
        t => t,
    };

    Ok(Some(ExtractedApp {
        id: String::new(),
        base_id,
        category_slug,
        title,
        description,
        tagline,
        compose,
        compose_status,
        version,
        developer,
        website,
        repo,
        support,
    }))
}

/// Joins a relative path under the catalog base URL.
fn join_base(base_url: &str, relative: &str) -> Result<String, String> {
    let base = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))
        .map_err(|e| format!("Invalid base URL {base_url}: {e}"))?;
    base.join(relative)
        .map(String::from)
        .map_err(|e| format!("Failed to join URL {relative} onto base: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    use chrono::{DateTime, TimeZone, Utc};

    use crate::ports::clock::Clock;
    use crate::ports::filesystem::FileSystem;
    use crate::ports::http::{FetchFuture, HttpFetcher};

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    /// Canned fetcher serving a fixed URL-to-body map.
    struct MemFetcher {
        pages: HashMap<String, String>,
    }

    impl HttpFetcher for MemFetcher {
        fn fetch(&self, url: &str) -> FetchFuture<'_> {
            let result = self
                .pages
                .get(url)
                .cloned()
                .ok_or_else(|| format!("no canned page for {url}"));
            Box::pin(async move { result.map_err(Into::into) })
        }
    }

    const BASE: &str = "https://catalog.example";

    fn chunk_for(title: &str, lines: &[&str]) -> String {
        let mut elements: Vec<String> = Vec::new();
        for (index, line) in lines.iter().enumerate() {
            if index > 0 {
                elements.push(r#""\n""#.to_string());
            }
            elements.push(format!(r#"{{children:"{line}"}}"#));
        }
        format!(
            r#".h1,{{children:"{title}"}} (e.p,{{children:"A {title} server. More text."}}) pre,{{"data-language":"yaml",children:[{}]}}"#,
            elements.join(",")
        )
    }

    fn test_context(pages: HashMap<String, String>) -> (ServiceContext, std::sync::Arc<Mutex<HashMap<PathBuf, String>>>) {
        let files = std::sync::Arc::new(Mutex::new(HashMap::new()));

        struct SharedFs(std::sync::Arc<Mutex<HashMap<PathBuf, String>>>);
        impl FileSystem for SharedFs {
            fn write(
                &self,
                path: &Path,
                contents: &str,
            ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
                self.0.lock().unwrap().insert(path.to_path_buf(), contents.to_string());
                Ok(())
            }
        }

        let ctx = ServiceContext {
            clock: Box::new(FixedClock(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap())),
            fs: Box::new(SharedFs(files.clone())),
            http: Box::new(MemFetcher { pages }),
        };
        (ctx, files)
    }

    fn canned_site() -> HashMap<String, String> {
        let mut pages = HashMap::new();
        pages.insert(
            format!("{BASE}/"),
            r#"<script>{"buildId":"bld42"}</script>"#.to_string(),
        );
        pages.insert(
            format!("{BASE}/_next/static/bld42/_buildManifest.js"),
            concat!(
                r#""/apps/Development/Gitea":["static/chunks/pages/apps/gitea-1.js"],"#,
                r#""/apps/Media/Jellyfin":["static/chunks/pages/apps/jellyfin-2.js"]"#,
            )
            .to_string(),
        );
        pages.insert(
            format!("{BASE}/_next/static/chunks/pages/apps/gitea-1.js"),
            chunk_for("Gitea", &["services:", "  gitea:", "    image: gitea/gitea:1.21"]),
        );
        pages.insert(
            format!("{BASE}/_next/static/chunks/pages/apps/jellyfin-2.js"),
            chunk_for("Jellyfin", &["services:", "  jellyfin:", "    image: jellyfin/jellyfin"]),
        );
        pages
    }

    #[tokio::test]
    async fn full_run_writes_catalog_tree() {
        let (ctx, files) = test_context(canned_site());
        let config = SourceConfig::from_json(&format!(r#"{{"repo_url":"{BASE}"}}"#)).unwrap();

        run(&ctx, &config, Path::new("/out"), Path::new("/state/commit.txt")).await.unwrap();

        let files = files.lock().unwrap();
        let compose = &files[&PathBuf::from("/out/gitea/docker-compose.yml")];
        assert_eq!(compose, "services:\n  gitea:\n    image: gitea/gitea:1.21\n");

        let manifest = &files[&PathBuf::from("/out/gitea/hiveden-app.yml")];
        assert!(manifest.contains("name: Gitea"));
        assert!(manifest.contains("version: \"1.21\"") || manifest.contains("version: '1.21'"));
        assert!(manifest.contains("tagline: A Gitea server."));
        assert!(manifest.contains("category: development"));

        assert_eq!(files[&PathBuf::from("/state/commit.txt")], "bld42\n");

        let stats = &files[&PathBuf::from("/out/.source-stats.json")];
        assert!(stats.contains("\"build_id\": \"bld42\""));
        assert!(stats.contains("\"total_apps\": 2"));
        assert!(stats.contains("\"as-is\": 2"));
    }

    #[tokio::test]
    async fn missing_build_id_is_fatal() {
        let mut pages = HashMap::new();
        pages.insert(format!("{BASE}/"), "<html>no marker</html>".to_string());
        let (ctx, _) = test_context(pages);
        let config = SourceConfig::from_json(&format!(r#"{{"repo_url":"{BASE}"}}"#)).unwrap();

        let err = run(&ctx, &config, Path::new("/out"), Path::new("/c")).await.unwrap_err();
        assert!(err.contains("build id"));
    }

    #[tokio::test]
    async fn empty_route_manifest_is_fatal() {
        let mut pages = HashMap::new();
        pages.insert(format!("{BASE}/"), r#"{"buildId":"bld42"}"#.to_string());
        pages.insert(
            format!("{BASE}/_next/static/bld42/_buildManifest.js"),
            "self.__BUILD_MANIFEST={}".to_string(),
        );
        let (ctx, _) = test_context(pages);
        let config = SourceConfig::from_json(&format!(r#"{{"repo_url":"{BASE}"}}"#)).unwrap();

        let err = run(&ctx, &config, Path::new("/out"), Path::new("/c")).await.unwrap_err();
        assert!(err.contains("No app routes"));
    }

    #[tokio::test]
    async fn failed_chunk_fetch_skips_entry_not_run() {
        let mut pages = canned_site();
        pages.remove(&format!("{BASE}/_next/static/chunks/pages/apps/jellyfin-2.js"));
        let (ctx, files) = test_context(pages);
        let config = SourceConfig::from_json(&format!(r#"{{"repo_url":"{BASE}"}}"#)).unwrap();

        run(&ctx, &config, Path::new("/out"), Path::new("/c")).await.unwrap();

        let files = files.lock().unwrap();
        assert!(files.contains_key(&PathBuf::from("/out/gitea/docker-compose.yml")));
        assert!(!files.contains_key(&PathBuf::from("/out/jellyfin/docker-compose.yml")));
        assert!(files[&PathBuf::from("/out/.source-stats.json")].contains("\"total_apps\": 1"));
    }

    #[tokio::test]
    async fn short_and_unsluggable_routes_are_skipped() {
        let mut pages = canned_site();
        // Two-segment route and a leaf whose name slugifies to nothing.
        // Both carry extractable chunks so a missing skip would show up
        // as an extra catalog entry.
        pages.insert(
            format!("{BASE}/_next/static/bld42/_buildManifest.js"),
            concat!(
                r#""/apps/Development/Gitea":["static/chunks/pages/apps/gitea-1.js"],"#,
                r#""/apps/Short":["static/chunks/pages/apps/short-3.js"],"#,
                r#""/apps/Media/%21%21":["static/chunks/pages/apps/bang-4.js"]"#,
            )
            .to_string(),
        );
        pages.insert(
            format!("{BASE}/_next/static/chunks/pages/apps/short-3.js"),
            chunk_for("Short", &["services:", "  short:", "    image: short/short:1.0"]),
        );
        pages.insert(
            format!("{BASE}/_next/static/chunks/pages/apps/bang-4.js"),
            chunk_for("Bang", &["services:", "  bang:", "    image: bang/bang:1.0"]),
        );
        let (ctx, files) = test_context(pages);
        let config = SourceConfig::from_json(&format!(r#"{{"repo_url":"{BASE}"}}"#)).unwrap();

        run(&ctx, &config, Path::new("/out"), Path::new("/c")).await.unwrap();

        let files = files.lock().unwrap();
        assert!(files.contains_key(&PathBuf::from("/out/gitea/docker-compose.yml")));
        // gitea compose + manifest, commit file, stats; nothing else.
        assert_eq!(files.len(), 4);
        let stats = &files[&PathBuf::from("/out/.source-stats.json")];
        assert!(stats.contains("\"total_apps\": 1"));
    }

    #[tokio::test]
    async fn chunk_without_descriptor_gets_fallback() {
        let mut pages = canned_site();
        pages.insert(
            format!("{BASE}/_next/static/chunks/pages/apps/jellyfin-2.js"),
            concat!(
                r#".h1,{children:"Jellyfin"} "#,
                r#"children:["Docker Hub: ",(0,n.jsx)(e.a,{href:"https://hub.docker.com/r/jellyfin/jellyfin"}"#,
            )
            .to_string(),
        );
        let (ctx, files) = test_context(pages);
        let config = SourceConfig::from_json(&format!(r#"{{"repo_url":"{BASE}"}}"#)).unwrap();

        run(&ctx, &config, Path::new("/out"), Path::new("/c")).await.unwrap();

        let files = files.lock().unwrap();
        let compose = &files[&PathBuf::from("/out/jellyfin/docker-compose.yml")];
        assert!(compose.contains("image: docker.io/jellyfin/jellyfin:latest"));
        assert!(compose.contains("restart: unless-stopped"));
        assert!(files[&PathBuf::from("/out/.source-stats.json")].contains("\"fallback\": 1"));
    }
}
