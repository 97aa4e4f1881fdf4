//! Final identifier assignment across the full catalog.

use std::collections::{HashMap, HashSet};

use crate::catalog::ExtractedApp;

/// Assigns a unique final id to every entry, in place.
///
/// An entry whose base id is unique across the catalog keeps it. Entries
/// sharing a base id get `<base>-<category-slug>` (or `-app` when the
/// category slug is empty); any collision still remaining appends `-2`,
/// `-3`, ... in encounter order. Deterministic for a fixed input order.
pub fn choose_ids(entries: &mut [ExtractedApp]) {
    let mut base_counts: HashMap<String, usize> = HashMap::new();
    for entry in entries.iter() {
        *base_counts.entry(entry.base_id.clone()).or_insert(0) += 1;
    }

    let mut used: HashSet<String> = HashSet::new();
    for entry in entries.iter_mut() {
        let candidate = if base_counts.get(&entry.base_id) == Some(&1) {
            entry.base_id.clone()
        } else {
            let suffix =
                if entry.category_slug.is_empty() { "app" } else { entry.category_slug.as_str() };
            format!("{}-{suffix}", entry.base_id)
        };

        let mut unique = candidate.clone();
        let mut index = 2;
        while used.contains(&unique) {
            unique = format!("{candidate}-{index}");
            index += 1;
        }

        used.insert(unique.clone());
        entry.id = unique;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(base_id: &str, category_slug: &str) -> ExtractedApp {
        ExtractedApp {
            id: String::new(),
            base_id: base_id.to_string(),
            category_slug: category_slug.to_string(),
            title: String::new(),
            description: String::new(),
            tagline: String::new(),
            compose: String::new(),
            compose_status: "as-is",
            version: String::new(),
            developer: String::new(),
            website: String::new(),
            repo: String::new(),
            support: String::new(),
        }
    }

    #[test]
    fn unique_base_ids_are_kept() {
        let mut entries = vec![entry("gitea", "git-tools"), entry("jellyfin", "media")];
        choose_ids(&mut entries);
        assert_eq!(entries[0].id, "gitea");
        assert_eq!(entries[1].id, "jellyfin");
    }

    #[test]
    fn shared_base_ids_get_category_suffixes() {
        let mut entries = vec![entry("gitea", "git-tools"), entry("gitea", "dev-tools")];
        choose_ids(&mut entries);
        assert_eq!(entries[0].id, "gitea-git-tools");
        assert_eq!(entries[1].id, "gitea-dev-tools");
    }

    #[test]
    fn empty_category_slug_uses_app_suffix() {
        let mut entries = vec![entry("tool", ""), entry("tool", "")];
        choose_ids(&mut entries);
        assert_eq!(entries[0].id, "tool-app");
        assert_eq!(entries[1].id, "tool-app-2");
    }

    #[test]
    fn residual_collisions_get_numeric_suffixes() {
        let mut entries =
            vec![entry("x", "same"), entry("x", "same"), entry("x", "same")];
        choose_ids(&mut entries);
        assert_eq!(entries[0].id, "x-same");
        assert_eq!(entries[1].id, "x-same-2");
        assert_eq!(entries[2].id, "x-same-3");
    }

    #[test]
    fn assignment_is_deterministic_and_collision_free() {
        let build = || {
            vec![
                entry("a", "one"),
                entry("a", "two"),
                entry("b", ""),
                entry("b", ""),
                entry("c", "solo"),
            ]
        };
        let mut first = build();
        let mut second = build();
        choose_ids(&mut first);
        choose_ids(&mut second);

        let ids: HashSet<String> = first.iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids.len(), first.len());
        for (lhs, rhs) in first.iter().zip(second.iter()) {
            assert_eq!(lhs.id, rhs.id);
        }
    }
}
