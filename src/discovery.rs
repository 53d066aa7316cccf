//! Dependency discovery: from the root manifest to the closed set of
//! pages and components that need analysis.
//!
//! The work list is built entirely before any analysis starts and is
//! write-once per key, so the concurrent analysis phase never locks it.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use crate::error::Error;
use crate::types::UnitRole;

/// Deduplicated analysis work list: resolved unit base path (no extension)
/// to the role it was discovered under.
pub type WorkList = BTreeMap<PathBuf, UnitRole>;

/// Root manifest (`app.json`), read-only input to discovery.
#[derive(Debug, Deserialize)]
pub struct AppManifest {
    /// Lazy-loading mode; `"requiredComponents"` enables on-demand injection.
    #[serde(default, rename = "lazyCodeLoading")]
    pub lazy_code_loading: Option<String>,
    /// All page identifiers, relative to the project root.
    #[serde(default)]
    pub pages: Vec<String>,
    /// Global render-mode setting.
    #[serde(default)]
    pub renderer: Option<String>,
    /// Globally registered components, resolved against the project root.
    #[serde(default, rename = "usingComponents")]
    pub using_components: BTreeMap<String, String>,
}

/// Per-unit configuration (`<base>.json`), read-only input to discovery.
#[derive(Debug, Default, Deserialize)]
struct UnitConfig {
    /// Render-mode override for this unit.
    #[serde(default)]
    renderer: Option<String>,
    /// Child component references, local tag name to relative path.
    #[serde(default, rename = "usingComponents")]
    using_components: BTreeMap<String, String>,
}

/// Compute the closed set of units to analyze.
///
/// Selected pages are tagged `Page`; every unit reached through a
/// `usingComponents` chain is tagged `Component`. The presence check runs
/// before recursion, so circular references terminate.
///
/// # Errors
///
/// Any missing or unparsable configuration reachable from the manifest is
/// fatal: an incomplete graph would make the downstream checks unsound.
pub fn discover(root: &Path, selected: &[String]) -> Result<WorkList, Error> {
    let manifest = read_manifest(root)?;
    let pages = select_pages(root, &manifest, selected)?;

    let mut work = WorkList::new();
    for page in &pages {
        work.insert(normalize_path(&root.join(page)), UnitRole::Page);
    }

    // Globally registered components resolve against the project root.
    walk_components(root, root, &manifest.using_components, &mut work)?;

    for page in &pages {
        let base = normalize_path(&root.join(page));
        let config = read_unit_config(&base)?;
        let dir = base.parent().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
        walk_components(root, &dir, &config.using_components, &mut work)?;
    }

    Ok(work)
}

/// Read and parse the root manifest.
///
/// # Errors
///
/// Returns `Error::ManifestNotFound` or `Error::ManifestInvalid`.
pub fn read_manifest(root: &Path) -> Result<AppManifest, Error> {
    let path = root.join("app.json");
    let text = match std::fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::ManifestNotFound { path });
        },
        Err(e) => return Err(Error::Io(e)),
    };
    return serde_json::from_str(&text).map_err(|e| {
        return Error::ManifestInvalid {
            path,
            reason: e.to_string(),
        };
    });
}

/// Decide which pages to analyze.
///
/// An explicit selection is validated against the manifest. An empty
/// selection defaults to every page when the global renderer is skyline,
/// otherwise to the pages whose own config opts in.
fn select_pages(
    root: &Path,
    manifest: &AppManifest,
    requested: &[String],
) -> Result<Vec<String>, Error> {
    if !requested.is_empty() {
        for page in requested {
            if !manifest.pages.contains(page) {
                return Err(Error::UnknownPage { page: page.clone() });
            }
        }
        return Ok(requested.to_vec());
    }

    if manifest.renderer.as_deref() == Some("skyline") {
        return Ok(manifest.pages.clone());
    }

    let mut selected = Vec::new();
    for page in &manifest.pages {
        let config = read_unit_config(&normalize_path(&root.join(page)))?;
        if config.renderer.as_deref() == Some("skyline") {
            selected.push(page.clone());
        }
    }
    Ok(selected)
}

/// Depth-first walk over `usingComponents` references.
///
/// References resolve relative to the referencing unit's directory; a
/// leading `/` is project-root-relative; `plugin://` references name
/// packaged code outside the analyzable tree and are skipped.
fn walk_components(
    root: &Path,
    dir: &Path,
    components: &BTreeMap<String, String>,
    work: &mut WorkList,
) -> Result<(), Error> {
    for target in components.values() {
        if target.starts_with("plugin://") {
            continue;
        }
        let base = match target.strip_prefix('/') {
            Some(rest) => normalize_path(&root.join(rest)),
            None => normalize_path(&dir.join(target)),
        };
        if work.contains_key(&base) {
            continue;
        }
        work.insert(base.clone(), UnitRole::Component);

        let config = read_unit_config(&base)?;
        let child_dir = base.parent().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
        walk_components(root, &child_dir, &config.using_components, work)?;
    }
    Ok(())
}

/// Read a unit's configuration from `<base>.json`.
///
/// # Errors
///
/// Returns `Error::ConfigNotFound` or `Error::ConfigInvalid`, both fatal
/// to discovery, never silently skipped.
fn read_unit_config(base: &Path) -> Result<UnitConfig, Error> {
    let path = base.with_extension("json");
    let text = match std::fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::ConfigNotFound { path });
        },
        Err(e) => return Err(Error::Io(e)),
    };
    return serde_json::from_str(&text).map_err(|e| {
        return Error::ConfigInvalid {
            path,
            reason: e.to_string(),
        };
    });
}

/// Collapse `.` and `..` components lexically without touching the
/// filesystem. Preserves leading `..` when there is nothing left to pop.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                let can_pop = matches!(
                    components.last(),
                    Some(c) if !matches!(c, Component::ParentDir)
                );
                if can_pop {
                    components.pop();
                } else {
                    components.push(component);
                }
            },
            other => components.push(other),
        }
    }
    components.iter().collect()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn selection_excludes_unselected_pages() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "app.json", r#"{"pages": ["pages/a/a", "pages/b/b"]}"#);
        write(
            root,
            "pages/a/a.json",
            r#"{"usingComponents": {"x": "../../comp/x"}}"#,
        );
        write(root, "comp/x.json", "{}");

        let work = discover(root, &["pages/a/a".to_string()]).unwrap();

        assert_eq!(work.len(), 2);
        assert_eq!(work.get(&root.join("pages/a/a")), Some(&UnitRole::Page));
        assert_eq!(work.get(&root.join("comp/x")), Some(&UnitRole::Component));
        assert!(!work.contains_key(&root.join("pages/b/b")));
    }

    #[test]
    fn circular_references_terminate() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "app.json", r#"{"pages": ["pages/a/a"]}"#);
        write(
            root,
            "pages/a/a.json",
            r#"{"usingComponents": {"x": "../../comp/x"}}"#,
        );
        write(
            root,
            "comp/x.json",
            r#"{"usingComponents": {"y": "./y"}}"#,
        );
        write(
            root,
            "comp/y.json",
            r#"{"usingComponents": {"x": "./x"}}"#,
        );

        let work = discover(root, &["pages/a/a".to_string()]).unwrap();

        assert_eq!(work.len(), 3);
        assert_eq!(work.get(&root.join("comp/x")), Some(&UnitRole::Component));
        assert_eq!(work.get(&root.join("comp/y")), Some(&UnitRole::Component));
    }

    #[test]
    fn missing_component_config_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "app.json", r#"{"pages": ["pages/a/a"]}"#);
        write(
            root,
            "pages/a/a.json",
            r#"{"usingComponents": {"gone": "../../comp/gone"}}"#,
        );

        let result = discover(root, &["pages/a/a".to_string()]);
        assert!(matches!(result, Err(Error::ConfigNotFound { .. })));
    }

    #[test]
    fn default_selection_follows_renderer_opt_in() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "app.json", r#"{"pages": ["pages/a/a", "pages/b/b"]}"#);
        write(root, "pages/a/a.json", r#"{"renderer": "skyline"}"#);
        write(root, "pages/b/b.json", "{}");

        let work = discover(root, &[]).unwrap();

        assert_eq!(work.len(), 1);
        assert_eq!(work.get(&root.join("pages/a/a")), Some(&UnitRole::Page));
    }

    #[test]
    fn unknown_page_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "app.json", r#"{"pages": ["pages/a/a"]}"#);

        let result = discover(root, &["pages/zzz/zzz".to_string()]);
        assert!(matches!(result, Err(Error::UnknownPage { .. })));
    }
}
