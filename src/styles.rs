//! Style import collection: the closure of `@import`-reachable sheets.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::discovery::normalize_path;
use crate::document::{self, Document, Grammar};
use crate::error::Error;

/// Result of walking the style import graph.
pub struct StyleClosure {
    /// Sheets that exist but could not be parsed, keyed by path. Their
    /// imports cannot be followed; the failure is reported, not dropped.
    pub errors: Vec<(PathBuf, Error)>,
    /// Every parsable sheet reachable from the entries, entries included.
    pub sheets: BTreeSet<PathBuf>,
}

/// Follow `@import` directives from each entry sheet to closure.
///
/// Entries that do not exist are skipped, since a unit need not have a style
/// sheet. The shared visited set guards against import cycles.
pub fn collect(entries: &[PathBuf]) -> StyleClosure {
    let mut closure = StyleClosure {
        errors: Vec::new(),
        sheets: BTreeSet::new(),
    };
    let mut visited = BTreeSet::new();
    for entry in entries {
        follow(entry, &mut visited, &mut closure);
    }
    closure
}

/// Visit one sheet: record it, then recurse into its imports.
fn follow(path: &Path, visited: &mut BTreeSet<PathBuf>, closure: &mut StyleClosure) {
    if !visited.insert(path.to_path_buf()) {
        return;
    }
    let Ok(text) = std::fs::read_to_string(path) else {
        return;
    };

    let doc = match Document::parse(Grammar::Style, path, text) {
        Ok(doc) => doc,
        Err(e) => {
            closure.errors.push((path.to_path_buf(), e));
            return;
        },
    };
    closure.sheets.insert(path.to_path_buf());

    let dir = path.parent().map_or_else(PathBuf::new, Path::to_path_buf);
    for target in document::style_imports(&doc) {
        let mut resolved = normalize_path(&dir.join(&target));
        if resolved.extension().is_none() {
            resolved.set_extension("wxss");
        }
        follow(&resolved, visited, closure);
    }
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
    fn import_cycle_returns_exactly_the_two_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "a.wxss", "@import \"b.wxss\";\n.a { color: red; }");
        write(root, "b.wxss", "@import \"a.wxss\";\n.b { color: blue; }");

        let closure = collect(&[root.join("a.wxss")]);

        assert!(closure.errors.is_empty());
        assert_eq!(closure.sheets.len(), 2);
        assert!(closure.sheets.contains(&root.join("a.wxss")));
        assert!(closure.sheets.contains(&root.join("b.wxss")));
    }

    #[test]
    fn missing_sheets_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "a.wxss", "@import \"gone.wxss\";\n.a { color: red; }");

        let closure = collect(&[root.join("a.wxss"), root.join("absent.wxss")]);

        assert!(closure.errors.is_empty());
        assert_eq!(closure.sheets.len(), 1);
    }

    #[test]
    fn unparsable_sheet_is_reported_not_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "a.wxss", "@import \"broken.wxss\";\n.a { color: red; }");
        write(root, "broken.wxss", "}");

        let closure = collect(&[root.join("a.wxss")]);

        assert_eq!(closure.sheets.len(), 1);
        assert_eq!(closure.errors.len(), 1);
        let (path, error) = closure.errors.first().unwrap();
        assert_eq!(path, &root.join("broken.wxss"));
        assert!(matches!(error, Error::ParseFailed { .. }));
    }
}
