//! Workspace member resolution for npm manifests.

use crate::error::{Error, Result};
use glob::Pattern;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories never considered while matching workspace patterns.
const PRUNED_DIRS: [&str; 4] = ["node_modules", ".git", "target", "dist"];

/// Resolves workspace glob patterns to concrete member directories.
///
/// Pattern declaration order is preserved. Within one pattern, matches are
/// ordered lexicographically; a directory matched by several patterns keeps
/// its first position. A pattern matching nothing is skipped without error.
/// A literal, glob-free pattern matches its own directory.
pub(crate) fn resolve_member_dirs(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut members = Vec::new();
    let mut seen = BTreeSet::new();

    for raw in patterns {
        let pattern = Pattern::new(raw).map_err(|err| Error::Parse {
            path: root.to_path_buf(),
            message: format!("invalid workspace pattern '{raw}': {err}"),
        })?;

        let mut matches = Vec::new();
        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                let name = entry.file_name().to_str().unwrap_or("");
                !PRUNED_DIRS.contains(&name)
            })
            .filter_map(std::result::Result::ok)
        {
            if !entry.file_type().is_dir() || entry.path() == root {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            if pattern.matches_path(relative) {
                matches.push(entry.path().to_path_buf());
            }
        }

        if matches.is_empty() {
            tracing::debug!("workspace pattern '{raw}' matched no directories under {}", root.display());
            continue;
        }

        matches.sort();
        for path in matches {
            if seen.insert(path.clone()) {
                members.push(path);
            }
        }
    }

    Ok(members)
}
