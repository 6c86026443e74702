//! npm manifest writer: format-preserving requirement patches.

use crate::error::{Error, Result};
use crate::npm::scan::{self, DepSection, ScannedDependency};
use crate::npm::{parse_alias, WORKSPACE_SUFFIX};
use crate::types::{DependencyPatch, ManifestPatch};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Applies `patch` to the manifest at `path`, writing the result to `out`.
///
/// The substituted output is assembled in memory first; any validation
/// failure returns before a single byte reaches `out`.
pub(crate) fn write_manifest(path: &Path, out: &mut dyn Write, patch: &ManifestPatch) -> Result<()> {
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        source,
        path: Some(path.to_path_buf()),
        operation: "reading manifest".to_string(),
    })?;

    let output = patch_text(path, &text, patch)?;

    out.write_all(output.as_bytes()).map_err(|source| Error::Io {
        source,
        path: None,
        operation: "writing patched manifest".to_string(),
    })?;
    Ok(())
}

/// One occurrence of a requirement string in the original bytes.
#[derive(Debug)]
struct Occurrence {
    start: usize,
    end: usize,
    value: String,
}

/// A validated replacement, ready to splice.
#[derive(Debug)]
struct Edit {
    start: usize,
    end: usize,
    replacement: String,
    name: String,
}

fn patch_text(path: &Path, text: &str, patch: &ManifestPatch) -> Result<String> {
    // The index is rebuilt from the bytes on every call; the writer never
    // reuses a reader's state, so it stays correct without a prior read.
    //
    // Keys are the exposed key text as written. The patch's flavor
    // participates through its alias: an aliased patch is looked up under
    // the alias, never the real package name, since two entries can share
    // a real name under different aliases.
    let scanned = scan::scan_dependencies(path, text)?;
    let mut index: BTreeMap<String, Vec<Occurrence>> = BTreeMap::new();
    for dep in &scanned {
        if dep.section == DepSection::Peer {
            // Peer entries never reach the dependency graph, so no patch
            // can legitimately target them.
            continue;
        }
        index
            .entry(dep.key.clone())
            .or_default()
            .push(occurrence_for(dep));
    }

    let mut edits: Vec<Edit> = Vec::new();
    for dep_patch in &patch.deps {
        let key = exposed_key(dep_patch);
        let Some(occurrences) = index.get(&key) else {
            return Err(Error::NotFound { name: key });
        };
        // The same key can legitimately recur across sections (e.g. prod
        // and dev); every occurrence must match and every one is rewritten.
        for occurrence in occurrences {
            if occurrence.value != dep_patch.orig_require {
                return Err(Error::Conflict {
                    name: key,
                    expected: dep_patch.orig_require.clone(),
                    found: occurrence.value.clone(),
                });
            }
            edits.push(Edit {
                start: occurrence.start,
                end: occurrence.end,
                replacement: dep_patch.new_require.clone(),
                name: key.clone(),
            });
        }
    }

    edits.sort_by_key(|edit| edit.start);
    for pair in edits.windows(2) {
        if pair[1].start < pair[0].end {
            return Err(Error::OverlappingPatches {
                name: pair[1].name.clone(),
            });
        }
    }

    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;
    for edit in &edits {
        output.push_str(&text[cursor..edit.start]);
        output.push_str(&edit.replacement);
        cursor = edit.end;
    }
    output.push_str(&text[cursor..]);
    Ok(output)
}

/// The patchable span of a scanned entry. For an aliased entry only the
/// range after `npm:<real-name>@` is the requirement token; the protocol
/// and real name stay in place.
fn occurrence_for(dep: &ScannedDependency) -> Occurrence {
    if let Some((real_name, _)) = parse_alias(&dep.value) {
        if real_name != dep.key {
            let prefix_len = "npm:".len() + real_name.len() + 1;
            if dep.value.len() >= prefix_len {
                return Occurrence {
                    start: dep.value_start + prefix_len,
                    end: dep.value_end,
                    value: dep.value[prefix_len..].to_string(),
                };
            }
            // Alias without a declared range: no token to splice.
            return Occurrence {
                start: dep.value_end,
                end: dep.value_end,
                value: String::new(),
            };
        }
    }
    Occurrence {
        start: dep.value_start,
        end: dep.value_end,
        value: dep.value.clone(),
    }
}

/// The key the manifest exposes the patched dependency under: the alias
/// when aliased, otherwise the real name less any workspace marker.
fn exposed_key(patch: &DependencyPatch) -> String {
    match patch.dep_type.known_as() {
        Some(alias) => alias.to_string(),
        None => {
            let name = &patch.package.name;
            name.strip_suffix(WORKSPACE_SUFFIX).unwrap_or(name).to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depmend_resolve::{DependencyType, PackageKey};

    const MANIFEST: &str = r#"{
  "name": "patch-test",
  "version": "1.0.0",
  "dependencies": {
    "lodash": "4.17.17",
    "cliui": "npm:@isaacs/cliui@^8.0.2"
  },
  "devDependencies": {
    "lodash": "4.17.17",
    "eslint": "^8.57.0"
  },
  "optionalDependencies": {
    "glob": "^10.3.10"
  },
  "peerDependencies": {
    "@babel/core": "^7.24.0"
  }
}
"#;

    fn plain_patch(name: &str, orig: &str, new: &str) -> DependencyPatch {
        DependencyPatch {
            package: PackageKey::npm(name),
            dep_type: DependencyType::new(),
            orig_require: orig.to_string(),
            new_require: new.to_string(),
        }
    }

    fn patch_of(deps: Vec<DependencyPatch>) -> ManifestPatch {
        ManifestPatch { deps }
    }

    #[test]
    fn empty_patch_is_identity() {
        let output = patch_text(Path::new("package.json"), MANIFEST, &ManifestPatch::default())
            .expect("patch");
        assert_eq!(output, MANIFEST);
    }

    #[test]
    fn rewrites_every_occurrence_of_a_key() {
        let patch = patch_of(vec![plain_patch("lodash", "4.17.17", "^4.17.21")]);
        let output = patch_text(Path::new("package.json"), MANIFEST, &patch).expect("patch");

        assert_eq!(output.matches("^4.17.21").count(), 2);
        assert!(!output.contains("4.17.17"));
        // Everything else is untouched.
        assert!(output.contains("\"eslint\": \"^8.57.0\""));
        assert!(output.contains("\"@babel/core\": \"^7.24.0\""));
    }

    #[test]
    fn matches_aliased_entries_by_alias() {
        let patch = patch_of(vec![DependencyPatch {
            package: PackageKey::npm("@isaacs/cliui"),
            dep_type: DependencyType::aliased("cliui"),
            orig_require: "^8.0.2".to_string(),
            new_require: "^9.0.0".to_string(),
        }]);
        let output = patch_text(Path::new("package.json"), MANIFEST, &patch).expect("patch");
        assert!(output.contains("\"cliui\": \"npm:@isaacs/cliui@^9.0.0\""));
    }

    #[test]
    fn conflicting_original_text_aborts() {
        let patch = patch_of(vec![plain_patch("eslint", "^7.0.0", "*")]);
        let error = patch_text(Path::new("package.json"), MANIFEST, &patch).expect_err("must fail");

        match error {
            Error::Conflict {
                name,
                expected,
                found,
            } => {
                assert_eq!(name, "eslint");
                assert_eq!(expected, "^7.0.0");
                assert_eq!(found, "^8.57.0");
            }
            other => panic!("expected Conflict, got {other:?}"),
        }
    }

    #[test]
    fn unknown_targets_abort() {
        let patch = patch_of(vec![plain_patch("left-pad", "^1.0.0", "^2.0.0")]);
        let error = patch_text(Path::new("package.json"), MANIFEST, &patch).expect_err("must fail");
        assert!(matches!(error, Error::NotFound { name } if name == "left-pad"));
    }

    #[test]
    fn peer_entries_are_not_patchable() {
        let patch = patch_of(vec![plain_patch("@babel/core", "^7.24.0", "^8.0.0")]);
        let error = patch_text(Path::new("package.json"), MANIFEST, &patch).expect_err("must fail");
        assert!(matches!(error, Error::NotFound { .. }));
    }

    #[test]
    fn duplicate_patches_overlap() {
        let patch = patch_of(vec![
            plain_patch("eslint", "^8.57.0", "^9.0.0"),
            plain_patch("eslint", "^8.57.0", "^9.1.0"),
        ]);
        let error = patch_text(Path::new("package.json"), MANIFEST, &patch).expect_err("must fail");
        assert!(matches!(error, Error::OverlappingPatches { name } if name == "eslint"));
    }

    #[test]
    fn optional_entries_match_with_or_without_the_flavor_attr() {
        // The resolver may or may not carry the optional flavor on the
        // patch; lookup goes by exposed key either way.
        let output = patch_text(
            Path::new("package.json"),
            MANIFEST,
            &patch_of(vec![plain_patch("glob", "^10.3.10", "^1.0.0")]),
        )
        .expect("patch");
        assert!(output.contains("\"glob\": \"^1.0.0\""));

        let output = patch_text(
            Path::new("package.json"),
            MANIFEST,
            &patch_of(vec![DependencyPatch {
                package: PackageKey::npm("glob"),
                dep_type: DependencyType::optional(),
                orig_require: "^10.3.10".to_string(),
                new_require: "^1.0.0".to_string(),
            }]),
        )
        .expect("patch");
        assert!(output.contains("\"glob\": \"^1.0.0\""));
    }

    #[test]
    fn workspace_marker_is_stripped_for_lookup() {
        let manifest = r#"{
  "name": "ws-root",
  "dependencies": {"shared": "^1.0.0"}
}
"#;
        let patch = patch_of(vec![plain_patch("shared:workspace", "^1.0.0", "^1.2.0")]);
        let output = patch_text(Path::new("package.json"), manifest, &patch).expect("patch");
        assert!(output.contains("\"shared\": \"^1.2.0\""));
    }
}
