//! Canonical manifest representation and remediation patches.

use depmend_resolve::{DependencyType, PackageKey, RequirementVersion, VersionKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The canonical, ordered representation of one parsed manifest file.
///
/// Created fresh by every read; treated as immutable afterwards. Callers
/// wanting to change dependency choices build a [`ManifestPatch`] instead
/// of editing the manifest in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Where the manifest was read from. Informational only.
    pub file_path: PathBuf,

    /// The manifest's own package at its declared concrete version.
    pub root: VersionKey,

    /// Outgoing dependency edges, ordered by exposed name with synthetic
    /// workspace edges appended in member-declaration order.
    pub requirements: Vec<RequirementVersion>,

    /// Flavor tags (`dev`, `optional`) per real package, independent of any
    /// alias the package is exposed under.
    pub groups: BTreeMap<PackageKey, Vec<String>>,

    /// Nested manifests for workspace members, in declaration order. Empty
    /// when the file declares no workspaces.
    pub local_manifests: Vec<Manifest>,
}

impl Manifest {
    /// The flavor tags recorded for a package, empty when untagged.
    #[must_use]
    pub fn group_tags(&self, package: &PackageKey) -> &[String] {
        self.groups.get(package).map_or(&[], Vec::as_slice)
    }

    /// Finds a requirement by the name the manifest exposes it under.
    #[must_use]
    pub fn find_requirement(&self, exposed: &str) -> Option<&RequirementVersion> {
        self.requirements
            .iter()
            .find(|requirement| requirement.exposed_name() == exposed)
    }
}

/// One requirement-string replacement produced by the resolver.
///
/// `dep_type` must name the exact flavor of the targeted edge, including
/// its alias when aliased: two entries can share a real package name under
/// different aliases and must never be confused. `orig_require` is the
/// requirement text the resolver saw, enabling the writer's conflict check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyPatch {
    /// The real package whose requirement changes.
    pub package: PackageKey,

    /// The exact flavor of the targeted edge.
    pub dep_type: DependencyType,

    /// The requirement text expected to be in the file now.
    pub orig_require: String,

    /// The replacement requirement text.
    pub new_require: String,
}

/// An edit transaction over one manifest file, consumed exactly once by a
/// write call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestPatch {
    /// The replacements to apply, applied all-or-nothing.
    pub deps: Vec<DependencyPatch>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use depmend_resolve::VersionKind;

    fn sample_manifest() -> Manifest {
        Manifest {
            file_path: PathBuf::from("package.json"),
            root: VersionKey::concrete(PackageKey::npm("sample"), "1.0.0"),
            requirements: vec![
                RequirementVersion {
                    dep_type: DependencyType::aliased("cliui"),
                    version: VersionKey::requirement(PackageKey::npm("@isaacs/cliui"), "^8.0.2"),
                },
                RequirementVersion {
                    dep_type: DependencyType::new(),
                    version: VersionKey::requirement(PackageKey::npm("eslint"), "^8.57.0"),
                },
            ],
            groups: BTreeMap::from([(PackageKey::npm("eslint"), vec!["dev".to_string()])]),
            local_manifests: Vec::new(),
        }
    }

    #[test]
    fn group_tags_defaults_to_empty() {
        let manifest = sample_manifest();
        assert_eq!(manifest.group_tags(&PackageKey::npm("eslint")), ["dev"]);
        assert!(manifest.group_tags(&PackageKey::npm("lodash")).is_empty());
    }

    #[test]
    fn find_requirement_uses_exposed_name() {
        let manifest = sample_manifest();

        let aliased = manifest.find_requirement("cliui").expect("aliased entry");
        assert_eq!(aliased.version.name(), "@isaacs/cliui");
        assert_eq!(aliased.version.kind, VersionKind::Requirement);

        assert!(manifest.find_requirement("@isaacs/cliui").is_none());
        assert!(manifest.find_requirement("eslint").is_some());
    }
}
