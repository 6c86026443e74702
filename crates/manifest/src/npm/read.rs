//! npm manifest reader: `package.json` to canonical [`Manifest`].

use crate::error::{Error, Result};
use crate::npm::scan::{self, DepSection, ScannedDependency};
use crate::npm::workspace::resolve_member_dirs;
use crate::npm::{parse_alias, WORKSPACE_SUFFIX};
use crate::types::Manifest;
use depmend_resolve::{DependencyType, PackageKey, RequirementVersion, TypeAttr, VersionKey};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Placeholder version for manifests that declare none of their own.
const MISSING_VERSION: &str = "0.0.0";

/// The serde view of the fields the reader needs; dependency entries come
/// from the positional scan instead, which preserves declared order.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    workspaces: Option<WorkspacesField>,
}

/// npm accepts both the array form and the object form with a `packages`
/// key.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WorkspacesField {
    Patterns(Vec<String>),
    Object { packages: Vec<String> },
}

impl WorkspacesField {
    fn patterns(&self) -> &[String] {
        match self {
            Self::Patterns(patterns) | Self::Object { packages: patterns } => patterns,
        }
    }
}

/// A discovered workspace member, in declaration order.
struct Member {
    dir: PathBuf,
    name: String,
}

/// Reads the manifest at `path`, including its workspace members.
///
/// A missing `version` field resolves to the `0.0.0` placeholder; a
/// missing `name` field resolves to the empty string.
pub(crate) fn read_manifest(path: &Path) -> Result<Manifest> {
    let mut visited = BTreeSet::new();
    read_recursive(path, &BTreeSet::new(), &mut visited)
}

fn read_recursive(
    path: &Path,
    inherited_names: &BTreeSet<String>,
    visited: &mut BTreeSet<PathBuf>,
) -> Result<Manifest> {
    tracing::debug!("reading npm manifest at {}", path.display());

    let canonical = fs::canonicalize(path).map_err(|source| Error::Io {
        source,
        path: Some(path.to_path_buf()),
        operation: "resolving manifest path".to_string(),
    })?;
    visited.insert(canonical);

    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        source,
        path: Some(path.to_path_buf()),
        operation: "reading manifest".to_string(),
    })?;
    let package: PackageJson = serde_json::from_str(&text).map_err(|source| Error::Json {
        source,
        path: Some(path.to_path_buf()),
    })?;
    let scanned = scan::scan_dependencies(path, &text)?;

    // Workspace members, in declaration order of the patterns.
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let patterns = package
        .workspaces
        .as_ref()
        .map(WorkspacesField::patterns)
        .unwrap_or_default();
    let member_dirs = resolve_member_dirs(dir, patterns)?;
    let mut members = Vec::with_capacity(member_dirs.len());
    for member_dir in member_dirs {
        let name = read_member_name(&member_dir.join("package.json"))?;
        members.push(Member {
            dir: member_dir,
            name,
        });
    }
    if !members.is_empty() {
        tracing::debug!(
            "manifest {} declares {} workspace member(s)",
            path.display(),
            members.len()
        );
    }

    // Member-to-member references resolve against the whole workspace, so
    // members inherit the full name set.
    let mut workspace_names = inherited_names.clone();
    workspace_names.extend(members.iter().map(|member| member.name.clone()));

    // This manifest's own identity; members carry the workspace marker.
    let mut root_name = package.name.clone().unwrap_or_default();
    if inherited_names.contains(&root_name) {
        root_name.push_str(WORKSPACE_SUFFIX);
    }
    let root_version = package
        .version
        .clone()
        .unwrap_or_else(|| MISSING_VERSION.to_string());
    let root = VersionKey::concrete(PackageKey::npm(root_name), root_version);

    // Dependency edges, deduplicated on (flavor, package).
    let mut requirements: Vec<RequirementVersion> = Vec::new();
    let mut groups: BTreeMap<PackageKey, Vec<String>> = BTreeMap::new();
    for dep in &scanned {
        if dep.section == DepSection::Peer {
            // Recognized for presence only; peer resolution is deferred.
            continue;
        }
        let (dep_type, version) = classify(dep, &workspace_names);
        let duplicate = requirements
            .iter()
            .any(|req| req.dep_type == dep_type && req.version.package == version.package);
        if let Some(tag) = dep.section.group_tag() {
            push_group(&mut groups, version.package.clone(), tag);
        }
        if !duplicate {
            requirements.push(RequirementVersion { dep_type, version });
        }
    }

    requirements.sort_by(|a, b| a.exposed_name().cmp(b.exposed_name()));

    // Synthetic workspace edges after the sorted list, in declaration
    // order, then the members themselves in the same order.
    let mut local_manifests = Vec::with_capacity(members.len());
    for member in &members {
        let workspace_name = format!("{}{}", member.name, WORKSPACE_SUFFIX);
        let already_required = requirements
            .iter()
            .any(|req| req.version.name() == workspace_name);
        if !already_required {
            requirements.push(RequirementVersion {
                dep_type: DependencyType::new(),
                version: VersionKey::requirement(PackageKey::npm(workspace_name), "*"),
            });
        }

        let member_path = member.dir.join("package.json");
        let member_canonical = fs::canonicalize(&member_path).map_err(|source| Error::Io {
            source,
            path: Some(member_path.clone()),
            operation: "resolving workspace member path".to_string(),
        })?;
        if visited.contains(&member_canonical) {
            tracing::warn!(
                "workspace cycle at {}, skipping repeated member",
                member_path.display()
            );
            continue;
        }
        local_manifests.push(read_recursive(&member_path, &workspace_names, visited)?);
    }

    ensure_unique(&requirements)?;

    Ok(Manifest {
        file_path: path.to_path_buf(),
        root,
        requirements,
        groups,
        local_manifests,
    })
}

/// Determines the flavor and target of one scanned dependency entry.
fn classify(
    dep: &ScannedDependency,
    workspace_names: &BTreeSet<String>,
) -> (DependencyType, VersionKey) {
    let mut dep_type = if dep.section == DepSection::Optional {
        DependencyType::optional()
    } else {
        DependencyType::new()
    };

    // `npm:` protocol naming a different real package than the exposed key.
    if let Some((real_name, range)) = parse_alias(&dep.value) {
        if real_name != dep.key {
            dep_type.add_attr(TypeAttr::KnownAs, dep.key.clone());
        }
        return (
            dep_type,
            VersionKey::requirement(PackageKey::npm(real_name), range),
        );
    }

    // Explicit `workspace:` protocol reference.
    if let Some(constraint) = dep.value.strip_prefix("workspace:") {
        let constraint = if constraint.is_empty() { "*" } else { constraint };
        let name = format!("{}{}", dep.key, WORKSPACE_SUFFIX);
        return (
            dep_type,
            VersionKey::requirement(PackageKey::npm(name), constraint),
        );
    }

    // A bare name matching a workspace member resolves locally.
    if workspace_names.contains(&dep.key) {
        let name = format!("{}{}", dep.key, WORKSPACE_SUFFIX);
        return (
            dep_type,
            VersionKey::requirement(PackageKey::npm(name), dep.value.clone()),
        );
    }

    (
        dep_type,
        VersionKey::requirement(PackageKey::npm(dep.key.clone()), dep.value.clone()),
    )
}

fn push_group(groups: &mut BTreeMap<PackageKey, Vec<String>>, package: PackageKey, tag: &str) {
    let tags = groups.entry(package).or_default();
    if !tags.iter().any(|existing| existing == tag) {
        tags.push(tag.to_string());
    }
}

fn read_member_name(manifest_path: &Path) -> Result<String> {
    let text = fs::read_to_string(manifest_path).map_err(|source| Error::Io {
        source,
        path: Some(manifest_path.to_path_buf()),
        operation: "reading workspace member manifest".to_string(),
    })?;
    let package: PackageJson = serde_json::from_str(&text).map_err(|source| Error::Json {
        source,
        path: Some(manifest_path.to_path_buf()),
    })?;
    Ok(package.name.unwrap_or_default())
}

fn ensure_unique(requirements: &[RequirementVersion]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for requirement in requirements {
        if !seen.insert((requirement.dep_type.clone(), requirement.version.package.clone())) {
            return Err(Error::DuplicateRequirement {
                name: requirement.version.package.name.clone(),
            });
        }
    }
    Ok(())
}
