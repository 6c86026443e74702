//! Package and version identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the package ecosystem a name belongs to.
///
/// Package names are only meaningful within one ecosystem's namespace, so
/// every [`PackageKey`] carries its ecosystem alongside the name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub enum Ecosystem {
    /// The npm registry namespace.
    Npm,
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Npm => write!(f, "npm"),
        }
    }
}

/// Identifies a package within one ecosystem's namespace.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct PackageKey {
    /// The ecosystem that owns the name.
    pub ecosystem: Ecosystem,

    /// The package name as the ecosystem's registry knows it.
    pub name: String,
}

impl PackageKey {
    /// Creates a key for an npm package.
    #[must_use]
    pub fn npm(name: impl Into<String>) -> Self {
        Self {
            ecosystem: Ecosystem::Npm,
            name: name.into(),
        }
    }
}

impl fmt::Display for PackageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ecosystem, self.name)
    }
}

/// Distinguishes exact versions from constraint expressions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum VersionKind {
    /// An exact, published version such as `1.2.3`.
    Concrete,

    /// A constraint or range expression such as `^1.2.0` or `*`.
    Requirement,
}

/// A package at a stated version or version constraint.
///
/// Immutable value; the version string is kept verbatim as declared, with
/// no semantic validation of constraint syntax.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct VersionKey {
    /// The package being identified.
    pub package: PackageKey,

    /// The version or constraint text, verbatim.
    pub version: String,

    /// Whether `version` is exact or a constraint.
    pub kind: VersionKind,
}

impl VersionKey {
    /// Creates a key for an exact version.
    #[must_use]
    pub fn concrete(package: PackageKey, version: impl Into<String>) -> Self {
        Self {
            package,
            version: version.into(),
            kind: VersionKind::Concrete,
        }
    }

    /// Creates a key for a constraint expression.
    #[must_use]
    pub fn requirement(package: PackageKey, version: impl Into<String>) -> Self {
        Self {
            package,
            version: version.into(),
            kind: VersionKind::Requirement,
        }
    }

    /// The package name this key points at.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.package.name
    }
}

impl fmt::Display for VersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.package, self.version)
    }
}
