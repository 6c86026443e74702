//! Dependency flavor attributes and requirement edges.

use crate::version::VersionKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named attribute on a dependency edge.
///
/// Ecosystems combine flavors freely (an optional aliased dependency, a
/// dev dependency on a workspace member), so flavors are modeled as an
/// open attribute set rather than a closed enum of combinations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub enum TypeAttr {
    /// The local alias under which a manifest exposes a package whose real
    /// registry name differs. The attribute value is the alias.
    KnownAs,

    /// Marks an optional dependency. The attribute value is empty.
    Opt,
}

/// How a dependency edge is declared: an attribute bag keyed by
/// [`TypeAttr`].
///
/// Two values are equal only if their attribute sets match exactly, so an
/// aliased edge and a plain edge to the same package stay distinct.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct DependencyType {
    attrs: BTreeMap<TypeAttr, String>,
}

impl DependencyType {
    /// Creates the plain dependency type with no attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a type carrying the [`TypeAttr::KnownAs`] alias attribute.
    #[must_use]
    pub fn aliased(alias: impl Into<String>) -> Self {
        let mut dep_type = Self::new();
        dep_type.add_attr(TypeAttr::KnownAs, alias);
        dep_type
    }

    /// Creates a type carrying the [`TypeAttr::Opt`] attribute.
    #[must_use]
    pub fn optional() -> Self {
        let mut dep_type = Self::new();
        dep_type.add_attr(TypeAttr::Opt, "");
        dep_type
    }

    /// Adds or replaces an attribute.
    pub fn add_attr(&mut self, attr: TypeAttr, value: impl Into<String>) {
        self.attrs.insert(attr, value.into());
    }

    /// Returns the value of an attribute, if present.
    #[must_use]
    pub fn attr(&self, attr: TypeAttr) -> Option<&str> {
        self.attrs.get(&attr).map(String::as_str)
    }

    /// The alias this edge is exposed under, if any.
    #[must_use]
    pub fn known_as(&self) -> Option<&str> {
        self.attr(TypeAttr::KnownAs)
    }

    /// Whether the edge is marked optional.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.attrs.contains_key(&TypeAttr::Opt)
    }

    /// Whether the type carries no attributes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

/// One outgoing dependency edge: a flavor plus the required package and
/// constraint.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct RequirementVersion {
    /// How the edge is declared.
    pub dep_type: DependencyType,

    /// The required package at its declared constraint.
    pub version: VersionKey,
}

impl RequirementVersion {
    /// The name the declaring manifest exposes this dependency under: the
    /// alias when aliased, the real package name otherwise.
    #[must_use]
    pub fn exposed_name(&self) -> &str {
        self.dep_type.known_as().unwrap_or_else(|| self.version.name())
    }
}
