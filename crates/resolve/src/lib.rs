//! Canonical identifiers for packages, versions, and dependency flavors.
//!
//! This crate is the shared vocabulary between manifest I/O and the
//! dependency resolver: which package is meant ([`PackageKey`]), at which
//! version or constraint ([`VersionKey`]), and how the edge was declared
//! ([`DependencyType`]). Everything here is a pure value type with equality
//! and ordering; parsing manifests and choosing versions both live in other
//! crates.
//!
//! # Example
//!
//! ```
//! use depmend_resolve::{DependencyType, PackageKey, RequirementVersion, VersionKey};
//!
//! let edge = RequirementVersion {
//!     dep_type: DependencyType::aliased("cliui"),
//!     version: VersionKey::requirement(PackageKey::npm("@isaacs/cliui"), "^8.0.2"),
//! };
//! assert_eq!(edge.exposed_name(), "cliui");
//! assert_eq!(edge.version.name(), "@isaacs/cliui");
//! ```

pub mod dep_type;
pub mod version;

pub use dep_type::{DependencyType, RequirementVersion, TypeAttr};
pub use version::{Ecosystem, PackageKey, VersionKey, VersionKind};
