//! Manifest I/O for dependency remediation.
//!
//! This crate is the bridge between raw project files and a
//! language-agnostic dependency resolver. It exposes one capability,
//! [`ManifestIo`], with two operations:
//!
//! - **Read** parses a dependency manifest (plus its workspace members)
//!   into a canonical [`Manifest`] graph fragment: alias-resolved,
//!   flavor-classified, deterministically ordered.
//! - **Write** applies a [`ManifestPatch`] of requirement-string
//!   replacements back onto the original bytes, leaving comments, spacing,
//!   and key order untouched.
//!
//! Each ecosystem provides its own implementation of the capability;
//! [`NpmManifestIo`] handles npm `package.json` files, including `npm:`
//! aliases, `workspaces` globs, and `workspace:` protocol references.
//!
//! # Example
//!
//! ```rust,ignore
//! use depmend_manifest::{ManifestIo, NpmManifestIo};
//! use std::path::Path;
//!
//! let manifest = NpmManifestIo.read(Path::new("package.json"))?;
//! for requirement in &manifest.requirements {
//!     println!("{} -> {}", requirement.exposed_name(), requirement.version);
//! }
//! ```
//!
//! Writes are all-or-nothing: every patch target is located and verified
//! against the text the resolver saw before any output is produced, so a
//! failed write never leaves a half-patched file behind.
//!
//! The resolver itself, vulnerability matching, and lockfile parsing live
//! outside this crate; a `Manifest` returned by a read is immutable by
//! convention, and remediation flows back exclusively through
//! [`ManifestPatch`].

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod error;
pub mod io;
pub mod npm;
pub mod types;

// Re-export error types
pub use error::{Error, Result};

// Re-export the capability and its implementations
pub use io::{manifest_io_for_path, ManifestIo};
pub use npm::{NpmManifestIo, WORKSPACE_SUFFIX};

// Re-export the canonical manifest types
pub use types::{DependencyPatch, Manifest, ManifestPatch};
