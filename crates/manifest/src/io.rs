//! The manifest I/O capability.

use crate::error::{Error, Result};
use crate::npm::NpmManifestIo;
use crate::types::{Manifest, ManifestPatch};
use std::io::Write;
use std::path::Path;

/// Per-ecosystem manifest I/O: parse a manifest file into a canonical
/// [`Manifest`], and patch requirement strings back into the original
/// bytes.
///
/// New ecosystems are supported by providing a new implementation of this
/// trait, never by branching on an ecosystem tag inside shared code.
pub trait ManifestIo: std::fmt::Debug {
    /// Reads a manifest file (and its workspace members, if any) into a
    /// canonical [`Manifest`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, its structure is
    /// malformed, or a workspace member fails to read. No partially
    /// populated manifest is ever returned.
    fn read(&self, path: &Path) -> Result<Manifest>;

    /// Applies a [`ManifestPatch`] to the manifest at `path`, writing the
    /// patched bytes to `out`. Output is byte-identical to the input except
    /// for the requirement strings named by the patch.
    ///
    /// # Errors
    ///
    /// Returns an error if a patch target is missing, the current text
    /// differs from the patch's expected text, or patches overlap. All
    /// validation happens before the first byte is written, so a failed
    /// write leaves `out` untouched.
    fn write(&self, path: &Path, out: &mut dyn Write, patch: &ManifestPatch) -> Result<()>;
}

/// Picks the [`ManifestIo`] implementation for a manifest path by file
/// name.
///
/// # Errors
///
/// Returns [`Error::UnsupportedManifest`] when no implementation claims
/// the file.
pub fn manifest_io_for_path(path: &Path) -> Result<Box<dyn ManifestIo>> {
    match path.file_name().and_then(|name| name.to_str()) {
        Some("package.json") => Ok(Box::new(NpmManifestIo)),
        _ => Err(Error::UnsupportedManifest {
            path: path.to_path_buf(),
        }),
    }
}
