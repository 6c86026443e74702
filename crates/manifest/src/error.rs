//! Error types for manifest operations.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for manifest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or patching manifests.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// Malformed manifest source structure.
    #[error("Failed to parse manifest at {path}: {message}")]
    #[diagnostic(
        code(depmend::manifest::parse_failed),
        help("Check the manifest for syntax errors; dependency sections must map package names to requirement strings")
    )]
    Parse {
        /// Path to the manifest being parsed.
        path: PathBuf,
        /// Description of the parse failure.
        message: String,
    },

    /// A patch names a dependency the manifest does not declare.
    #[error("Patch target '{name}' not found in manifest")]
    #[diagnostic(
        code(depmend::manifest::patch_target_not_found),
        help("The patch must name the dependency exactly as the manifest exposes it, including its alias if aliased")
    )]
    NotFound {
        /// The exposed name the patch asked for.
        name: String,
    },

    /// The manifest's current requirement text differs from what the patch
    /// expected to find.
    #[error("Requirement for '{name}' is '{found}', expected '{expected}'")]
    #[diagnostic(
        code(depmend::manifest::requirement_conflict),
        help("The manifest changed since the patch was computed; re-read it and recompute the patch")
    )]
    Conflict {
        /// The exposed name of the conflicting dependency.
        name: String,
        /// The requirement text the patch expected.
        expected: String,
        /// The requirement text currently in the file.
        found: String,
    },

    /// Two patches target overlapping byte ranges of the same file.
    #[error("Patches for '{name}' overlap an already patched byte range")]
    #[diagnostic(
        code(depmend::manifest::overlapping_patches),
        help("A patch set may rewrite each requirement string at most once")
    )]
    OverlappingPatches {
        /// The exposed name of the dependency patched twice.
        name: String,
    },

    /// A duplicate `(DependencyType, PackageKey)` pair escaped the reader's
    /// deduplication; indicates a bug upstream.
    #[error("Duplicate requirement for '{name}' survived deduplication")]
    #[diagnostic(
        code(depmend::manifest::duplicate_requirement),
        help("This is a bug in the manifest reader; please report it with the offending manifest")
    )]
    DuplicateRequirement {
        /// The real package name appearing more than once.
        name: String,
    },

    /// No manifest implementation handles this file.
    #[error("No manifest support for {path}")]
    #[diagnostic(
        code(depmend::manifest::unsupported_manifest),
        help("Supported manifests: package.json (npm)")
    )]
    UnsupportedManifest {
        /// The path that no implementation claims.
        path: PathBuf,
    },

    /// I/O error occurred.
    #[error("I/O error during {operation}{}: {source}", path.as_ref().map(|p| format!(" at {}", p.display())).unwrap_or_default())]
    #[diagnostic(
        code(depmend::manifest::io_error),
        help("Check that the referenced paths exist and that you have permission to read or write them")
    )]
    Io {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
        /// Optional path where the error occurred.
        path: Option<PathBuf>,
        /// Description of the operation being performed.
        operation: String,
    },

    /// JSON deserialization error.
    #[error("JSON parsing error{}: {source}", path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    #[diagnostic(
        code(depmend::manifest::json_error),
        help("Ensure the JSON has valid syntax and matches the expected manifest schema")
    )]
    Json {
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
        /// Optional path to the file being parsed.
        path: Option<PathBuf>,
    },
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            path: None,
            operation: "file operation".to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source, path: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display() {
        let error = Error::Parse {
            path: PathBuf::from("/project/package.json"),
            message: "expected a top-level JSON object".to_string(),
        };

        let message = error.to_string();
        assert!(message.contains("Failed to parse manifest"));
        assert!(message.contains("package.json"));
        assert!(message.contains("top-level JSON object"));
    }

    #[test]
    fn conflict_error_display() {
        let error = Error::Conflict {
            name: "lodash".to_string(),
            expected: "1.0.0".to_string(),
            found: "^2.0.0".to_string(),
        };

        let message = error.to_string();
        assert!(message.contains("lodash"));
        assert!(message.contains("'^2.0.0'"));
        assert!(message.contains("expected '1.0.0'"));
    }

    #[test]
    fn not_found_error_display() {
        let error = Error::NotFound {
            name: "left-pad".to_string(),
        };

        assert!(error.to_string().contains("'left-pad' not found"));
    }

    #[test]
    fn io_error_display_with_path() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::Io {
            source: io_error,
            path: Some(PathBuf::from("/test/package.json")),
            operation: "reading manifest".to_string(),
        };

        let message = error.to_string();
        assert!(message.contains("I/O error during reading manifest"));
        assert!(message.contains("/test/package.json"));
    }

    #[test]
    fn io_error_display_without_path() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error = Error::Io {
            source: io_error,
            path: None,
            operation: "writing patched manifest".to_string(),
        };

        let message = error.to_string();
        assert!(message.contains("I/O error during writing patched manifest"));
        assert!(!message.contains(" at "));
    }

    #[test]
    fn diagnostic_codes() {
        use miette::Diagnostic;

        let error = Error::NotFound {
            name: "x".to_string(),
        };
        assert_eq!(
            error.code().map(|code| code.to_string()),
            Some("depmend::manifest::patch_target_not_found".to_string())
        );

        let error = Error::UnsupportedManifest {
            path: PathBuf::from("Gemfile"),
        };
        assert_eq!(
            error.code().map(|code| code.to_string()),
            Some("depmend::manifest::unsupported_manifest".to_string())
        );
        assert!(error.help().is_some());
    }

    #[test]
    fn json_error_conversion() {
        let json_error =
            serde_json::from_str::<serde_json::Value>("{ invalid").expect_err("must fail");
        let error: Error = json_error.into();

        match error {
            Error::Json { path, .. } => assert_eq!(path, None),
            other => panic!("expected Json error variant, got {other:?}"),
        }
    }

    #[test]
    fn result_type_with_question_mark() {
        fn inner() -> Result<u32> {
            Ok(7)
        }

        fn outer() -> Result<u32> {
            let value = inner()?;
            Ok(value + 1)
        }

        assert_eq!(outer().ok(), Some(8));
    }
}
