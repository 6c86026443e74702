//! Positional scan of `package.json` dependency sections.
//!
//! The scan walks the JSON AST and records, for every dependency entry,
//! the exact byte range of its requirement-string literal in the original
//! text. The reader consumes the entries in declared order; the writer
//! splices replacements into the recorded ranges. The original bytes are
//! never re-serialized, so comments, spacing, and key order survive.

use crate::error::{Error, Result};
use jsonc_parser::ast;
use jsonc_parser::{CollectOptions, ParseOptions};
use std::path::Path;

/// A recognized dependency section of `package.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DepSection {
    Prod,
    Dev,
    Optional,
    Peer,
}

impl DepSection {
    /// Sections in the fixed order the scan visits them.
    pub(crate) const SCAN_ORDER: [Self; 4] = [Self::Prod, Self::Dev, Self::Optional, Self::Peer];

    /// The JSON key of the section.
    pub(crate) fn key(self) -> &'static str {
        match self {
            Self::Prod => "dependencies",
            Self::Dev => "devDependencies",
            Self::Optional => "optionalDependencies",
            Self::Peer => "peerDependencies",
        }
    }

    /// The flavor tag the section contributes to `groups`, if any.
    pub(crate) fn group_tag(self) -> Option<&'static str> {
        match self {
            Self::Prod | Self::Peer => None,
            Self::Dev => Some("dev"),
            Self::Optional => Some("optional"),
        }
    }
}

/// One dependency entry located in the original bytes.
///
/// `value_start..value_end` covers the requirement text inside its quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScannedDependency {
    pub(crate) section: DepSection,
    pub(crate) key: String,
    pub(crate) value: String,
    pub(crate) value_start: usize,
    pub(crate) value_end: usize,
}

/// Scans every dependency section, yielding entries grouped by section in
/// [`DepSection::SCAN_ORDER`] and, within a section, in declared order.
pub(crate) fn scan_dependencies(path: &Path, text: &str) -> Result<Vec<ScannedDependency>> {
    let parsed = jsonc_parser::parse_to_ast(text, &CollectOptions::default(), &ParseOptions::default())
        .map_err(|err| Error::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;

    let Some(ast::Value::Object(root)) = parsed.value else {
        return Err(Error::Parse {
            path: path.to_path_buf(),
            message: "expected a top-level JSON object".to_string(),
        });
    };

    let mut dependencies = Vec::new();
    for section in DepSection::SCAN_ORDER {
        let Some(prop) = object_prop(&root, section.key()) else {
            continue;
        };
        let ast::Value::Object(entries) = &prop.value else {
            return Err(Error::Parse {
                path: path.to_path_buf(),
                message: format!("'{}' must be an object", section.key()),
            });
        };
        for entry in &entries.properties {
            let key = prop_name(&entry.name).to_string();
            let ast::Value::StringLit(literal) = &entry.value else {
                return Err(Error::Parse {
                    path: path.to_path_buf(),
                    message: format!("requirement for '{key}' must be a string"),
                });
            };
            dependencies.push(ScannedDependency {
                section,
                key,
                value: literal.value.to_string(),
                value_start: literal.range.start + 1,
                value_end: literal.range.end - 1,
            });
        }
    }

    Ok(dependencies)
}

fn object_prop<'prop, 'text>(
    object: &'prop ast::Object<'text>,
    name: &str,
) -> Option<&'prop ast::ObjectProp<'text>> {
    object
        .properties
        .iter()
        .find(|prop| prop_name(&prop.name) == name)
}

fn prop_name<'prop>(name: &'prop ast::ObjectPropName<'_>) -> &'prop str {
    match name {
        ast::ObjectPropName::String(literal) => literal.value.as_ref(),
        ast::ObjectPropName::Word(literal) => literal.value.as_ref(),
    }
}
