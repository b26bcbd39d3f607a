//! Qualified function names and the output paths derived from them.
//!
//! A qualified name has zero or more dotted namespace segments, an optional
//! class segment introduced by [`CLASS_MARKER`], and exactly one leaf:
//!
//! | Name | Segments | Page |
//! |------|----------|------|
//! | `plainfunc` | `plainfunc` | `plainfunc.html` |
//! | `pkg.sub.run` | `pkg`, `sub`, `run` | `pkg/sub/run.html` |
//! | `pkg.@Shape/area` | `pkg`, `@Shape`, `area` | `pkg/@Shape/area.html` |

use crate::error::{Error, Result};
use std::fmt;
use std::path::PathBuf;

/// Marks a class segment. The marker stays in the directory name so class
/// directories never look like namespace directories.
pub const CLASS_MARKER: char = '@';

/// Extension of every generated page.
pub const PAGE_EXTENSION: &str = "html";

/// A parsed, immutable function identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    raw: String,
    namespaces: Vec<String>,
    /// Class segment including its marker, e.g. `@Shape`.
    class: Option<String>,
    leaf: String,
}

impl QualifiedName {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::invalid_name(raw, "empty name"));
        }

        let mut pieces: Vec<&str> = raw.split('.').collect();
        // split always yields at least one piece
        let last = pieces.pop().unwrap_or_default();

        if pieces.iter().any(|s| s.is_empty()) {
            return Err(Error::invalid_name(raw, "empty namespace segment"));
        }
        if pieces.iter().any(|s| s.starts_with(CLASS_MARKER) || s.contains('/')) {
            return Err(Error::invalid_name(
                raw,
                "class segment must follow the last namespace",
            ));
        }

        let (class, leaf) = if last.starts_with(CLASS_MARKER) {
            let (class, method) = last
                .split_once('/')
                .ok_or_else(|| Error::invalid_name(raw, "class segment without a method"))?;
            if class.len() == CLASS_MARKER.len_utf8() {
                return Err(Error::invalid_name(raw, "empty class name"));
            }
            if method.contains('/') {
                return Err(Error::invalid_name(raw, "nested class segments"));
            }
            (Some(class.to_string()), method)
        } else {
            if last.contains('/') {
                return Err(Error::invalid_name(raw, "'/' outside a class segment"));
            }
            (None, last)
        };

        if leaf.is_empty() {
            return Err(Error::invalid_name(raw, "empty leaf name"));
        }

        Ok(Self {
            raw: raw.to_string(),
            namespaces: pieces.into_iter().map(str::to_string).collect(),
            class,
            leaf: leaf.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn leaf(&self) -> &str {
        &self.leaf
    }

    /// Lower-cased first alphabetic character of the leaf name, or `_` for
    /// leaves without any letter.
    pub fn index_letter(&self) -> String {
        self.leaf
            .chars()
            .find(|c| c.is_alphabetic())
            .map(|c| c.to_lowercase().collect())
            .unwrap_or_else(|| "_".to_string())
    }

    pub fn resolve(&self) -> ResolvedPath {
        let mut segments = self.namespaces.clone();
        segments.extend(self.class.iter().cloned());
        segments.push(self.leaf.clone());
        ResolvedPath { segments }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Parse and resolve in one step.
pub fn resolve(raw: &str) -> Result<ResolvedPath> {
    Ok(QualifiedName::parse(raw)?.resolve())
}

/// Path segments of a function page relative to the function directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Namespaces, then the class segment if any, then the leaf.
    segments: Vec<String>,
}

impl ResolvedPath {
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Directory segments, i.e. everything but the leaf.
    pub fn dirs(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    pub fn leaf(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// Number of `..` hops from the page back to the site root.
    pub fn root_depth(&self) -> usize {
        // one hop out of the function directory plus one per directory segment
        self.segments.len()
    }

    pub fn root_prefix(&self) -> String {
        "../".repeat(self.root_depth())
    }

    /// Relative file path with the given extension.
    pub fn file_with_extension(&self, ext: &str) -> PathBuf {
        let mut path: PathBuf = self.dirs().iter().collect();
        path.push(format!("{}.{}", self.leaf(), ext));
        path
    }

    /// Relative path of the generated page.
    pub fn page_path(&self) -> PathBuf {
        self.file_with_extension(PAGE_EXTENSION)
    }

    /// URL of the page relative to the function directory.
    pub fn href(&self) -> String {
        format!("{}.{}", self.segments.join("/"), PAGE_EXTENSION)
    }
}

/// Anchor for a category section: the label with every non-alphabetic
/// character stripped.
pub fn anchor(label: &str) -> String {
    label.chars().filter(|c| c.is_alphabetic()).collect()
}
