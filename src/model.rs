//! Package descriptor and per-function records.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Already-parsed package metadata, as supplied by the package manager.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PackageDescriptor {
    pub name: String,
    pub description: String,
    pub version: String,
    pub date: String,
    pub author: String,
    pub maintainer: String,
    pub license: String,
    pub url: Option<String>,
    pub depends: Vec<String>,
    pub system_requirements: Option<String>,
    pub build_requirements: Option<String>,
    /// Categories in display order.
    pub categories: Vec<CategoryEntry>,
    /// Package root holding `packinfo/`, `doc/` and `help/`.
    pub root: PathBuf,
}

/// A category label and its functions, in descriptor order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryEntry {
    pub label: String,
    #[serde(default)]
    pub functions: Vec<String>,
}

impl PackageDescriptor {
    /// Load a descriptor from a JSON file. A relative (or missing) `root` is
    /// taken relative to the descriptor's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let mut desc: Self = serde_json::from_str(&text)
            .map_err(|e| Error::Descriptor(format!("{}: {e}", path.display())))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        desc.root = base.join(&desc.root);
        desc.validate()?;
        Ok(desc)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Descriptor("package name is empty".to_string()));
        }
        if self.name.contains(['/', '\\']) || self.name == "." || self.name == ".." {
            return Err(Error::Descriptor(format!(
                "package name '{}' is not a valid directory name",
                self.name
            )));
        }
        Ok(())
    }

    pub fn packinfo_dir(&self) -> PathBuf {
        self.root.join("packinfo")
    }

    pub fn doc_dir(&self) -> PathBuf {
        self.root.join("doc")
    }

    pub fn help_dir(&self) -> PathBuf {
        self.root.join("help")
    }

    pub fn function_count(&self) -> usize {
        self.categories.iter().map(|c| c.functions.len()).sum()
    }
}

/// Positional handle of a function: (category index, function index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FunctionId {
    pub category: usize,
    pub function: usize,
}

/// Outcome of documenting one function. Never mutated once built.
#[derive(Debug, Clone)]
pub struct FunctionRecord {
    pub name: String,
    pub implemented: bool,
    /// Page URL relative to the site root; empty when not implemented.
    pub link: String,
    /// First help sentence or a placeholder.
    pub summary: String,
    pub letter: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_resolves_root_relative_to_descriptor() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pkg.json");
        fs::write(
            &path,
            r#"{
                "name": "geometry",
                "version": "1.2.0",
                "root": "src",
                "categories": [{ "label": "Basic", "functions": ["area", "shape.@Poly/area"] }]
            }"#,
        )
        .unwrap();

        let desc = PackageDescriptor::load(&path).unwrap();
        assert_eq!(desc.name, "geometry");
        assert_eq!(desc.root, dir.path().join("src"));
        assert_eq!(desc.function_count(), 2);
        assert!(desc.depends.is_empty());
    }

    #[test]
    fn load_rejects_missing_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pkg.json");
        fs::write(&path, r#"{ "categories": [] }"#).unwrap();
        assert!(matches!(
            PackageDescriptor::load(&path),
            Err(Error::Descriptor(_))
        ));
    }

    #[test]
    fn load_rejects_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pkg.json");
        fs::write(&path, "{ name: ").unwrap();
        assert!(matches!(
            PackageDescriptor::load(&path),
            Err(Error::Descriptor(_))
        ));
    }
}
