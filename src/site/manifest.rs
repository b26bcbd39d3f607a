//! The `description.json` manifest: what a run generated and where.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const MANIFEST_FILE: &str = "description.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub version: String,
    pub description: String,
    pub functions: usize,
    pub implemented: usize,
    pub sections: ManifestSections,
}

/// Relative path of each generated section, `None` when it was skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestSections {
    pub function_dir: String,
    pub index: Option<String>,
    pub overview: Option<String>,
    pub alpha: Option<String>,
    pub short_description: Option<String>,
    pub news: Option<String>,
    pub license: Option<String>,
    pub manual: Option<String>,
    pub website_files: Option<String>,
}

impl Manifest {
    pub fn write(&self, site_root: &Path) -> Result<()> {
        let path = site_root.join(MANIFEST_FILE);
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        fs::write(&path, json).map_err(|source| Error::WriteFile { path, source })
    }
}
