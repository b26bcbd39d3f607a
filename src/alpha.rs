//! Alphabetical cross-reference index.
//!
//! Keys nest as letter → namespaces → class segment → leaf name, and the
//! emitter mirrors that nesting on disk: `alpha/a/geom/@Poly/area.txt`
//! holds one line, the function's first help sentence.

use crate::error::{Error, Result};
use crate::model::FunctionId;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Extension of leaf listing files. Leaves never share a name with a
/// directory because segment directories carry no extension.
pub const LEAF_EXTENSION: &str = "txt";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AlphaIndexNode {
    children: BTreeMap<String, AlphaIndexNode>,
    leaves: BTreeMap<String, FunctionId>,
}

impl AlphaIndexNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `id` under `path` (letter, then namespace/class segments) with
    /// the given leaf name. An occupied slot is an error, never overwritten.
    pub fn insert(&mut self, path: &[&str], leaf: &str, id: FunctionId) -> Result<()> {
        let mut node = self;
        for segment in path {
            node = node.children.entry((*segment).to_string()).or_default();
        }
        if node.leaves.contains_key(leaf) {
            let mut key = path.join("/");
            key.push('/');
            key.push_str(leaf);
            return Err(Error::IndexCollision { key });
        }
        node.leaves.insert(leaf.to_string(), id);
        Ok(())
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len() + self.children.values().map(Self::leaf_count).sum::<usize>()
    }

    /// Top-level keys, i.e. the letters present in the index.
    pub fn letters(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    /// Materialize the tree under `dir`.
    ///
    /// `line_for` supplies the single line written for each leaf.
    pub fn emit<F>(&self, dir: &Path, line_for: &F) -> Result<usize>
    where
        F: Fn(FunctionId) -> String,
    {
        fs::create_dir_all(dir).map_err(|source| Error::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut written = 0;
        for (leaf, id) in &self.leaves {
            let path = dir.join(format!("{leaf}.{LEAF_EXTENSION}"));
            let mut line = line_for(*id).replace('\n', " ");
            line.push('\n');
            fs::write(&path, line).map_err(|source| Error::WriteFile {
                path: path.clone(),
                source,
            })?;
            debug!("wrote index entry {}", path.display());
            written += 1;
        }
        for (segment, child) in &self.children {
            written += child.emit(&dir.join(segment), line_for)?;
        }
        Ok(written)
    }
}
