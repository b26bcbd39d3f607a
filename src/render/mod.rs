//! Renderer seam — per-function pages and help summaries.
//!
//! Both collaborators report the expected "nothing to show" conditions as
//! an outcome variant. Only unexpected failures come back as `Err`, and the
//! page tree treats those as fatal.

pub mod help;
pub mod html;

use crate::error::Result;
use crate::name::QualifiedName;
use std::path::Path;

/// Per-page inputs handed to a [`FunctionRenderer`].
#[derive(Debug, Clone)]
pub struct PageOptions<'a> {
    pub name: &'a QualifiedName,
    /// `../` hops from the page back to the package root.
    pub root_prefix: String,
    pub include_demos: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rendered {
    Written,
    /// No help source exists for the function.
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    Sentence(String),
    NotDocumented,
}

/// Writes the HTML page of one function.
pub trait FunctionRenderer {
    fn render(&self, out: &Path, page: &PageOptions<'_>) -> Result<Rendered>;
}

/// Extracts the first sentence of a function's help text.
pub trait SummaryExtractor {
    fn first_sentence(&self, name: &QualifiedName, max_len: usize) -> Result<Summary>;
}
