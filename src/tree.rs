//! Page tree builder: one page per function, in descriptor order.
//!
//! Produces the link and sentence maps used by the overview page and the
//! letter-keyed tree consumed by [`AlphaIndexNode::emit`].

use crate::alpha::AlphaIndexNode;
use crate::config::Options;
use crate::error::{Error, Result};
use crate::model::{CategoryEntry, FunctionId, FunctionRecord};
use crate::name::QualifiedName;
use crate::render::{FunctionRenderer, PageOptions, Rendered, Summary, SummaryExtractor};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Sentence recorded for a function whose help has no usable first sentence.
pub const NOT_DOCUMENTED: &str = "Not documented";

/// Sentence recorded for a function without a page.
pub const NOT_IMPLEMENTED: &str = "Not implemented";

/// Records of one category, in descriptor order.
#[derive(Debug, Clone)]
pub struct CategoryRecords {
    pub label: String,
    pub functions: Vec<FunctionRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct PageTree {
    pub categories: Vec<CategoryRecords>,
    pub index: AlphaIndexNode,
}

impl PageTree {
    pub fn record(&self, id: FunctionId) -> Option<&FunctionRecord> {
        self.categories.get(id.category)?.functions.get(id.function)
    }

    /// Relative link of a function page, empty when the function has none.
    pub fn link(&self, id: FunctionId) -> &str {
        self.record(id).map_or("", |r| r.link.as_str())
    }

    pub fn sentence(&self, id: FunctionId) -> &str {
        self.record(id).map_or(NOT_DOCUMENTED, |r| r.summary.as_str())
    }

    pub fn records(&self) -> impl Iterator<Item = (FunctionId, &FunctionRecord)> {
        self.categories.iter().enumerate().flat_map(|(c, cat)| {
            cat.functions.iter().enumerate().map(move |(f, rec)| {
                (
                    FunctionId {
                        category: c,
                        function: f,
                    },
                    rec,
                )
            })
        })
    }

    pub fn implemented_count(&self) -> usize {
        self.records().filter(|(_, r)| r.implemented).count()
    }
}

/// Create `dir` and all its parents. Existing directories are fine.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| Error::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

pub struct PageTreeBuilder<'a> {
    options: &'a Options,
    renderer: &'a dyn FunctionRenderer,
    extractor: &'a dyn SummaryExtractor,
}

impl<'a> PageTreeBuilder<'a> {
    pub fn new(
        options: &'a Options,
        renderer: &'a dyn FunctionRenderer,
        extractor: &'a dyn SummaryExtractor,
    ) -> Self {
        Self {
            options,
            renderer,
            extractor,
        }
    }

    /// Render every function under `site_root/<function_dir>`.
    ///
    /// A missing or undocumented function degrades its own entry only;
    /// directory failures and unexpected renderer errors abort the run.
    pub fn build(&self, categories: &[CategoryEntry], site_root: &Path) -> Result<PageTree> {
        let function_root = site_root.join(&self.options.function_dir);
        ensure_dir(&function_root)?;

        let mut tree = PageTree::default();
        for (c, category) in categories.iter().enumerate() {
            let mut records = Vec::with_capacity(category.functions.len());
            for (f, raw) in category.functions.iter().enumerate() {
                let id = FunctionId {
                    category: c,
                    function: f,
                };
                let record = self.document(raw, id, &function_root, &mut tree.index)?;
                records.push(record);
            }
            tree.categories.push(CategoryRecords {
                label: category.label.clone(),
                functions: records,
            });
        }
        Ok(tree)
    }

    fn document(
        &self,
        raw: &str,
        id: FunctionId,
        function_root: &Path,
        index: &mut AlphaIndexNode,
    ) -> Result<FunctionRecord> {
        let name = QualifiedName::parse(raw)?;
        let resolved = name.resolve();
        let out = function_root.join(resolved.page_path());
        if let Some(parent) = out.parent() {
            ensure_dir(parent)?;
        }

        let page = PageOptions {
            name: &name,
            root_prefix: resolved.root_prefix(),
            include_demos: self.options.sections.demos,
        };
        let letter = name.index_letter();

        match self.renderer.render(&out, &page)? {
            Rendered::NotFound => {
                warn!("function '{}' not found, marking it unimplemented", name);
                return Ok(FunctionRecord {
                    name: raw.to_string(),
                    implemented: false,
                    link: String::new(),
                    summary: NOT_IMPLEMENTED.to_string(),
                    letter,
                });
            }
            Rendered::Written => debug!("wrote {}", out.display()),
        }

        let summary = match self
            .extractor
            .first_sentence(&name, self.options.summary_max_len)?
        {
            Summary::Sentence(text) => text,
            Summary::NotDocumented => {
                warn!("function '{}' has no help text", name);
                NOT_DOCUMENTED.to_string()
            }
        };

        let mut key: Vec<&str> = vec![letter.as_str()];
        key.extend(resolved.dirs().iter().map(String::as_str));
        index.insert(&key, resolved.leaf(), id)?;

        Ok(FunctionRecord {
            name: raw.to_string(),
            implemented: true,
            link: format!("{}/{}", self.options.function_dir, resolved.href()),
            summary,
            letter,
        })
    }
}
