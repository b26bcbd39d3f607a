//! Generation options, built once per run and never mutated.
//!
//! Loaded from TOML. Unknown keys and wrongly typed values are fatal so a
//! typo in an option never silently falls back to a default.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Page stems the site writes next to the overview page.
const RESERVED_PAGES: [&str; 5] = ["index", "NEWS", "COPYING", "short_description", "description"];

/// Directories the site creates next to the function directory.
const RESERVED_DIRS: [&str; 3] = [crate::site::ALPHA_DIR, crate::site::MANUAL_DIR, "assets"];

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Directory (under the package output root) holding function pages.
    pub function_dir: String,
    /// File name, without extension, of the category overview page.
    pub overview_filename: String,
    /// Maximum length of a function's first help sentence.
    pub summary_max_len: usize,
    pub sections: Sections,
    pub templates: Templates,
    pub manual: ManualOptions,
}

/// Which optional parts of the site to generate.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Sections {
    pub index: bool,
    pub overview: bool,
    pub alpha: bool,
    pub short_description: bool,
    pub news: bool,
    pub license: bool,
    pub manual: bool,
    pub website_files: bool,
    pub demos: bool,
}

/// Page chrome. Every template accepts `${package}`, `${title}` and
/// `${root}` (relative prefix back to the package root).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Templates {
    pub header: String,
    pub footer: String,
    pub index_title: String,
    pub overview_title: String,
    /// Also receives `${function}`.
    pub function_title: String,
    pub news_title: String,
    pub license_title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManualOptions {
    /// Manual source file, relative to the package `doc/` directory.
    pub source: Option<String>,
    pub program: String,
    /// Arguments; `${outdir}` and `${source}` are substituted.
    pub args: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            function_dir: "functions".to_string(),
            overview_filename: "overview".to_string(),
            summary_max_len: 80,
            sections: Sections::default(),
            templates: Templates::default(),
            manual: ManualOptions::default(),
        }
    }
}

impl Default for Sections {
    fn default() -> Self {
        Self {
            index: true,
            overview: true,
            alpha: true,
            short_description: true,
            news: true,
            license: true,
            manual: true,
            website_files: true,
            demos: false,
        }
    }
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            header: concat!(
                "<!DOCTYPE html>\n<html>\n<head>\n",
                "<meta charset=\"utf-8\">\n",
                "<title>${title}</title>\n",
                "<link rel=\"stylesheet\" href=\"${root}assets/pkgdoc.css\">\n",
                "</head>\n<body>\n",
                "<nav><a href=\"${root}index.html\">${package}</a></nav>\n",
            )
            .to_string(),
            footer: "</body>\n</html>\n".to_string(),
            index_title: "The ${package} package".to_string(),
            overview_title: "${package}: function reference".to_string(),
            function_title: "${function}".to_string(),
            news_title: "${package}: news".to_string(),
            license_title: "${package}: license".to_string(),
        }
    }
}

impl Default for ManualOptions {
    fn default() -> Self {
        Self {
            source: None,
            program: "makeinfo".to_string(),
            args: vec![
                "--html".to_string(),
                "--output=${outdir}".to_string(),
                "${source}".to_string(),
            ],
        }
    }
}

impl Options {
    pub fn from_toml(text: &str) -> Result<Self> {
        let options: Self = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("function_dir", &self.function_dir),
            ("overview_filename", &self.overview_filename),
        ] {
            if value.is_empty() || value.contains(['/', '\\']) || value == "." || value == ".." {
                return Err(Error::Config(format!(
                    "{key} must be a single path component, got '{value}'"
                )));
            }
        }
        if RESERVED_DIRS.contains(&self.function_dir.as_str()) {
            return Err(Error::Config(format!(
                "function_dir '{}' is used by another part of the site",
                self.function_dir
            )));
        }
        if RESERVED_PAGES.contains(&self.overview_filename.as_str()) {
            return Err(Error::Config(format!(
                "overview_filename '{}' is used by another page of the site",
                self.overview_filename
            )));
        }
        if self.summary_max_len == 0 {
            return Err(Error::Config("summary_max_len must be positive".to_string()));
        }
        if self.manual.program.is_empty() {
            return Err(Error::Config("manual.program is empty".to_string()));
        }
        Ok(())
    }
}
