//! Site assembly — sequences one generation run.
//!
//! Layout under `<outdir>/<package>/`:
//!
//! ```text
//! index.html              package landing page
//! <overview>.html         categories and function summaries
//! NEWS.html, COPYING.html packinfo passthrough
//! <function_dir>/...      one page per function, namespace/class tree
//! alpha/<letter>/...      alphabetical index listing files
//! package_doc/...         converted manual and its assets
//! short_description.html  snippet for package lists
//! assets/pkgdoc.css       theme stylesheet
//! description.json        manifest
//! ```
//!
//! A fatal error stops the run and leaves whatever was already written.

pub mod manifest;
pub mod pages;

use crate::config::Options;
use crate::error::{Error, Result};
use crate::manual::{self, ManualBuild};
use crate::model::PackageDescriptor;
use crate::render::{FunctionRenderer, SummaryExtractor};
use crate::render::html::STYLESHEET;
use crate::tree::{ensure_dir, PageTree, PageTreeBuilder};
use manifest::{Manifest, ManifestSections};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const ALPHA_DIR: &str = "alpha";
pub const MANUAL_DIR: &str = "package_doc";
pub const STYLESHEET_PATH: &str = "assets/pkgdoc.css";

/// Everything a finished run produced.
#[derive(Debug)]
pub struct Site {
    pub root: PathBuf,
    pub tree: PageTree,
    pub manual: Option<ManualBuild>,
    pub manifest: Manifest,
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).map_err(|source| Error::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}

fn read_packinfo(desc: &PackageDescriptor, file: &str) -> Result<String> {
    let path = desc.packinfo_dir().join(file);
    fs::read_to_string(&path).map_err(|source| Error::ReadFile { path, source })
}

/// Generate the documentation site of `desc` under `outdir/<name>`.
pub fn generate(
    desc: &PackageDescriptor,
    options: &Options,
    outdir: &Path,
    renderer: &dyn FunctionRenderer,
    extractor: &dyn SummaryExtractor,
) -> Result<Site> {
    desc.validate()?;
    let root = outdir.join(&desc.name);
    ensure_dir(&root)?;
    info!(
        "documenting {} function(s) of {} into {}",
        desc.function_count(),
        desc.name,
        root.display()
    );

    let sections = &options.sections;
    let mut generated = ManifestSections {
        function_dir: options.function_dir.clone(),
        ..Default::default()
    };

    let tree = PageTreeBuilder::new(options, renderer, extractor).build(&desc.categories, &root)?;
    info!(
        "{} of {} function page(s) written",
        tree.implemented_count(),
        desc.function_count()
    );

    if sections.alpha {
        let written = tree
            .index
            .emit(&root.join(ALPHA_DIR), &|id| tree.sentence(id).to_string())?;
        info!("alphabetical index: {written} entries");
        generated.alpha = Some(ALPHA_DIR.to_string());
    }

    if sections.overview {
        let file = format!("{}.html", options.overview_filename);
        write_file(&root.join(&file), &pages::overview(desc, options, &tree))?;
        generated.overview = Some(file);
    }

    if sections.news {
        let news = read_packinfo(desc, "NEWS")?;
        let html = pages::text(desc, options, &options.templates.news_title, &news);
        write_file(&root.join("NEWS.html"), &html)?;
        generated.news = Some("NEWS.html".to_string());
    }

    if sections.license {
        let copying = read_packinfo(desc, "COPYING")?;
        let html = pages::text(desc, options, &options.templates.license_title, &copying);
        write_file(&root.join("COPYING.html"), &html)?;
        generated.license = Some("COPYING.html".to_string());
    }

    let manual = if sections.manual {
        manual::build(&options.manual, &desc.doc_dir(), &root.join(MANUAL_DIR))?
    } else {
        None
    };
    if let Some(build) = &manual {
        let entry = Path::new(MANUAL_DIR).join(&build.root);
        generated.manual = Some(entry.to_string_lossy().replace('\\', "/"));
    }

    if sections.website_files {
        write_file(&root.join(STYLESHEET_PATH), STYLESHEET)?;
        generated.website_files = Some(STYLESHEET_PATH.to_string());
    }

    if sections.short_description {
        write_file(
            &root.join("short_description.html"),
            &pages::short_description(desc),
        )?;
        generated.short_description = Some("short_description.html".to_string());
    }

    // written last so it can link every other section
    if sections.index {
        generated.index = Some("index.html".to_string());
        write_file(
            &root.join("index.html"),
            &pages::index(desc, options, &generated),
        )?;
    }

    let manifest = Manifest {
        name: desc.name.clone(),
        version: desc.version.clone(),
        description: desc.description.clone(),
        functions: desc.function_count(),
        implemented: tree.implemented_count(),
        sections: generated,
    };
    manifest.write(&root)?;
    info!("site written to {}", root.display());

    Ok(Site {
        root,
        tree,
        manual,
        manifest,
    })
}
