//! pkgdoc — build a package's HTML reference site.
//!
//! ```text
//! pkgdoc geometry.json -o site -c pkgdoc.toml
//! ```
//!
//! The descriptor is JSON (name, metadata, categories of qualified function
//! names). Help text is read from `<root>/help/`, NEWS and COPYING from
//! `<root>/packinfo/`, the manual source from `<root>/doc/`.

mod logger;

use anyhow::{Context, Result};
use clap::Parser;
use pkgdoc::render::help::HelpTextRenderer;
use pkgdoc::{site, Options, PackageDescriptor};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pkgdoc",
    about = "Generate cross-linked HTML documentation for a package's functions"
)]
struct Cli {
    /// Package descriptor (JSON)
    descriptor: PathBuf,

    /// Output directory; the site is written to <OUTPUT>/<package>
    #[arg(short = 'o', long)]
    output: PathBuf,

    /// Options file (TOML). Defaults apply when omitted.
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Package root, overriding the descriptor's `root`
    #[arg(long)]
    root: Option<PathBuf>,

    /// Debug output
    #[arg(short = 'v', long, conflicts_with = "quiet")]
    verbose: bool,

    /// Errors only
    #[arg(short = 'q', long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose, cli.quiet);

    let mut desc = PackageDescriptor::load(&cli.descriptor)
        .with_context(|| format!("failed to load descriptor {}", cli.descriptor.display()))?;
    if let Some(root) = cli.root {
        desc.root = root;
    }

    let options = match &cli.config {
        Some(path) => Options::load(path)
            .with_context(|| format!("failed to load options {}", path.display()))?,
        None => Options::default(),
    };

    let renderer = HelpTextRenderer::new(desc.help_dir(), &desc.name, &options.templates);
    let site = site::generate(&desc, &options, &cli.output, &renderer, &renderer)
        .with_context(|| format!("failed to document package {}", desc.name))?;

    println!("{}", site.root.display());
    Ok(())
}
