//! pkgdoc — generate cross-linked HTML reference documentation for a
//! package from its function inventory and help text.
//!
//! A run resolves every qualified function name into a page path
//! ([`name`]), renders one page per function ([`tree`]), writes the
//! alphabetical index ([`alpha`]), converts the optional manual and mirrors
//! its assets ([`manual`], [`assets`]), then assembles the landing pages
//! and manifest ([`site`]).

pub mod alpha;
pub mod assets;
pub mod config;
pub mod error;
pub mod manual;
pub mod model;
pub mod name;
pub mod render;
pub mod site;
pub mod template;
pub mod tree;

pub use config::Options;
pub use error::{Error, Result};
pub use model::PackageDescriptor;
