//! Copies the files a converted manual references into the site tree.
//!
//! Only internal references are followed. A reference is handled as:
//!
//! | Reference | Outcome |
//! |-----------|---------|
//! | contains `//` or a scheme (`data:`, `mailto:`) | external, ignored |
//! | contains a `..` segment or is absolute | rejected with a warning |
//! | source missing / glob matches nothing | warning, skipped |
//! | copy fails | warning, skipped |
//! | otherwise | copied to the same relative path under the output root |

use crate::error::{Error, Result};
use crate::tree::ensure_dir;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetClass {
    /// `<img src>` and `<object data>`.
    Image,
    /// `<link rel="stylesheet" href>` and `<object data>`.
    Stylesheet,
}

impl AssetClass {
    pub const ALL: [AssetClass; 2] = [AssetClass::Image, AssetClass::Stylesheet];
}

static RE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(img|object|link)\b([^>]*)>").unwrap());

static RE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)([a-z][a-z0-9_:-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#).unwrap()
});

static RE_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*:").unwrap());

/// What happened to each reference found in one HTML file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MirrorReport {
    /// Destination paths written.
    pub copied: Vec<PathBuf>,
    pub external: Vec<String>,
    /// References escaping the manual directory.
    pub rejected: Vec<String>,
    pub missing: Vec<String>,
    pub failed: Vec<String>,
}

impl MirrorReport {
    pub fn merge(&mut self, other: MirrorReport) {
        self.copied.extend(other.copied);
        self.external.extend(other.external);
        self.rejected.extend(other.rejected);
        self.missing.extend(other.missing);
        self.failed.extend(other.failed);
    }
}

/// Value of attribute `name` in the raw attribute text of a tag.
fn attribute<'h>(attrs: &'h str, name: &str) -> Option<&'h str> {
    RE_ATTR.captures_iter(attrs).find_map(|caps| {
        if !caps[1].eq_ignore_ascii_case(name) {
            return None;
        }
        caps.get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str())
    })
}

/// Reference URLs of the given class, in document order.
pub fn extract_references(html: &str, class: AssetClass) -> Vec<String> {
    let mut urls = Vec::new();
    for caps in RE_TAG.captures_iter(html) {
        let attrs = &caps[2];
        let url = match (caps[1].to_ascii_lowercase().as_str(), class) {
            ("img", AssetClass::Image) => attribute(attrs, "src"),
            ("object", _) => attribute(attrs, "data"),
            ("link", AssetClass::Stylesheet) => attribute(attrs, "rel")
                .filter(|rel| {
                    rel.split_whitespace()
                        .any(|r| r.eq_ignore_ascii_case("stylesheet"))
                })
                .and_then(|_| attribute(attrs, "href")),
            _ => None,
        };
        if let Some(url) = url {
            urls.push(url.trim().to_string());
        }
    }
    urls
}

fn is_external(url: &str) -> bool {
    url.contains("//") || RE_SCHEME.is_match(url)
}

fn escapes_root(path: &str) -> bool {
    path.starts_with(['/', '\\']) || path.split(['/', '\\']).any(|segment| segment == "..")
}

/// Mirror every asset of the given classes referenced by `html_file` from
/// `source_root` to `output_root`. A URL matched by several classes is
/// handled once.
///
/// The page is scanned as lossy UTF-8, so pages written in a legacy
/// encoding still yield their (ASCII) references.
///
/// Unresolvable references are warned about and skipped; only failing to
/// read the HTML file or to create a destination directory is fatal.
pub fn mirror(
    html_file: &Path,
    classes: &[AssetClass],
    source_root: &Path,
    output_root: &Path,
) -> Result<MirrorReport> {
    let bytes = fs::read(html_file).map_err(|source| Error::ReadFile {
        path: html_file.to_path_buf(),
        source,
    })?;
    let html = String::from_utf8_lossy(&bytes);

    let mut report = MirrorReport::default();
    let mut seen = HashSet::new();
    let urls = classes
        .iter()
        .flat_map(|&class| extract_references(&html, class));
    for url in urls {
        if !seen.insert(url.clone()) {
            continue;
        }
        if is_external(&url) {
            debug!("ignoring external reference {url}");
            report.external.push(url);
            continue;
        }
        let path = url.split(['#', '?']).next().unwrap_or_default();
        if path.is_empty() {
            continue;
        }
        if escapes_root(path) {
            warn!(
                "{}: refusing to copy '{url}', it leaves the manual directory",
                html_file.display()
            );
            report.rejected.push(url);
            continue;
        }
        copy_reference(html_file, &url, path, source_root, output_root, &mut report)?;
    }
    Ok(report)
}

fn copy_reference(
    html_file: &Path,
    url: &str,
    path: &str,
    source_root: &Path,
    output_root: &Path,
    report: &mut MirrorReport,
) -> Result<()> {
    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&source_root.to_string_lossy()),
        path
    );
    let sources: Vec<PathBuf> = match glob::glob(&pattern) {
        Ok(paths) => paths.filter_map(|p| p.ok()).filter(|p| p.is_file()).collect(),
        Err(e) => {
            warn!("{}: invalid reference '{url}': {e}", html_file.display());
            report.missing.push(url.to_string());
            return Ok(());
        }
    };
    if sources.is_empty() {
        warn!(
            "{}: referenced file '{url}' not found in {}",
            html_file.display(),
            source_root.display()
        );
        report.missing.push(url.to_string());
        return Ok(());
    }

    for source in sources {
        let dest = match source.strip_prefix(source_root) {
            Ok(rel) => output_root.join(rel),
            Err(_) => output_root.join(path),
        };
        if let Some(parent) = dest.parent() {
            ensure_dir(parent)?;
        }
        match fs::copy(&source, &dest) {
            Ok(_) => {
                debug!("copied {} -> {}", source.display(), dest.display());
                report.copied.push(dest);
            }
            Err(e) => {
                warn!(
                    "failed to copy {} to {}: {e}",
                    source.display(),
                    dest.display()
                );
                report.failed.push(url.to_string());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Manual {
        _dir: TempDir,
        source: PathBuf,
        output: PathBuf,
        html: PathBuf,
    }

    fn manual(html: &str, files: &[&str]) -> Manual {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("doc");
        let output = dir.path().join("site/package_doc");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&output).unwrap();
        for rel in files {
            let path = source.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, rel.as_bytes()).unwrap();
        }
        let html_path = output.join("index.html");
        fs::write(&html_path, html).unwrap();
        Manual {
            _dir: dir,
            source,
            output,
            html: html_path,
        }
    }

    #[test]
    fn extracts_by_class() {
        let html = r#"<IMG alt="x" SRC="img/a.png"><object data='fig/b.svg'></object>
            <link rel="stylesheet" href="style.css"><link rel="icon" href="favicon.ico">
            <link href=alt.css rel="alternate stylesheet">"#;
        assert_eq!(
            extract_references(html, AssetClass::Image),
            ["img/a.png", "fig/b.svg"]
        );
        assert_eq!(
            extract_references(html, AssetClass::Stylesheet),
            ["fig/b.svg", "style.css", "alt.css"]
        );
    }

    #[test]
    fn copies_internal_reference() {
        let m = manual(r#"<img src="img/x.png">"#, &["img/x.png"]);
        let report = mirror(&m.html, &[AssetClass::Image], &m.source, &m.output).unwrap();
        let dest = m.output.join("img/x.png");
        assert_eq!(report.copied, vec![dest.clone()]);
        assert_eq!(fs::read_to_string(dest).unwrap(), "img/x.png");
    }

    #[test]
    fn rejects_parent_traversal() {
        let m = manual(r#"<img src="../img/x.png">"#, &["img/x.png"]);
        let report = mirror(&m.html, &[AssetClass::Image], &m.source, &m.output).unwrap();
        assert_eq!(report.rejected, ["../img/x.png"]);
        assert!(report.copied.is_empty());
        assert!(!m.output.join("img").exists());
        assert!(!m.output.parent().unwrap().join("img").exists());
    }

    #[test]
    fn rejects_absolute_and_nested_traversal() {
        let m = manual(
            r#"<img src="/etc/passwd"><img src="img/../../secret.png">"#,
            &[],
        );
        let report = mirror(&m.html, &[AssetClass::Image], &m.source, &m.output).unwrap();
        assert_eq!(report.rejected, ["/etc/passwd", "img/../../secret.png"]);
    }

    #[test]
    fn skips_external_silently() {
        let m = manual(
            r#"<img src="http://example.com/x.png"><img src="data:image/png;base64,AAAA">"#,
            &[],
        );
        let report = mirror(&m.html, &[AssetClass::Image], &m.source, &m.output).unwrap();
        assert_eq!(
            report.external,
            ["http://example.com/x.png", "data:image/png;base64,AAAA"]
        );
        assert!(report.rejected.is_empty());
        assert!(report.missing.is_empty());
        assert!(report.copied.is_empty());
    }

    #[test]
    fn missing_source_is_skipped() {
        let m = manual(r#"<link rel="stylesheet" href="css/gone.css">"#, &[]);
        let report = mirror(&m.html, &[AssetClass::Stylesheet], &m.source, &m.output).unwrap();
        assert_eq!(report.missing, ["css/gone.css"]);
        assert!(!m.output.join("css/gone.css").exists());
    }

    #[test]
    fn glob_reference_copies_every_match() {
        let m = manual(r#"<img src="img/*.png">"#, &["img/a.png", "img/b.png", "img/c.txt"]);
        let mut report = mirror(&m.html, &[AssetClass::Image], &m.source, &m.output).unwrap();
        report.copied.sort();
        assert_eq!(
            report.copied,
            [m.output.join("img/a.png"), m.output.join("img/b.png")]
        );
    }

    #[test]
    fn fragment_and_query_are_ignored() {
        let m = manual(r#"<link rel="stylesheet" href="s.css?v=2#top">"#, &["s.css"]);
        let report = mirror(&m.html, &[AssetClass::Stylesheet], &m.source, &m.output).unwrap();
        assert_eq!(report.copied, [m.output.join("s.css")]);
    }

    #[test]
    fn latin1_page_still_copies() {
        let m = manual("", &["img/x.png"]);
        fs::write(&m.html, b"<p>Caf\xE9</p><img src=\"img/x.png\">").unwrap();
        let report = mirror(&m.html, &[AssetClass::Image], &m.source, &m.output).unwrap();
        assert_eq!(report.copied, [m.output.join("img/x.png")]);
    }

    #[test]
    fn unmatched_glob_creates_no_directory() {
        let m = manual(r#"<img src="img*/x.png">"#, &[]);
        let report = mirror(&m.html, &[AssetClass::Image], &m.source, &m.output).unwrap();
        assert_eq!(report.missing, ["img*/x.png"]);
        assert!(!m.output.join("img*").exists());
    }

    #[test]
    fn object_is_handled_once_across_classes() {
        let m = manual(
            r#"<object data="fig/b.svg"></object><object data="../up.svg"></object>"#,
            &["fig/b.svg"],
        );
        let report = mirror(&m.html, &AssetClass::ALL, &m.source, &m.output).unwrap();
        assert_eq!(report.copied, [m.output.join("fig/b.svg")]);
        assert_eq!(report.rejected, ["../up.svg"]);
    }
}
