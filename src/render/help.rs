//! Default collaborator: plain-text help files.
//!
//! Help for `pkg.@Shape/area` lives at `help/pkg/@Shape/area.txt` under the
//! package root. The text is shown verbatim; trailing `%!demo` blocks are
//! split off and only rendered when demos are enabled.

use super::html::{html_escape, page, preformatted};
use super::{FunctionRenderer, PageOptions, Rendered, Summary, SummaryExtractor};
use crate::config::Templates;
use crate::error::{Error, Result};
use crate::name::QualifiedName;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extension of help source files.
const HELP_EXTENSION: &str = "txt";

pub struct HelpTextRenderer {
    help_dir: PathBuf,
    package: String,
    templates: Templates,
}

/// Help text with its demo blocks separated out.
#[derive(Debug, Default, PartialEq, Eq)]
struct HelpText {
    body: String,
    demos: Vec<String>,
}

impl HelpTextRenderer {
    pub fn new(help_dir: impl Into<PathBuf>, package: &str, templates: &Templates) -> Self {
        Self {
            help_dir: help_dir.into(),
            package: package.to_string(),
            templates: templates.clone(),
        }
    }

    fn source_path(&self, name: &QualifiedName) -> PathBuf {
        self.help_dir
            .join(name.resolve().file_with_extension(HELP_EXTENSION))
    }

    fn read(&self, name: &QualifiedName) -> Result<Option<HelpText>> {
        let path = self.source_path(name);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(split_demos(&text))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(Error::ReadFile { path, source }),
        }
    }
}

impl FunctionRenderer for HelpTextRenderer {
    fn render(&self, out: &Path, opts: &PageOptions<'_>) -> Result<Rendered> {
        let Some(help) = self.read(opts.name)? else {
            return Ok(Rendered::NotFound);
        };

        let mut body = preformatted(help.body.trim_end());
        if opts.include_demos {
            for (i, demo) in help.demos.iter().enumerate() {
                body.push_str(&format!("<h2>Demonstration {}</h2>\n", i + 1));
                body.push_str(&format!("<pre><code>{}</code></pre>\n", html_escape(demo)));
            }
        }

        let html = page(
            &self.templates,
            &self.templates.function_title,
            &self.package,
            &opts.root_prefix,
            &[("function", opts.name.as_str())],
            &body,
        );
        fs::write(out, html).map_err(|source| Error::WriteFile {
            path: out.to_path_buf(),
            source,
        })?;
        Ok(Rendered::Written)
    }
}

impl SummaryExtractor for HelpTextRenderer {
    fn first_sentence(&self, name: &QualifiedName, max_len: usize) -> Result<Summary> {
        match self.read(name)? {
            Some(help) if !help.body.trim().is_empty() => {
                Ok(Summary::Sentence(first_sentence(&help.body, max_len)))
            }
            _ => Ok(Summary::NotDocumented),
        }
    }
}

/// Separate `%!demo` blocks from the help body.
///
/// A line `%!<keyword>` opens a block; `%! code` and bare `%!` lines continue
/// it. Blocks other than `demo` (tests, asserts) are dropped.
fn split_demos(text: &str) -> HelpText {
    let mut help = HelpText::default();
    let mut in_demo = false;

    for line in text.lines() {
        let Some(rest) = line.strip_prefix("%!") else {
            in_demo = false;
            help.body.push_str(line);
            help.body.push('\n');
            continue;
        };

        if rest.starts_with(|c: char| c.is_alphabetic()) {
            in_demo = rest.trim_end() == "demo";
            if in_demo {
                help.demos.push(String::new());
            }
        } else if in_demo {
            if let Some(demo) = help.demos.last_mut() {
                demo.push_str(rest.strip_prefix(' ').unwrap_or(rest));
                demo.push('\n');
            }
        }
    }

    help
}

/// First sentence of `text` with line breaks flattened, cut to `max_len`
/// characters.
pub(crate) fn first_sentence(text: &str, max_len: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let sentence = match flat.find(". ") {
        Some(end) => &flat[..=end],
        None => flat.as_str(),
    };
    if sentence.chars().count() <= max_len {
        return sentence.to_string();
    }
    let cut: String = sentence.chars().take(max_len).collect();
    cut.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture(files: &[(&str, &str)]) -> (TempDir, HelpTextRenderer) {
        let dir = TempDir::new().unwrap();
        for (rel, text) in files {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, text).unwrap();
        }
        let renderer = HelpTextRenderer::new(dir.path(), "geometry", &Templates::default());
        (dir, renderer)
    }

    #[test]
    fn sentence_flattens_newlines() {
        assert_eq!(
            first_sentence("Compute the\narea of a polygon.  More text.", 80),
            "Compute the area of a polygon."
        );
    }

    #[test]
    fn sentence_without_period_is_whole_text() {
        assert_eq!(first_sentence("  Return x\n", 80), "Return x");
    }

    #[test]
    fn sentence_is_truncated() {
        assert_eq!(first_sentence("abcdef ghij. rest", 8), "abcdef g");
        assert_eq!(first_sentence("abcdef ghij. rest", 7), "abcdef");
    }

    #[test]
    fn demos_are_split_off() {
        let help = split_demos(
            "Area of a shape.\n%!demo\n%! area (1)\n%!\n%!test\n%! assert (true)\n%!demo\n%! area (2)\n",
        );
        assert_eq!(help.body, "Area of a shape.\n");
        assert_eq!(help.demos, vec!["area (1)\n\n", "area (2)\n"]);
    }

    #[test]
    fn missing_help_is_not_found() {
        let (dir, renderer) = fixture(&[]);
        let name = QualifiedName::parse("nothing").unwrap();
        let out = dir.path().join("nothing.html");
        let opts = PageOptions {
            name: &name,
            root_prefix: "../".to_string(),
            include_demos: false,
        };
        assert_eq!(renderer.render(&out, &opts).unwrap(), Rendered::NotFound);
        assert!(!out.exists());
        assert_eq!(
            renderer.first_sentence(&name, 80).unwrap(),
            Summary::NotDocumented
        );
    }

    #[test]
    fn renders_class_method_page() {
        let (dir, renderer) = fixture(&[(
            "shape/@Poly/area.txt",
            "Area of <Poly>.\n%!demo\n%! area (p)\n",
        )]);
        let name = QualifiedName::parse("shape.@Poly/area").unwrap();
        let out = dir.path().join("area.html");
        let opts = PageOptions {
            name: &name,
            root_prefix: "../../../".to_string(),
            include_demos: true,
        };

        assert_eq!(renderer.render(&out, &opts).unwrap(), Rendered::Written);
        let html = fs::read_to_string(&out).unwrap();
        assert!(html.contains("<pre>Area of &lt;Poly&gt;.</pre>"));
        assert!(html.contains("href=\"../../../assets/pkgdoc.css\""));
        assert!(html.contains("<h2>Demonstration 1</h2>"));
        assert_eq!(
            renderer.first_sentence(&name, 80).unwrap(),
            Summary::Sentence("Area of <Poly>.".to_string())
        );
    }

    #[test]
    fn blank_help_is_not_documented() {
        let (_dir, renderer) = fixture(&[("blank.txt", "\n  \n%!demo\n%! x\n")]);
        let name = QualifiedName::parse("blank").unwrap();
        assert_eq!(
            renderer.first_sentence(&name, 80).unwrap(),
            Summary::NotDocumented
        );
    }
}
