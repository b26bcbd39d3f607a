//! HTML helpers shared by every generated page.

use crate::config::Templates;
use crate::template::{self, Params};

/// Stylesheet written to `assets/pkgdoc.css` when website files are enabled.
pub const STYLESHEET: &str = "\
body { font-family: system-ui, sans-serif; max-width: 48em; margin: 2em auto; padding: 0 1em; }
nav { font-size: 0.9em; margin-bottom: 1em; }
code { background: #f4f4f4; padding: 0.15em 0.3em; border-radius: 3px; }
pre { background: #f4f4f4; padding: 1em; border-radius: 5px; overflow-x: auto; }
table { border-collapse: collapse; }
td { padding: 0.2em 0.6em; vertical-align: top; }
td.name { font-family: monospace; white-space: nowrap; }
.missing { color: #888; }
dt { font-weight: bold; margin-top: 0.5em; }
dd { margin-left: 1.5em; }
";

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Wrap `body` in the configured header and footer.
///
/// `title` is expanded first with the same parameters, then escaped and
/// made available to the header as `${title}`.
pub fn page(
    templates: &Templates,
    title_template: &str,
    package: &str,
    root: &str,
    extra: &[(&'static str, &str)],
    body: &str,
) -> String {
    let mut params = Params::from([("package", package.to_string()), ("root", root.to_string())]);
    for &(key, value) in extra {
        params.insert(key, value.to_string());
    }
    let title = template::expand(title_template, &params);
    params.insert("title", html_escape(&title));

    let mut out = template::expand(&templates.header, &params);
    out.push_str(&format!("<h1>{}</h1>\n", html_escape(&title)));
    out.push_str(body);
    out.push_str(&template::expand(&templates.footer, &params));
    out
}

/// Plain text shown verbatim.
pub fn preformatted(text: &str) -> String {
    format!("<pre>{}</pre>\n", html_escape(text))
}
