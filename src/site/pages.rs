//! Site-level pages: package index, category overview, text passthrough
//! and the short description snippet.

use super::manifest::ManifestSections;
use crate::config::Options;
use crate::model::PackageDescriptor;
use crate::name::anchor;
use crate::render::help::first_sentence;
use crate::render::html::{html_escape, page, preformatted};
use crate::tree::PageTree;

/// Length limit of the description shown in the short snippet.
const SHORT_DESCRIPTION_LEN: usize = 120;

fn anchor_or_default(label: &str) -> String {
    let id = anchor(label);
    if id.is_empty() {
        "category".to_string()
    } else {
        id
    }
}

/// One section per category, each row linking an implemented function.
pub fn overview(desc: &PackageDescriptor, options: &Options, tree: &PageTree) -> String {
    let mut body = String::new();
    if !desc.description.is_empty() {
        body.push_str(&format!("<p>{}</p>\n", html_escape(&desc.description)));
    }

    if !tree.categories.is_empty() {
        body.push_str("<ul>\n");
        for category in &tree.categories {
            body.push_str(&format!(
                "  <li><a href=\"#{}\">{}</a></li>\n",
                html_escape(&anchor_or_default(&category.label)),
                html_escape(&category.label)
            ));
        }
        body.push_str("</ul>\n");
    }

    for category in &tree.categories {
        body.push_str(&format!(
            "<h2 id=\"{}\">{}</h2>\n<table>\n",
            html_escape(&anchor_or_default(&category.label)),
            html_escape(&category.label)
        ));
        for record in &category.functions {
            let name = if record.implemented {
                format!(
                    "<td class=\"name\"><a href=\"{}\">{}</a></td>",
                    html_escape(&record.link),
                    html_escape(&record.name)
                )
            } else {
                format!(
                    "<td class=\"name missing\">{}</td>",
                    html_escape(&record.name)
                )
            };
            body.push_str(&format!(
                "  <tr>{}<td>{}</td></tr>\n",
                name,
                html_escape(&record.summary)
            ));
        }
        body.push_str("</table>\n");
    }

    page(
        &options.templates,
        &options.templates.overview_title,
        &desc.name,
        "",
        &[],
        &body,
    )
}

fn metadata_row(out: &mut String, label: &str, value: &str) {
    if value.trim().is_empty() {
        return;
    }
    out.push_str(&format!(
        "  <tr><td>{}</td><td>{}</td></tr>\n",
        label,
        html_escape(value)
    ));
}

/// Package landing page: description, metadata and links to every
/// generated section.
pub fn index(desc: &PackageDescriptor, options: &Options, sections: &ManifestSections) -> String {
    let mut body = String::new();
    if !desc.description.is_empty() {
        body.push_str(&format!("<p>{}</p>\n", html_escape(&desc.description)));
    }

    body.push_str("<table>\n");
    metadata_row(&mut body, "Package", &desc.name);
    metadata_row(&mut body, "Version", &desc.version);
    metadata_row(&mut body, "Released", &desc.date);
    metadata_row(&mut body, "Author(s)", &desc.author);
    metadata_row(&mut body, "Maintainer(s)", &desc.maintainer);
    match &sections.license {
        Some(link) if !desc.license.is_empty() => body.push_str(&format!(
            "  <tr><td>License</td><td><a href=\"{}\">{}</a></td></tr>\n",
            html_escape(link),
            html_escape(&desc.license)
        )),
        _ => metadata_row(&mut body, "License", &desc.license),
    }
    if let Some(url) = desc.url.as_deref().filter(|u| !u.is_empty()) {
        body.push_str(&format!(
            "  <tr><td>Home page</td><td><a href=\"{0}\">{0}</a></td></tr>\n",
            html_escape(url)
        ));
    }
    metadata_row(&mut body, "Dependencies", &desc.depends.join(", "));
    metadata_row(
        &mut body,
        "System requirements",
        desc.system_requirements.as_deref().unwrap_or_default(),
    );
    metadata_row(
        &mut body,
        "Build requirements",
        desc.build_requirements.as_deref().unwrap_or_default(),
    );
    body.push_str("</table>\n");

    let links = [
        (&sections.overview, "Function reference"),
        (&sections.manual, "Package manual"),
        (&sections.news, "News"),
    ];
    if links.iter().any(|(link, _)| link.is_some()) {
        body.push_str("<h2>Documentation</h2>\n<ul>\n");
        for (link, label) in links {
            if let Some(link) = link {
                body.push_str(&format!(
                    "  <li><a href=\"{}\">{}</a></li>\n",
                    html_escape(link),
                    label
                ));
            }
        }
        body.push_str("</ul>\n");
    }

    page(
        &options.templates,
        &options.templates.index_title,
        &desc.name,
        "",
        &[],
        &body,
    )
}

/// Plain text file shown verbatim under a titled page.
pub fn text(desc: &PackageDescriptor, options: &Options, title_template: &str, text: &str) -> String {
    page(
        &options.templates,
        title_template,
        &desc.name,
        "",
        &[],
        &preformatted(text.trim_end()),
    )
}

/// Snippet for a page listing many packages, linking relative to the
/// output directory.
pub fn short_description(desc: &PackageDescriptor) -> String {
    let summary = first_sentence(&desc.description, SHORT_DESCRIPTION_LEN);
    let mut out = format!(
        "<div class=\"package\">\n  <a href=\"{0}/index.html\">{0}</a>",
        html_escape(&desc.name)
    );
    if !desc.version.is_empty() {
        out.push_str(&format!(" <span class=\"version\">{}</span>", html_escape(&desc.version)));
    }
    out.push('\n');
    if !summary.is_empty() {
        out.push_str(&format!("  <p>{}</p>\n", html_escape(&summary)));
    }
    out.push_str("</div>\n");
    out
}
