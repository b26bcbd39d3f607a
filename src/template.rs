//! `${name}` placeholder substitution for headers, footers and titles.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static RE_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

/// Named parameters for [`expand`].
pub type Params<'a> = BTreeMap<&'a str, String>;

/// Replace every `${key}` with its parameter. Unknown placeholders are left
/// untouched so literal `${...}` text in a template survives.
pub fn expand(template: &str, params: &Params<'_>) -> String {
    RE_PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match params.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
