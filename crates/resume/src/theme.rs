//! CSS custom properties (variables) for rendered documents.
//!
//! [`ThemeVariables`] is rendered as a marked `<style>` block setting `:root`
//! custom properties prefixed with `--resume-`, so stylesheets can pick up
//! theme values (colors, spacing, font stacks) without template
//! preprocessing. [`apply`](ThemeVariables::apply) injects the block into a
//! document head; [`reset`](ThemeVariables::reset) removes any previously
//! injected block, restoring the stylesheet defaults.

use regex::Regex;
use rslug::slugify;
use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::LazyLock;

/// Attribute marking an injected theme block so it can be found and removed.
const THEME_MARKER: &str = "data-resume-theme";

static THEME_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?is)<style {THEME_MARKER}>.*?</style>\n?")).expect("valid theme regex")
});

/// A set of CSS custom properties injected as `:root` variables.
pub struct ThemeVariables {
    variables: HashMap<String, String>,
}

impl ThemeVariables {
    /// Creates a new set of theme variables from any map-like type.
    pub fn new(map: impl Into<HashMap<String, String>>) -> Self {
        Self { variables: map.into() }
    }

    /// Injects this block just before the document's closing head tag.
    /// Documents without a head are returned unchanged.
    pub fn apply(&self, html: &str) -> String {
        let reset = Self::reset(html);
        match reset.to_ascii_lowercase().find("</head") {
            Some(pos) => {
                let mut out = String::with_capacity(reset.len() + 128);
                out.push_str(&reset[..pos]);
                out.push_str(&self.to_string());
                out.push('\n');
                out.push_str(&reset[pos..]);
                out
            }
            None => {
                tracing::warn!("theme variables not injected; closing head tag not found");
                reset
            }
        }
    }

    /// Removes any previously injected theme block.
    pub fn reset(html: &str) -> String {
        THEME_BLOCK.replace_all(html, "").into_owned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ThemeVariables {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let variables = iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self { variables }
    }
}

impl Display for ThemeVariables {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "<style {THEME_MARKER}>\n:root {{")?;
        let mut entries: Vec<_> = self.variables.iter().collect();
        // Deterministic output regardless of map iteration order.
        entries.sort_by(|a, b| a.0.cmp(b.0));
        for (key, value) in entries {
            writeln!(f, "    --resume-{}: {};", slugify!(key), sanitize_css_value(value))?;
        }
        write!(f, "}}\n</style>")
    }
}

/// Theme values are declaration-position CSS; anything that could terminate
/// the declaration, the rule, or the style element is stripped.
fn sanitize_css_value(value: impl AsRef<str>) -> String {
    value.as_ref().chars().filter(|c| !matches!(c, ';' | '{' | '}' | '<' | '>') && !c.is_control()).collect()
}
