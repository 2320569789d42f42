//! HTML rendering of a [`Profile`] under a set of [`ResumeParams`].
//!
//! Templates and the stylesheet are embedded into the binary at compile time
//! using [`rust-embed`](rust_embed) and compiled eagerly with [upon] so that
//! syntax errors surface at construction rather than per request. The
//! document wraps all section markup in a single container carrying the
//! [`MARKER_ID`] the snapshot extractor looks for.

use crate::error::{ErrorKind, Result};
use crate::profile::Profile;
use exn::{OptionExt, ResultExt};
use folio_params::{ResumeParams, SectionKey};
use rust_embed::Embed;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::instrument;
use upon::{Engine, Template};

/// The id of the element whose inner HTML is the readiness signal for
/// snapshot extraction.
pub const MARKER_ID: &str = "resume-content";

#[derive(Embed)]
#[folder = "templates/"]
struct Templates;

#[derive(Embed)]
#[folder = "assets/"]
pub(crate) struct Assets;

/// Renders resume HTML. Reusable across requests; construction compiles the
/// document, header, and one fragment per registered section.
pub struct ResumeRenderer {
    engine: Engine<'static>,
    document: Template<'static>,
    header: Template<'static>,
    sections: BTreeMap<SectionKey, Template<'static>>,
    stylesheet: String,
}

#[derive(Serialize)]
struct SectionContext<'a> {
    profile: &'a Profile,
    compact: bool,
}

#[derive(Serialize)]
struct DocumentContext<'a> {
    title: &'a str,
    stylesheet: &'a str,
    body: &'a str,
}

impl ResumeRenderer {
    pub fn new() -> Result<Self> {
        let mut engine = Engine::new();
        addons::configure(&mut engine);
        let document = compile(&engine, "document.html")?;
        let header = compile(&engine, "header.html")?;
        let mut sections = BTreeMap::new();
        for key in SectionKey::REGISTRY {
            sections.insert(key, compile(&engine, &format!("{}.html", key.as_str()))?);
        }
        let stylesheet = load_asset("resume.css")?;
        Ok(Self { engine, document, header, sections, stylesheet })
    }

    /// Renders the complete HTML document: header first, then every
    /// registered section in the params' effective order, each in its
    /// compact variant when the params say so.
    #[instrument(skip_all, fields(order = ?params.effective_order()))]
    pub fn render(&self, profile: &Profile, params: &ResumeParams) -> Result<String> {
        let mut body = self
            .header
            .render(&self.engine, SectionContext { profile, compact: false })
            .to_string()
            .or_raise(|| ErrorKind::Template)?;
        for key in params.effective_order() {
            let template =
                self.sections.get(&key).ok_or_raise(|| ErrorKind::Asset(key.to_string()))?;
            let section = template
                .render(&self.engine, SectionContext { profile, compact: params.is_compact(key) })
                .to_string()
                .or_raise(|| ErrorKind::Template)?;
            body.push('\n');
            body.push_str(&section);
        }
        self.document
            .render(
                &self.engine,
                DocumentContext {
                    title: &profile.personal.name,
                    stylesheet: &self.stylesheet,
                    body: &body,
                },
            )
            .to_string()
            .or_raise(|| ErrorKind::Template)
    }
}

fn compile(engine: &Engine<'static>, name: &str) -> Result<Template<'static>> {
    let source = load_asset_from::<Templates>(name)?;
    engine.compile(source).or_raise(|| ErrorKind::Template)
}

fn load_asset(name: &str) -> Result<String> {
    load_asset_from::<Assets>(name)
}

fn load_asset_from<E: Embed>(name: &str) -> Result<String> {
    let file = E::get(name).ok_or_raise(|| ErrorKind::Asset(name.to_string()))?;
    String::from_utf8(file.data.into_owned()).or_raise(|| ErrorKind::Asset(name.to_string()))
}

/// Custom [`upon`] formatters: HTML-escaping by default, `raw` to opt out
/// for pre-rendered fragments and the stylesheet.
mod addons {
    use std::fmt::Write;
    use upon::{Engine, Value, fmt as upon_fmt};

    fn escape_formatter(f: &mut upon_fmt::Formatter<'_>, value: &Value) -> upon_fmt::Result {
        match value {
            Value::String(s) => write!(f, "{}", html_escape::encode_safe(s))?,
            v => upon_fmt::default(f, v)?,
        };
        Ok(())
    }

    pub(crate) fn configure(engine: &mut Engine<'_>) {
        engine.set_default_formatter(&escape_formatter);
        engine.add_formatter("raw", upon_fmt::default);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_params::codec;
    use rstest::rstest;

    fn render(query: Option<&str>) -> String {
        let renderer = ResumeRenderer::new().unwrap();
        let profile = Profile::sample().unwrap();
        renderer.render(&profile, &codec::parse(query)).unwrap()
    }

    #[test]
    fn test_document_carries_marker_and_substantial_content() {
        let html = render(None);
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains(&format!("id=\"{MARKER_ID}\"")));
        assert!(html.trim().len() > 100);
    }

    /// Byte offset of a section's markup. The bare class names also appear
    /// in the inlined stylesheet, so matching must anchor on the attribute.
    fn section_start(html: &str, key: &str) -> usize {
        html.find(&format!("class=\"resume-section resume-{key}")).unwrap()
    }

    #[test]
    fn test_default_order_places_about_second() {
        let html = render(None);
        assert!(section_start(&html, "summary") < section_start(&html, "about"));
        assert!(section_start(&html, "about") < section_start(&html, "skills"));
    }

    #[test]
    fn test_order_parameter_reorders_sections() {
        let html = render(Some("order=projects,summary"));
        assert!(section_start(&html, "projects") < section_start(&html, "summary"));
    }

    #[rstest]
    #[case("compactExperience=1", "resume-experience compact")]
    #[case("compactSkills=1", "resume-skills compact")]
    fn test_compact_flag_switches_variant(#[case] query: &str, #[case] marker: &str) {
        assert!(!render(None).contains(marker));
        assert!(render(Some(query)).contains(marker));
    }

    #[test]
    fn test_compact_experience_swaps_highlights_for_description() {
        let profile = Profile::sample().unwrap();
        let first = &profile.experience[0];
        let full = render(None);
        assert!(full.contains(&first.highlights[0]));
        let compact = render(Some("compactExperience=1"));
        assert!(!compact.contains(&first.highlights[0]));
        assert!(compact.contains(&first.compact_description));
        assert!(compact.contains(&first.technologies[0]));
    }

    #[test]
    fn test_about_never_compact() {
        let html = render(Some("compactAbout=1"));
        assert!(!html.contains("resume-about compact"));
    }

    #[test]
    fn test_profile_text_is_escaped() {
        let renderer = ResumeRenderer::new().unwrap();
        let mut profile = Profile::sample().unwrap();
        profile.summary = "<script>alert(1)</script>".to_string();
        let html = renderer.render(&profile, &codec::parse(None)).unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_stylesheet_is_inlined() {
        let html = render(None);
        assert!(html.contains("resume-section"));
        assert!(html.contains("<style>"));
    }
}
