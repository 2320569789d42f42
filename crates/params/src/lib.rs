//! Resume section registry and configuration parameters.
//!
//! The resume document is assembled from a closed vocabulary of sections
//! ([`SectionKey`]). A [`ResumeParams`] value describes how the document is
//! composed: the order sections render in, and which sections use their
//! condensed ("compact") variant. The [`codec`] module converts between
//! [`ResumeParams`] and the URL query-string representation so that the
//! composition survives reloads and can be shared as a link.

pub mod codec;

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// A named, orderable block of the resume document.
///
/// The set is closed: unknown keys received from untrusted input (the URL)
/// are silently dropped by the [`codec`].
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKey {
    #[display("summary")]
    Summary,
    #[display("skills")]
    Skills,
    #[display("about")]
    About,
    #[display("experience")]
    Experience,
    #[display("projects")]
    Projects,
}

/// Returned by [`SectionKey::from_str`] for keys outside the registry.
#[derive(Clone, Debug, Display, Error)]
#[display("unknown resume section: {key}")]
pub struct UnknownSection {
    pub key: String,
}

impl FromStr for SectionKey {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| UnknownSection { key: s.to_string() })
    }
}

impl SectionKey {
    /// Every section, in registry order. Missing keys are appended to a
    /// normalized order in this sequence.
    pub const REGISTRY: [SectionKey; 5] =
        [Self::Summary, Self::Skills, Self::About, Self::Experience, Self::Projects];

    /// The subset of sections that have a condensed rendering.
    pub const COMPACTABLE: [SectionKey; 4] =
        [Self::Summary, Self::Skills, Self::Experience, Self::Projects];

    /// The order sections render in when the URL carries no `order` parameter.
    pub const DEFAULT_ORDER: [SectionKey; 5] =
        [Self::Summary, Self::About, Self::Skills, Self::Experience, Self::Projects];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Skills => "skills",
            Self::About => "about",
            Self::Experience => "experience",
            Self::Projects => "projects",
        }
    }

    /// Case-sensitive lookup, `None` for keys outside the registry.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::REGISTRY.into_iter().find(|k| k.as_str() == key)
    }

    pub fn compactable(&self) -> bool {
        Self::COMPACTABLE.contains(self)
    }

    /// The query-string flag that toggles this section's compact mode,
    /// derived deterministically from the key (`compact` + capitalized key).
    pub const fn compact_flag(&self) -> &'static str {
        match self {
            Self::Summary => "compactSummary",
            Self::Skills => "compactSkills",
            Self::About => "compactAbout",
            Self::Experience => "compactExperience",
            Self::Projects => "compactProjects",
        }
    }

    /// Registry default for the compact flag. Only meaningful for
    /// compactable sections.
    pub const fn default_compact(&self) -> bool {
        matches!(self, Self::Skills | Self::Experience | Self::Projects)
    }
}

/// The resume composition: section order plus per-section compact flags.
///
/// Values received from the URL are untrusted; `order` may be partial,
/// contain unknown tokens, or duplicates. [`codec::normalize_order`] produces
/// the effective permutation. The `compact` map is restricted to the
/// compactable subset once normalized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeParams {
    pub compact: BTreeMap<SectionKey, bool>,
    pub order: Vec<SectionKey>,
}

impl Default for ResumeParams {
    fn default() -> Self {
        let compact = SectionKey::COMPACTABLE.into_iter().map(|k| (k, k.default_compact())).collect();
        Self { compact, order: SectionKey::DEFAULT_ORDER.to_vec() }
    }
}

impl ResumeParams {
    /// The complete, deduplicated section order. See [`codec::normalize_order`].
    pub fn effective_order(&self) -> Vec<SectionKey> {
        codec::normalize_order(&self.order)
    }

    /// Whether the given section renders in compact mode. Sections outside
    /// the compactable subset are never compact.
    pub fn is_compact(&self, key: SectionKey) -> bool {
        key.compactable() && self.compact.get(&key).copied().unwrap_or(false)
    }

    /// Sets a compact flag. Ignored for sections without a compact variant.
    pub fn set_compact(&mut self, key: SectionKey, enabled: bool) {
        if key.compactable() {
            self.compact.insert(key, enabled);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_compactable() {
        for key in SectionKey::COMPACTABLE {
            assert!(SectionKey::REGISTRY.contains(&key));
        }
    }

    #[test]
    fn test_default_order_is_permutation_of_registry() {
        let mut sorted = SectionKey::DEFAULT_ORDER.to_vec();
        sorted.sort();
        let mut registry = SectionKey::REGISTRY.to_vec();
        registry.sort();
        assert_eq!(sorted, registry);
    }

    #[test]
    fn test_from_key_round_trips() {
        for key in SectionKey::REGISTRY {
            assert_eq!(SectionKey::from_key(key.as_str()), Some(key));
        }
        assert_eq!(SectionKey::from_key("contact"), None);
        assert_eq!(SectionKey::from_key("Summary"), None);
    }

    #[test]
    fn test_compact_flag_derivation() {
        assert_eq!(SectionKey::Summary.compact_flag(), "compactSummary");
        assert_eq!(SectionKey::Experience.compact_flag(), "compactExperience");
    }

    #[test]
    fn test_default_params_compact_subset() {
        let params = ResumeParams::default();
        assert_eq!(params.compact.len(), SectionKey::COMPACTABLE.len());
        assert!(!params.is_compact(SectionKey::Summary));
        assert!(params.is_compact(SectionKey::Skills));
        assert!(!params.is_compact(SectionKey::About));
    }

    #[test]
    fn test_set_compact_ignores_non_compactable() {
        let mut params = ResumeParams::default();
        params.set_compact(SectionKey::About, true);
        assert!(!params.is_compact(SectionKey::About));
        assert!(!params.compact.contains_key(&SectionKey::About));
    }

    #[test]
    fn test_section_key_serde_is_camel_case() {
        let json = serde_json::to_string(&SectionKey::Experience).unwrap();
        assert_eq!(json, "\"experience\"");
    }
}
