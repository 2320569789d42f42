//! Conversion between [`ResumeParams`] and the URL query string.
//!
//! The codec is pure and total: parsing never fails, malformed or unknown
//! tokens are silently dropped, and serialization always emits the full
//! effective order so a URL is self-describing without knowledge of the
//! defaults.

use crate::{ResumeParams, SectionKey};
use std::collections::BTreeMap;

/// Query parameter carrying the comma-separated section order.
pub const PARAM_ORDER: &str = "order";

/// Parses a query string (without the leading `?`) into [`ResumeParams`].
///
/// Reads `order` as a comma-separated key list and one `compact<Name>` flag
/// per compactable section (enabled iff the value is exactly `"1"`). When the
/// order parameter yields zero valid tokens the default order is used. The
/// first occurrence of a repeated parameter wins.
pub fn parse(input: Option<&str>) -> ResumeParams {
    let mut order: Vec<SectionKey> = Vec::new();
    let mut seen_order = false;
    let mut compact: BTreeMap<SectionKey, bool> =
        SectionKey::COMPACTABLE.into_iter().map(|k| (k, false)).collect();
    let mut seen_compact: Vec<SectionKey> = Vec::new();

    for (key, value) in url::form_urlencoded::parse(input.unwrap_or_default().as_bytes()) {
        if key == PARAM_ORDER {
            if seen_order {
                continue;
            }
            seen_order = true;
            order = value
                .split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .filter_map(SectionKey::from_key)
                .collect();
        } else if let Some(section) =
            SectionKey::COMPACTABLE.into_iter().find(|k| k.compact_flag() == key)
        {
            if seen_compact.contains(&section) {
                continue;
            }
            seen_compact.push(section);
            compact.insert(section, value == "1");
        }
        // Anything else (including the `ts` cache-buster) is ignored.
    }

    if order.is_empty() {
        order = SectionKey::DEFAULT_ORDER.to_vec();
    }

    ResumeParams { compact, order }
}

/// Produces the complete effective order from an arbitrary key sequence.
///
/// Duplicates collapse to their first occurrence, the relative order of the
/// input is preserved, and any registry key missing from the input is
/// appended in registry order. The result is always a permutation of
/// [`SectionKey::REGISTRY`], which makes the function idempotent.
pub fn normalize_order(order: &[SectionKey]) -> Vec<SectionKey> {
    let mut effective: Vec<SectionKey> = Vec::with_capacity(SectionKey::REGISTRY.len());
    for key in order {
        if !effective.contains(key) {
            effective.push(*key);
        }
    }
    for key in SectionKey::REGISTRY {
        if !effective.contains(&key) {
            effective.push(key);
        }
    }
    effective
}

/// Serializes [`ResumeParams`] to a query string (without the leading `?`).
///
/// Emits one flag per enabled compact entry and always the full effective
/// order. Round-trip law: `parse(&serialize(p))` has an effective order equal
/// to `normalize_order(&p.order)` and a compact map equal to `p.compact`
/// restricted to the compactable subset.
pub fn serialize(params: &ResumeParams) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for key in SectionKey::COMPACTABLE {
        if params.is_compact(key) {
            serializer.append_pair(key.compact_flag(), "1");
        }
    }
    let order: Vec<&str> = normalize_order(&params.order).iter().map(SectionKey::as_str).collect();
    serializer.append_pair(PARAM_ORDER, &order.join(","));
    serializer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SectionKey::{About, Experience, Projects, Skills, Summary};
    use rstest::rstest;

    #[rstest]
    #[case(&[], &[Summary, Skills, About, Experience, Projects])]
    #[case(&[Projects, Summary], &[Projects, Summary, Skills, About, Experience])]
    #[case(&[Projects, Projects, Summary, Projects], &[Projects, Summary, Skills, About, Experience])]
    #[case(
        &[Experience, Projects, About, Skills, Summary],
        &[Experience, Projects, About, Skills, Summary]
    )]
    fn test_normalize_order(#[case] input: &[SectionKey], #[case] expected: &[SectionKey]) {
        assert_eq!(normalize_order(input), expected);
    }

    #[test]
    fn test_normalize_order_is_idempotent() {
        let once = normalize_order(&[Projects, About]);
        assert_eq!(normalize_order(&once), once);
    }

    #[test]
    fn test_normalize_order_is_total_permutation() {
        let effective = normalize_order(&[Projects, Projects]);
        let mut sorted = effective.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), SectionKey::REGISTRY.len());
    }

    #[test]
    fn test_parse_empty_yields_default_order() {
        let params = parse(None);
        assert_eq!(params.order, SectionKey::DEFAULT_ORDER.to_vec());
        let params = parse(Some(""));
        assert_eq!(params.order, SectionKey::DEFAULT_ORDER.to_vec());
    }

    #[test]
    fn test_parse_drops_unknown_and_malformed_tokens() {
        let params = parse(Some("order=projects,,nope ,%20summary%20,Skills"));
        assert_eq!(params.order, vec![Projects, Summary]);
    }

    #[test]
    fn test_parse_all_unknown_tokens_falls_back_to_default() {
        let params = parse(Some("order=nope,also-nope"));
        assert_eq!(params.order, SectionKey::DEFAULT_ORDER.to_vec());
    }

    #[test]
    fn test_parse_compact_flags() {
        let params = parse(Some("compactSkills=1&compactSummary=0&compactProjects=yes"));
        assert!(params.is_compact(Skills));
        assert!(!params.is_compact(Summary));
        // Only the literal "1" enables a flag.
        assert!(!params.is_compact(Projects));
        assert!(!params.is_compact(Experience));
    }

    #[test]
    fn test_parse_ignores_compact_flag_for_non_compactable() {
        let params = parse(Some("compactAbout=1"));
        assert!(!params.is_compact(About));
        assert!(!params.compact.contains_key(&About));
    }

    #[test]
    fn test_parse_first_occurrence_wins() {
        let params = parse(Some("order=projects&order=summary"));
        assert_eq!(params.order[0], Projects);
    }

    #[test]
    fn test_serialize_always_emits_full_order() {
        let params = ResumeParams { compact: Default::default(), order: vec![Projects] };
        let qs = serialize(&params);
        assert!(qs.contains("order=projects%2Csummary%2Cskills%2Cabout%2Cexperience"));
    }

    #[test]
    fn test_serialize_emits_only_enabled_compact_flags() {
        let mut params = ResumeParams::default();
        params.set_compact(Summary, false);
        params.set_compact(Skills, true);
        params.set_compact(Experience, false);
        params.set_compact(Projects, false);
        let qs = serialize(&params);
        assert!(qs.contains("compactSkills=1"));
        assert!(!qs.contains("compactSummary"));
        assert!(!qs.contains("compactExperience"));
    }

    #[rstest]
    #[case(ResumeParams::default())]
    #[case(ResumeParams { compact: Default::default(), order: vec![Projects, Summary, Projects] })]
    #[case({
        let mut p = ResumeParams::default();
        p.set_compact(Summary, true);
        p.set_compact(Skills, false);
        p.order = vec![About];
        p
    })]
    fn test_round_trip(#[case] params: ResumeParams) {
        let parsed = parse(Some(&serialize(&params)));
        assert_eq!(parsed.effective_order(), normalize_order(&params.order));
        for key in SectionKey::COMPACTABLE {
            assert_eq!(parsed.is_compact(key), params.is_compact(key));
        }
    }

    /// The end-to-end ordering scenario: known keys keep their relative
    /// order, missing keys are appended in registry order.
    #[test]
    fn test_partial_order_with_unknowns_end_to_end() {
        let params = parse(Some("order=projects,wat,summary,projects"));
        assert_eq!(
            params.effective_order(),
            vec![Projects, Summary, Skills, About, Experience]
        );
    }
}
