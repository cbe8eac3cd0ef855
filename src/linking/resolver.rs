//! Provision reference resolution
//!
//! Maps raw provision mentions to canonical graph identifiers with a
//! calibrated confidence. Resolution never fails outright: an
//! identifier is always constructed in canonical shape so downstream
//! consumers have something stable to store and compare, and the
//! confidence differentiates verified, partially verified, external and
//! merely constructed identifiers.
//!
//! The provision index is a read-only snapshot built once from the
//! regulation store; rebuilding requires a fresh resolver instance.

use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::error::{LinkError, Result};
use crate::linking::patterns::ReferenceCatalog;
use crate::store::{vocab, TripleStore};

/// Confidence assigned to references into another jurisdiction's
/// document base (regulations, directives): never verifiable against
/// the local index.
pub const EXTERNAL_CONFIDENCE: f64 = 0.5;

/// Confidence assigned to identifiers constructed without any index
/// corroboration.
pub const CONSTRUCTED_CONFIDENCE: f64 = 0.25;

const EXTERNAL_REGULATION_BASE: &str = "https://reglink.dev/regulations/EU/";
const EXTERNAL_DIRECTIVE_BASE: &str = "https://reglink.dev/directives/EU/";

/// Read-only snapshot of the provisions known to a regulation store.
#[derive(Debug, Default)]
pub struct ProvisionIndex {
    /// Every canonical provision identifier known to exist.
    provisions: HashSet<String>,
    /// Bare article number -> article identifier.
    article_by_number: HashMap<String, String>,
}

impl ProvisionIndex {
    /// Index all provisions (articles with their numbers, sections,
    /// chapters, paragraphs, points) from the store.
    pub fn from_store(store: &dyn TripleStore) -> Self {
        let mut index = ProvisionIndex::default();

        for triple in store.find("", vocab::RDF_TYPE, vocab::CLASS_ARTICLE) {
            if let Some(number) = store
                .find(&triple.subject, vocab::PROP_NUMBER, "")
                .into_iter()
                .next()
            {
                index
                    .article_by_number
                    .insert(number.object, triple.subject.clone());
            }
            index.provisions.insert(triple.subject);
        }

        for class in [
            vocab::CLASS_SECTION,
            vocab::CLASS_CHAPTER,
            vocab::CLASS_PARAGRAPH,
            vocab::CLASS_POINT,
        ] {
            for triple in store.find("", vocab::RDF_TYPE, class) {
                index.provisions.insert(triple.subject);
            }
        }

        debug!(
            provisions = index.provisions.len(),
            articles = index.article_by_number.len(),
            "provision index built"
        );
        index
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.provisions.contains(uri)
    }

    pub fn article_uri(&self, number: &str) -> Option<&str> {
        self.article_by_number.get(number).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.provisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.provisions.is_empty()
    }
}

/// Resolves raw provision references against a provision index.
#[derive(Debug)]
pub struct ProvisionResolver {
    catalog: ReferenceCatalog,
    index: ProvisionIndex,
    base_uri: String,
}

impl ProvisionResolver {
    /// Build a resolver over a snapshot of `store`. `base_uri` prefixes
    /// constructed identifiers (e.g., `"https://example.org/gdpr#"`).
    pub fn new(store: &dyn TripleStore, base_uri: impl Into<String>) -> Self {
        Self {
            catalog: ReferenceCatalog::new(),
            index: ProvisionIndex::from_store(store),
            base_uri: base_uri.into(),
        }
    }

    pub fn index(&self) -> &ProvisionIndex {
        &self.index
    }

    /// Resolve a raw reference to `(identifier, confidence)`.
    ///
    /// Returns `None` only for input no rule family can parse; every
    /// recognizable reference produces a best-effort identifier:
    /// - bare article found in the index: 1.0
    /// - nested article where only the parent exists: 0.75
    /// - external regulation/directive: exactly 0.5
    /// - constructed, not corroborated by the index: 0.25
    pub fn resolve(&self, raw: &str) -> Option<(String, f64)> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Some(caps) = self.catalog.article_nested().captures(raw) {
            let point = caps.get(3).map(|m| m.as_str());
            return Some(self.resolve_article(&caps[1], Some(&caps[2]), point));
        }

        if let Some(caps) = self.catalog.article().captures(raw) {
            return Some(self.resolve_article(&caps[1], None, None));
        }

        if let Some(caps) = self.catalog.section_subdivision().captures(raw) {
            return Some(self.resolve_section(&caps[1], Some(&caps[2])));
        }

        if let Some(caps) = self.catalog.section().captures(raw) {
            return Some(self.resolve_section(&caps[1], None));
        }

        if let Some(caps) = self.catalog.chapter().captures(raw) {
            return Some(self.resolve_chapter(&caps[1]));
        }

        if let Some(caps) = self.catalog.regulation().captures(raw) {
            return Some(external_ref(EXTERNAL_REGULATION_BASE, &caps[1]));
        }

        if let Some(caps) = self.catalog.directive().captures(raw) {
            return Some(external_ref(EXTERNAL_DIRECTIVE_BASE, &caps[1]));
        }

        None
    }

    /// Resolve a single reference, applying the acceptance policy: an
    /// error if nothing could be constructed, and a
    /// [`LinkError::LowConfidence`] (still carrying the identifier) for
    /// confidence strictly below [`EXTERNAL_CONFIDENCE`]. External
    /// references at exactly 0.5 succeed.
    pub fn resolve_reference(&self, raw: &str) -> Result<String> {
        let (uri, confidence) = self.resolve(raw).ok_or_else(|| LinkError::Unresolved {
            reference: raw.to_string(),
        })?;
        if confidence < EXTERNAL_CONFIDENCE {
            return Err(LinkError::LowConfidence {
                reference: raw.to_string(),
                uri,
                confidence,
            });
        }
        Ok(uri)
    }

    fn resolve_article(
        &self,
        number: &str,
        paragraph: Option<&str>,
        point: Option<&str>,
    ) -> (String, f64) {
        // Known article: verify the nested identifier, or fall back to
        // the parent article at reduced confidence.
        let known = self
            .index
            .article_uri(number)
            .map(str::to_string)
            .or_else(|| {
                let constructed = format!("{}Art{}", self.base_uri, number);
                self.index.contains(&constructed).then_some(constructed)
            });

        if let Some(article_uri) = known {
            if let Some(para) = paragraph {
                let nested = nested_uri(&article_uri, para, point);
                if self.index.contains(&nested) {
                    return (nested, 1.0);
                }
                return (article_uri, 0.75);
            }
            return (article_uri, 1.0);
        }

        // Unknown article: construct the canonical-shaped identifier.
        let mut uri = format!("{}Art{}", self.base_uri, number);
        if let Some(para) = paragraph {
            uri = nested_uri(&uri, para, point);
        }
        (uri, CONSTRUCTED_CONFIDENCE)
    }

    fn resolve_section(&self, number: &str, subdivision: Option<&str>) -> (String, f64) {
        let mut uri = format!("{}Section{}", self.base_uri, number);
        if let Some(sub) = subdivision {
            uri.push(':');
            uri.push_str(sub);
        }
        if self.index.contains(&uri) {
            (uri, 1.0)
        } else {
            (uri, CONSTRUCTED_CONFIDENCE)
        }
    }

    fn resolve_chapter(&self, number: &str) -> (String, f64) {
        let uri = format!("{}Chapter{}", self.base_uri, number);
        if self.index.contains(&uri) {
            (uri, 1.0)
        } else {
            (uri, CONSTRUCTED_CONFIDENCE)
        }
    }
}

fn nested_uri(article_uri: &str, paragraph: &str, point: Option<&str>) -> String {
    let mut uri = format!("{article_uri}:{paragraph}");
    if let Some(p) = point {
        uri.push(':');
        uri.push_str(p);
    }
    uri
}

fn external_ref(base: &str, number: &str) -> (String, f64) {
    let number: String = number.chars().filter(|c| !c.is_whitespace()).collect();
    (format!("{base}{number}"), EXTERNAL_CONFIDENCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const BASE: &str = "https://example.org/gdpr#";

    fn make_indexed_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        let art6 = format!("{BASE}Art6");
        store.add(&art6, vocab::RDF_TYPE, vocab::CLASS_ARTICLE);
        store.add(&art6, vocab::PROP_NUMBER, "6");
        store.add(
            &format!("{BASE}Art6:1"),
            vocab::RDF_TYPE,
            vocab::CLASS_PARAGRAPH,
        );
        store.add(
            &format!("{BASE}Art6:1:a"),
            vocab::RDF_TYPE,
            vocab::CLASS_POINT,
        );
        store.add(
            &format!("{BASE}ChapterIII"),
            vocab::RDF_TYPE,
            vocab::CLASS_CHAPTER,
        );
        store
    }

    fn make_resolver() -> ProvisionResolver {
        ProvisionResolver::new(&make_indexed_store(), BASE)
    }

    #[test]
    fn test_bare_article_full_confidence() {
        let resolver = make_resolver();
        let (uri, confidence) = resolver.resolve("Article 6").unwrap();
        assert_eq!(uri, format!("{BASE}Art6"));
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn test_nested_article_resolves_to_point() {
        let resolver = make_resolver();
        let (uri, confidence) = resolver.resolve("Article 6(1)(a)").unwrap();
        assert_eq!(uri, format!("{BASE}Art6:1:a"));
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn test_missing_paragraph_falls_back_to_article() {
        let resolver = make_resolver();
        let (uri, confidence) = resolver.resolve("Article 6(3)").unwrap();
        assert_eq!(uri, format!("{BASE}Art6"));
        assert_eq!(confidence, 0.75);
    }

    #[test]
    fn test_unknown_article_constructed_at_low_confidence() {
        let resolver = make_resolver();
        let (uri, confidence) = resolver.resolve("Article 999").unwrap();
        assert_eq!(uri, format!("{BASE}Art999"));
        assert_eq!(confidence, CONSTRUCTED_CONFIDENCE);
    }

    #[test]
    fn test_unknown_nested_article_keeps_nested_shape() {
        let resolver = make_resolver();
        let (uri, confidence) = resolver.resolve("Article 999(2)(b)").unwrap();
        assert_eq!(uri, format!("{BASE}Art999:2:b"));
        assert_eq!(confidence, CONSTRUCTED_CONFIDENCE);
    }

    #[test]
    fn test_known_chapter_full_confidence() {
        let resolver = make_resolver();
        let (uri, confidence) = resolver.resolve("Chapter III").unwrap();
        assert_eq!(uri, format!("{BASE}ChapterIII"));
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn test_external_regulation_exactly_half_confidence() {
        let resolver = make_resolver();
        let (uri, confidence) = resolver.resolve("Regulation (EU) 2016/679").unwrap();
        assert_eq!(uri, "https://reglink.dev/regulations/EU/2016/679");
        assert_eq!(confidence, EXTERNAL_CONFIDENCE);
    }

    #[test]
    fn test_external_directive_normalizes_whitespace() {
        let resolver = make_resolver();
        let (uri, confidence) = resolver.resolve("Directive 95/46/EC").unwrap();
        assert_eq!(uri, "https://reglink.dev/directives/EU/95/46/EC");
        assert_eq!(confidence, EXTERNAL_CONFIDENCE);
    }

    #[test]
    fn test_unparseable_reference_yields_none() {
        let resolver = make_resolver();
        assert!(resolver.resolve("the previous discussion").is_none());
        assert!(resolver.resolve("").is_none());
    }

    #[test]
    fn test_resolve_reference_accepts_external_at_boundary() {
        let resolver = make_resolver();
        let uri = resolver.resolve_reference("Regulation (EU) 2016/679").unwrap();
        assert_eq!(uri, "https://reglink.dev/regulations/EU/2016/679");
    }

    #[test]
    fn test_resolve_reference_rejects_constructed_identifier() {
        let resolver = make_resolver();
        match resolver.resolve_reference("Article 999") {
            Err(LinkError::LowConfidence {
                uri, confidence, ..
            }) => {
                assert_eq!(uri, format!("{BASE}Art999"));
                assert_eq!(confidence, CONSTRUCTED_CONFIDENCE);
            }
            other => panic!("expected low confidence error, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_reference_unresolved_for_malformed_input() {
        let resolver = make_resolver();
        assert!(matches!(
            resolver.resolve_reference("no reference here"),
            Err(LinkError::Unresolved { .. })
        ));
    }
}
