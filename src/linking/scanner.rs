//! Provision mention scanning
//!
//! Applies the reference catalog to a text span and produces
//! non-overlapping raw mentions. Rule families run in catalog priority
//! order; a candidate span is accepted only if it does not overlap (in
//! half-open character-offset terms) any span already accepted, so the
//! most specific class wins a contested region regardless of which rule
//! fires first textually.

use smallvec::SmallVec;
use std::collections::HashSet;

use crate::linking::patterns::{ReferenceCatalog, ReferenceKind};

/// A raw provision reference found in text, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReference {
    /// The matched text, trimmed.
    pub text: String,
    /// Half-open character span in the scanned text.
    pub span: (usize, usize),
    /// Which rule family produced the match.
    pub kind: ReferenceKind,
}

/// Scans text spans for provision references.
#[derive(Debug, Default)]
pub struct MentionScanner {
    catalog: ReferenceCatalog,
}

impl MentionScanner {
    pub fn new() -> Self {
        Self {
            catalog: ReferenceCatalog::new(),
        }
    }

    /// Extract all references from `text`, deduplicated by trimmed
    /// mention string, in first-seen order across the priority scan.
    /// Accepted spans are pairwise non-overlapping.
    pub fn scan(&self, text: &str) -> Vec<RawReference> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut accepted: SmallVec<[(usize, usize); 16]> = SmallVec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut refs = Vec::new();

        for (kind, regex) in self.catalog.rules() {
            for m in regex.find_iter(text) {
                let span = (m.start(), m.end());
                if overlaps_any(&accepted, span) {
                    continue;
                }
                accepted.push(span);

                let trimmed = m.as_str().trim();
                if trimmed.is_empty() || !seen.insert(trimmed.to_string()) {
                    continue;
                }
                refs.push(RawReference {
                    text: trimmed.to_string(),
                    span,
                    kind,
                });
            }
        }

        refs
    }
}

fn overlaps_any(accepted: &[(usize, usize)], (start, end): (usize, usize)) -> bool {
    accepted.iter().any(|&(s, e)| start < e && end > s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_article_suppresses_bare_article() {
        let scanner = MentionScanner::new();
        let refs = scanner.scan("The meeting discussed Article 6(1)(a) at length.");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].text, "Article 6(1)(a)");
        assert_eq!(refs[0].kind, ReferenceKind::ArticleNested);
    }

    #[test]
    fn test_distinct_references_all_found() {
        let scanner = MentionScanner::new();
        let refs =
            scanner.scan("Article 6 and Article 17 both relate to Regulation (EU) 2016/679.");
        let texts: Vec<_> = refs.iter().map(|r| r.text.as_str()).collect();
        assert!(texts.contains(&"Article 6"));
        assert!(texts.contains(&"Article 17"));
        assert!(texts.iter().any(|t| t.starts_with("Regulation")));
    }

    #[test]
    fn test_duplicate_mentions_deduplicated() {
        let scanner = MentionScanner::new();
        let refs = scanner.scan("Article 6 was raised; Article 6 again.");
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn test_spans_are_pairwise_non_overlapping() {
        let scanner = MentionScanner::new();
        let refs = scanner.scan(
            "Chapter III, Article 6(1), Section 2(a), Directive 95/46/EC, COM(2020) 825 and \
             Resolution 76/7 were all cited alongside Article 6.",
        );
        for (i, a) in refs.iter().enumerate() {
            for b in refs.iter().skip(i + 1) {
                let disjoint = a.span.1 <= b.span.0 || b.span.1 <= a.span.0;
                assert!(disjoint, "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        let scanner = MentionScanner::new();
        assert!(scanner.scan("").is_empty());
    }

    #[test]
    fn test_regulation_wins_over_document_number_region() {
        let scanner = MentionScanner::new();
        let refs = scanner.scan("See Regulation (EU) No 2016/679 for details.");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].kind, ReferenceKind::Regulation);
    }
}
