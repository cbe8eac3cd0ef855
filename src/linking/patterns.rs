//! Reference pattern catalog
//!
//! One detection rule per provision-reference class, compiled once by a
//! pure factory and held by each scanner/resolver instance. Rules are
//! iterated in a fixed specificity order: longest and most qualified
//! forms first, because a shorter rule's match region is frequently a
//! strict subset of a longer rule's region for the same text
//! ("Article 6" inside "Article 6(1)(a)", a bare document number inside
//! a regulation citation).

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Reference classes recognized by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// "Regulation (EU) 2016/679"
    Regulation,
    /// "Directive 95/46/EC"
    Directive,
    /// "Article 6(1)(a)" or "Article 6(1)"
    ArticleNested,
    /// "Article 6"
    Article,
    /// "Section 1798.100(a)"
    SectionSubdivision,
    /// "Section 1798.100"
    Section,
    /// "Chapter III"
    Chapter,
    /// "COM(2020) 825"
    DocumentNumber,
    /// "Resolution A/RES/76/7"
    UnResolution,
    /// Anything the catalog cannot classify.
    Other,
}

/// Compiled rule families, in specificity order.
#[derive(Debug)]
pub struct ReferenceCatalog {
    regulation: Regex,
    directive: Regex,
    article_nested: Regex,
    article: Regex,
    section_subdivision: Regex,
    section: Regex,
    chapter: Regex,
    document_number: Regex,
    un_resolution: Regex,
}

fn rule(pattern: &str) -> Regex {
    // Patterns are fixed literals; a failure here is a programming error.
    Regex::new(pattern).expect("reference pattern must compile")
}

impl ReferenceCatalog {
    pub fn new() -> Self {
        Self {
            regulation: rule(
                r"(?i)Regulation\s+\(?(?:EU|EC|EEC)?\)?\s*(?:No\.?\s*)?(\d{4}/\d+|\d+/\d{4})(?:/(?:EU|EC|EEC))?",
            ),
            directive: rule(r"(?i)Directive\s+(\d{2,4}/\d+(?:/(?:EU|EC|EEC))?)"),
            article_nested: rule(r"(?i)Article\s+(\d+)\((\d+)\)(?:\(([a-z])\))?"),
            article: rule(r"(?i)Article\s+(\d+)"),
            section_subdivision: rule(r"(?i)Section\s+(\d+(?:\.\d+)*)\(([a-z])\)"),
            section: rule(r"(?i)Section\s+(\d+(?:\.\d+)*)"),
            chapter: rule(r"(?i)Chapter\s+([IVXLCDM]+|\d+)"),
            document_number: rule(r"(?i)(COM|SEC|SWD)\s*\(\d{4}\)\s*\d+"),
            // Requires the "Resolution" prefix to avoid matching document numbers.
            un_resolution: rule(r"(?i)Resolution\s+([A-Z]/RES/\d+/\d+|\d+/\d+)"),
        }
    }

    /// Rule families in detection priority order (most specific first).
    pub fn rules(&self) -> [(ReferenceKind, &Regex); 9] {
        [
            (ReferenceKind::Regulation, &self.regulation),
            (ReferenceKind::Directive, &self.directive),
            (ReferenceKind::ArticleNested, &self.article_nested),
            (ReferenceKind::Article, &self.article),
            (ReferenceKind::SectionSubdivision, &self.section_subdivision),
            (ReferenceKind::Section, &self.section),
            (ReferenceKind::Chapter, &self.chapter),
            (ReferenceKind::DocumentNumber, &self.document_number),
            (ReferenceKind::UnResolution, &self.un_resolution),
        ]
    }

    pub fn regulation(&self) -> &Regex {
        &self.regulation
    }

    pub fn directive(&self) -> &Regex {
        &self.directive
    }

    pub fn article_nested(&self) -> &Regex {
        &self.article_nested
    }

    pub fn article(&self) -> &Regex {
        &self.article
    }

    pub fn section_subdivision(&self) -> &Regex {
        &self.section_subdivision
    }

    pub fn section(&self) -> &Regex {
        &self.section
    }

    pub fn chapter(&self) -> &Regex {
        &self.chapter
    }
}

impl Default for ReferenceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_nested_captures_paragraph_and_point() {
        let catalog = ReferenceCatalog::new();
        let caps = catalog.article_nested().captures("Article 6(1)(a)").unwrap();
        assert_eq!(&caps[1], "6");
        assert_eq!(&caps[2], "1");
        assert_eq!(&caps[3], "a");
    }

    #[test]
    fn test_regulation_matches_common_forms() {
        let catalog = ReferenceCatalog::new();
        for text in [
            "Regulation (EU) 2016/679",
            "Regulation (EC) No 45/2001",
            "Regulation 2016/679",
        ] {
            assert!(catalog.regulation().is_match(text), "no match for {text}");
        }
    }

    #[test]
    fn test_directive_matches_suffixed_form() {
        let catalog = ReferenceCatalog::new();
        let caps = catalog.directive().captures("Directive 95/46/EC").unwrap();
        assert_eq!(&caps[1], "95/46/EC");
    }

    #[test]
    fn test_chapter_matches_roman_and_arabic() {
        let catalog = ReferenceCatalog::new();
        assert!(catalog.chapter().is_match("Chapter III"));
        assert!(catalog.chapter().is_match("Chapter 4"));
    }

    #[test]
    fn test_rules_ordered_most_specific_first() {
        let catalog = ReferenceCatalog::new();
        let kinds: Vec<_> = catalog.rules().iter().map(|(k, _)| *k).collect();
        let nested = kinds
            .iter()
            .position(|k| *k == ReferenceKind::ArticleNested)
            .unwrap();
        let bare = kinds
            .iter()
            .position(|k| *k == ReferenceKind::Article)
            .unwrap();
        assert!(nested < bare);
    }
}
