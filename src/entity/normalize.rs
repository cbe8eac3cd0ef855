//! Text normalization for entity matching
//!
//! Provides normalization for participant names and aliases:
//! - honorific and leading-article stripping
//! - Unicode NFKC folding and case-folding for match keys
//! - whitespace collapsing
//! - token-set similarity scoring
//!
//! Display forms keep their original casing; only match keys are
//! case-folded.

use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Honorific prefixes stripped from names (with or without a dot).
const HONORIFICS: &[&str] = &["mr", "ms", "mrs", "dr", "prof"];

/// Normalize a name for display: strip one honorific prefix and one
/// leading "The", collapse whitespace, keep the original casing.
pub fn normalize_name(name: &str) -> String {
    let mut words: Vec<&str> = name.split_whitespace().collect();

    if let Some(first) = words.first() {
        if is_honorific(first) {
            words.remove(0);
        }
    }
    if let Some(first) = words.first() {
        if first.eq_ignore_ascii_case("the") {
            words.remove(0);
        }
    }

    words.join(" ")
}

/// Normalize a name into an alias-index key: NFKC fold, lowercase,
/// punctuation replaced with whitespace, honorifics stripped, tokens
/// joined by single spaces.
pub fn match_key(name: &str) -> String {
    tokenize(&normalize_name(name)).join(" ")
}

/// Normalize a role title for comparison ("Vice-President" and
/// "vice president" compare equal; a leading article is ignored).
pub fn normalize_role(role: &str) -> String {
    let role = role.trim();
    let role = role
        .strip_prefix("The ")
        .or_else(|| role.strip_prefix("the "))
        .unwrap_or(role);
    role.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Split text into lowercase alphanumeric tokens after NFKC folding.
pub fn tokenize(text: &str) -> Vec<String> {
    let folded: String = text.nfkc().collect();
    folded
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Token-set overlap (Jaccard) between two strings: intersection size
/// over union size of their lowercased word sets. Identical strings
/// score 1.0; either side empty scores 0.0.
pub fn token_set_similarity(a: &str, b: &str) -> f64 {
    let tokens_a: HashSet<String> = tokenize(a).into_iter().collect();
    let tokens_b: HashSet<String> = tokenize(b).into_iter().collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection = tokens_a.intersection(&tokens_b).count();
    let union = tokens_a.len() + tokens_b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Deterministic identifier slug for a constructed entity: lowercase,
/// spaces to hyphens, everything outside `[a-z0-9-]` dropped.
pub fn slug(name: &str) -> String {
    normalize_name(name)
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

fn is_honorific(word: &str) -> bool {
    let trimmed = word.trim_end_matches('.').to_lowercase();
    HONORIFICS.contains(&trimmed.as_str())
}

/// Whether a captured name is plausibly a state/country name rather
/// than a sentence fragment.
pub fn is_plausible_state_name(name: &str) -> bool {
    let name = name.trim();
    if name.len() < 2 || name.len() > 50 {
        return false;
    }
    if !name.starts_with(|c: char| c.is_ascii_uppercase()) {
        return false;
    }

    // Common false positives from voting and narrative text.
    const EXCLUDED: &[&str] = &[
        "the", "this", "that", "which", "where", "when", "what", "who", "how", "for", "against",
        "abstain", "voted", "voting", "vote",
    ];
    let lower = name.to_lowercase();
    !EXCLUDED.contains(&lower.as_str())
}

/// Whether text looks like a person's name rather than an organization.
pub fn is_likely_person_name(text: &str) -> bool {
    let words: Vec<&str> = text.split_whitespace().collect();

    if words
        .first()
        .map(|w| is_honorific(w))
        .unwrap_or(false)
    {
        return true;
    }

    if words.len() < 2 || words.len() > 5 {
        return false;
    }
    if !words
        .iter()
        .all(|w| w.starts_with(|c: char| c.is_ascii_uppercase()))
    {
        return false;
    }

    const ORG_KEYWORDS: &[&str] = &[
        "commission",
        "council",
        "parliament",
        "committee",
        "organization",
        "association",
        "federation",
        "union",
        "agency",
        "delegation",
        "secretariat",
        "ministry",
        "department",
    ];
    let lower = text.to_lowercase();
    !ORG_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Heuristic for country names: common suffixes plus EU member states.
pub fn is_likely_country_name(name: &str) -> bool {
    let lower = name.to_lowercase();

    const SUFFIXES: &[&str] = &["land", "stan", "ia", "ica"];
    if SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return true;
    }

    const EU_STATES: &[&str] = &[
        "germany", "france", "italy", "spain", "poland", "romania", "netherlands", "belgium",
        "greece", "czech", "portugal", "sweden", "hungary", "austria", "bulgaria", "denmark",
        "finland", "slovakia", "ireland", "croatia", "lithuania", "slovenia", "latvia", "estonia",
        "cyprus", "luxembourg", "malta",
    ];
    EU_STATES.iter().any(|s| lower.contains(s))
}

/// Whether text is a vote position keyword rather than a name.
pub fn is_vote_position(text: &str) -> bool {
    const POSITIONS: &[&str] = &["for", "against", "abstain", "in favour", "not voting", "absent"];
    let lower = text.trim().to_lowercase();
    POSITIONS.contains(&lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name_strips_honorific_and_article() {
        assert_eq!(normalize_name("Mr. John Smith"), "John Smith");
        assert_eq!(normalize_name("Dr Maria Keller"), "Maria Keller");
        assert_eq!(normalize_name("The European Commission"), "European Commission");
        assert_eq!(normalize_name("  John   Smith "), "John Smith");
    }

    #[test]
    fn test_match_key_case_folds_and_strips_punctuation() {
        assert_eq!(match_key("Smith, John"), "smith john");
        assert_eq!(match_key("Mr. John SMITH"), "john smith");
    }

    #[test]
    fn test_normalize_role_ignores_hyphens_and_case() {
        assert_eq!(normalize_role("Vice-President"), "vicepresident");
        assert_eq!(normalize_role("vice president"), "vicepresident");
        assert_eq!(normalize_role("Chair"), "chair");
        assert_eq!(normalize_role("The Chair"), "chair");
    }

    #[test]
    fn test_token_set_similarity_examples() {
        // "John Smith" vs "John Robert Smith": 2 shared of 3 total.
        let score = token_set_similarity("John Smith", "John Robert Smith");
        assert!((score - 2.0 / 3.0).abs() < 1e-9);

        // Reordered, punctuated variant has an identical token set.
        assert_eq!(token_set_similarity("John Smith", "Smith, John"), 1.0);

        assert_eq!(token_set_similarity("", "John"), 0.0);
    }

    #[test]
    fn test_slug_is_deterministic_and_clean() {
        assert_eq!(slug("Mr. John Smith"), "john-smith");
        assert_eq!(slug("European   Commission"), "european-commission");
        assert_eq!(slug("O'Brien"), "obrien");
    }

    #[test]
    fn test_state_name_plausibility() {
        assert!(is_plausible_state_name("France"));
        assert!(!is_plausible_state_name("against"));
        assert!(!is_plausible_state_name("The"));
        assert!(!is_plausible_state_name("x"));
    }

    #[test]
    fn test_person_name_heuristic() {
        assert!(is_likely_person_name("Mr. Smith"));
        assert!(is_likely_person_name("John Smith"));
        assert!(!is_likely_person_name("European Commission"));
        assert!(!is_likely_person_name("Smith"));
    }

    #[test]
    fn test_country_name_heuristic() {
        assert!(is_likely_country_name("Finland"));
        assert!(is_likely_country_name("France"));
        assert!(!is_likely_country_name("Working Group B"));
    }

    #[test]
    fn test_vote_position_keywords() {
        assert!(is_vote_position("For"));
        assert!(is_vote_position("in favour"));
        assert!(!is_vote_position("Germany"));
    }
}
