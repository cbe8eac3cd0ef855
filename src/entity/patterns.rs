//! Entity rule families
//!
//! Regex families for speaker and stakeholder mentions in minutes
//! text, compiled once by a pure factory and held by each extractor
//! instance. Unlike provision rules, these families are not mutually
//! exclusive, so entity scanning does not enforce global
//! overlap-freedom; each family emits its own mentions and results are
//! deduplicated later by resolved identifier.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Probable type of an entity mention, inferred from the rule family
/// that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionKind {
    Speaker,
    Role,
    MemberState,
    Delegation,
    Organization,
    Stakeholder,
    Other,
}

impl MentionKind {
    pub fn label(&self) -> &'static str {
        match self {
            MentionKind::Speaker => "speaker",
            MentionKind::Role => "role",
            MentionKind::MemberState => "member_state",
            MentionKind::Delegation => "delegation",
            MentionKind::Organization => "organization",
            MentionKind::Stakeholder => "stakeholder",
            MentionKind::Other => "other",
        }
    }
}

impl std::fmt::Display for MentionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Compiled rule families for entity extraction.
#[derive(Debug)]
pub struct EntityPatterns {
    /// "Mr. Smith (France)..." and "Keller, representative of Austria..."
    pub speaker_with_affiliation: Vec<Regex>,
    /// "The Chair noted...", "The Rapporteur Keller presented..."
    pub speaker_role: Vec<Regex>,
    /// "Ms Keller stated..."
    pub speaker_name: Vec<Regex>,
    /// "The representative of Germany stated...", "submitted by France"
    pub member_state: Vec<Regex>,
    /// "The French delegation...", "delegation of Italy"
    pub delegation: Vec<Regex>,
    /// "The European Commission...", "observer from the Trade Union Federation"
    pub organization: Vec<Regex>,
    /// "[Member State]: For/Against/Abstain"
    pub voting_record: Vec<Regex>,
    /// "Submitted by: ...", "Sponsors: ..."
    pub document_author: Vec<Regex>,
}

fn rule(pattern: &str) -> Regex {
    // Patterns are fixed literals; a failure here is a programming error.
    Regex::new(pattern).expect("entity pattern must compile")
}

impl EntityPatterns {
    pub fn compile() -> Self {
        Self {
            speaker_with_affiliation: vec![
                rule(r"(?i)(?:Mr|Ms|Mrs|Dr|Prof)\.?\s+([A-Z][a-zA-Z\s.'-]+?)\s*\(([^)]+)\)"),
                rule(
                    r"(?i)([A-Z][a-zA-Z\s.'-]+?),?\s+(?:representative|delegate|ambassador)\s+(?:of|from)\s+([A-Z][a-zA-Z\s]+)",
                ),
            ],
            speaker_role: vec![
                rule(
                    r"(?i)(?:The\s+)?(Chair(?:man|woman|person)?|President|Vice[- ]?President|Rapporteur|Secretary|Secretary[- ]?General)\s+(?:noted|stated|said|presented|proposed|observed|announced|reported|explained|suggested|remarked|concluded|summarized)",
                ),
                rule(
                    r"(?i)(?:The\s+)?(Chair(?:man|woman|person)?|President|Rapporteur)\s+([A-Z][a-zA-Z\s.'-]+?)\s+(?:noted|stated|said|presented)",
                ),
            ],
            speaker_name: vec![rule(
                r"(?i)(?:Mr|Ms|Mrs|Dr|Prof)\.?\s+([A-Z][a-zA-Z\s.'-]{2,30}?)(?:\s+(?:said|stated|noted|proposed|remarked|observed|suggested|asked|responded|replied|emphasized|stressed|pointed out|indicated|explained))",
            )],
            member_state: vec![
                rule(
                    r"(?i)(?:The\s+)?(?:representative|delegate|delegation|ambassador)\s+(?:of|from)\s+([A-Z][a-zA-Z\s]+?)(?:\s+(?:stated|said|noted|proposed|emphasized|stressed|supported|opposed|requested|suggested|observed|remarked|indicated|expressed|highlighted|underlined|welcomed|regretted|agreed|disagreed))",
                ),
                rule(r"(?i)([A-Z][a-zA-Z\s]+?)(?:'s\s+(?:representative|delegate|delegation))"),
                rule(r"(?i)(?:submitted|proposed|tabled)\s+by\s+([A-Z][a-zA-Z\s]+)"),
            ],
            delegation: vec![
                rule(
                    r"(?i)(?:The\s+)?([A-Z][a-zA-Z\s]+?)\s+delegation(?:\s+(?:stated|said|noted|proposed|supported|opposed))?",
                ),
                rule(r"(?i)delegation\s+(?:of|from)\s+([A-Z][a-zA-Z\s]+)"),
            ],
            organization: vec![
                rule(
                    r"(?i)(?:The\s+)?([A-Z][a-zA-Z\s]+?)\s+(?:Commission|Council|Parliament|Committee|Secretariat|Agency|Bureau|Office|Department|Ministry|Authority)",
                ),
                rule(
                    r"(?i)(?:representative|observer)\s+(?:of|from)\s+(?:the\s+)?([A-Z][a-zA-Z\s]+?(?:\s+(?:Commission|Council|Organization|Association|Federation|Union|Agency)))",
                ),
            ],
            voting_record: vec![
                rule(
                    r"(?i)([A-Z][a-zA-Z\s]+?):\s*(?:For|Against|Abstain|In\s+favour|Not\s+voting|Absent)",
                ),
                rule(r"(?i)(?:Voted?\s+)?(For|Against|Abstain):\s+([A-Z][a-zA-Z\s,]+)"),
            ],
            document_author: vec![
                rule(r"(?i)(?:Submitted|Proposed|Tabled|Drafted|Prepared)\s+by[:\s]+([A-Z][a-zA-Z\s,]+)"),
                rule(r"(?i)Author[s]?[:\s]+([A-Z][a-zA-Z\s,]+)"),
                rule(r"(?i)(?:Co[- ]?)?Sponsor(?:ed)?(?:\s+by)?[:\s]+([A-Z][a-zA-Z\s,]+)"),
            ],
        }
    }
}

impl Default for EntityPatterns {
    fn default() -> Self {
        Self::compile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speaker_with_affiliation_captures_both_groups() {
        let patterns = EntityPatterns::compile();
        let caps = patterns.speaker_with_affiliation[0]
            .captures("Mr. Smith (France) opened the discussion")
            .unwrap();
        assert_eq!(caps[1].trim(), "Smith");
        assert_eq!(&caps[2], "France");
    }

    #[test]
    fn test_speaker_role_matches_chair_statement() {
        let patterns = EntityPatterns::compile();
        let caps = patterns.speaker_role[0]
            .captures("The Chair noted the quorum.")
            .unwrap();
        assert_eq!(&caps[1], "Chair");
    }

    #[test]
    fn test_member_state_capture_excludes_verb() {
        let patterns = EntityPatterns::compile();
        let caps = patterns.member_state[0]
            .captures("The representative of Germany stated that more time was needed.")
            .unwrap();
        assert_eq!(caps[1].trim(), "Germany");
    }

    #[test]
    fn test_voting_record_line() {
        let patterns = EntityPatterns::compile();
        let caps = patterns.voting_record[0].captures("France: For").unwrap();
        assert_eq!(caps[1].trim(), "France");
    }

    #[test]
    fn test_document_author_line() {
        let patterns = EntityPatterns::compile();
        let caps = patterns.document_author[0]
            .captures("Submitted by: France, Germany")
            .unwrap();
        assert_eq!(caps[1].trim(), "France, Germany");
    }
}
