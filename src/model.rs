//! Structured deliberation records
//!
//! Typed views of the documents the linking engine walks: meetings with
//! their agenda items, interventions, decisions and motions, and formal
//! resolutions with recitals and operative clauses. Segmenting raw
//! minutes into these records happens upstream; this crate only reads
//! their text-bearing fields and appends to their cross-reference
//! lists.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Current state of a meeting in the deliberation process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    Postponed,
}

/// What happened with an agenda item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgendaItemOutcome {
    #[default]
    Pending,
    Discussed,
    Deferred,
    Decided,
    Withdrawn,
}

/// A deliberation meeting where provisions are discussed and decided.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meeting {
    /// Unique identifier in the knowledge graph.
    pub uri: String,

    /// Human-readable meeting identifier (e.g., "WG-2024-05").
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub identifier: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    /// Meeting series (e.g., "Working Group A", "Plenary").
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub series: String,

    /// Meeting number within its series (e.g., 43 for "43rd session").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    #[serde(default)]
    pub status: MeetingStatus,

    /// URI of the presiding officer.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub chair: String,

    /// URIs of attendees.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participants: Vec<String>,

    #[serde(default)]
    pub agenda_items: Vec<AgendaItem>,

    /// Parent deliberation process.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub process_uri: String,
}

/// A single item on a meeting agenda.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgendaItem {
    pub uri: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub number: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Free-text notes captured under this item.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,

    /// Parent meeting.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub meeting_uri: String,

    #[serde(default)]
    pub outcome: AgendaItemOutcome,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interventions: Vec<Intervention>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decisions: Vec<Decision>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub motions: Vec<Motion>,

    /// Provisions linked to this item, appended to (deduplicated) by
    /// the linking orchestrator.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provisions_discussed: Vec<String>,
}

/// A speaker intervention under an agenda item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Intervention {
    /// URI of the speaker, when known.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub speaker: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub speaker_name: String,

    pub summary: String,
}

/// A decision made under an agenda item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Decision {
    pub uri: String,
    pub description: String,
}

/// A motion or amendment proposed under an agenda item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Motion {
    pub uri: String,
    pub text: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub proposer: String,
}

/// A formal resolution with preamble and operative parts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resolution {
    pub uri: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub identifier: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    #[serde(default)]
    pub preamble: Vec<Recital>,

    #[serde(default)]
    pub operative_clauses: Vec<OperativeClause>,
}

/// A preambular recital ("Recalling...", "Noting...").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recital {
    pub number: u32,
    pub text: String,
}

/// An operative clause ("Decides...", "Requests...").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperativeClause {
    pub number: u32,
    pub text: String,
}

/// Classification of a non-individual participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakeholderType {
    MemberState,
    Delegation,
    Organization,
    PoliticalGroup,
    Committee,
    Secretariat,
    Observer,
    Individual,
}

impl StakeholderType {
    /// Stable label used in store edges and rendered output.
    pub fn label(&self) -> &'static str {
        match self {
            StakeholderType::MemberState => "member_state",
            StakeholderType::Delegation => "delegation",
            StakeholderType::Organization => "organization",
            StakeholderType::PoliticalGroup => "political_group",
            StakeholderType::Committee => "committee",
            StakeholderType::Secretariat => "secretariat",
            StakeholderType::Observer => "observer",
            StakeholderType::Individual => "individual",
        }
    }

    /// Parse a stored label. Unrecognized labels fall back to
    /// `Organization`, the catch-all stakeholder class.
    pub fn parse_label(s: &str) -> Self {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "member_state" | "memberstate" => StakeholderType::MemberState,
            "delegation" => StakeholderType::Delegation,
            "organization" | "org" => StakeholderType::Organization,
            "political_group" | "politicalgroup" => StakeholderType::PoliticalGroup,
            "committee" => StakeholderType::Committee,
            "secretariat" => StakeholderType::Secretariat,
            "observer" => StakeholderType::Observer,
            "individual" | "person" => StakeholderType::Individual,
            _ => StakeholderType::Organization,
        }
    }
}

impl std::fmt::Display for StakeholderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A role held by a speaker or stakeholder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// Role title (e.g., "Chair", "Rapporteur").
    pub role: String,

    /// Where the role applies (committee, working group, meeting).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scope: String,

    /// Parent deliberation process.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub process_uri: String,
}

/// A named individual who speaks in meetings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Speaker {
    pub uri: String,
    pub name: String,

    /// Alternative references (e.g., "Mr. Smith").
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    /// URI of the stakeholder this speaker belongs to.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub affiliation: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub affiliation_name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<RoleAssignment>,
}

/// A non-individual participant (member state, delegation, organization...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stakeholder {
    pub uri: String,
    pub name: String,

    #[serde(rename = "type")]
    pub kind: StakeholderType,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    /// URIs of member entities (for groups/coalitions).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,

    /// URI of the parent organization.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent_org: String,
}
