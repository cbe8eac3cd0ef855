//! Graph store boundary
//!
//! The linking engine reads from and writes to an append-only,
//! pattern-queryable edge database. Only the boundary is defined here:
//! a `find` that treats an empty string as a wildcard in any position,
//! and an `add` that appends a single edge. No removal or update is
//! ever performed by this crate.
//!
//! [`MemoryStore`] is the in-process reference implementation used by
//! tests and small pipelines; production deployments supply their own
//! [`TripleStore`] behind the same trait.

use serde::{Deserialize, Serialize};

/// Vocabulary used by the linking engine when querying and appending edges.
pub mod vocab {
    pub const RDF_TYPE: &str = "rdf:type";
    pub const RDFS_LABEL: &str = "rdfs:label";

    // Provision classes
    pub const CLASS_CHAPTER: &str = "reg:Chapter";
    pub const CLASS_SECTION: &str = "reg:Section";
    pub const CLASS_ARTICLE: &str = "reg:Article";
    pub const CLASS_PARAGRAPH: &str = "reg:Paragraph";
    pub const CLASS_POINT: &str = "reg:Point";

    // Deliberation classes
    pub const CLASS_MEETING: &str = "reg:Meeting";
    pub const CLASS_STAKEHOLDER: &str = "reg:Stakeholder";

    // Provision properties
    pub const PROP_NUMBER: &str = "reg:number";
    pub const PROP_REFERENCES: &str = "reg:references";

    // Deliberation properties
    pub const PROP_HAS_AGENDA_ITEM: &str = "reg:hasAgendaItem";
    pub const PROP_DISCUSSED_AT: &str = "reg:discussedAt";
    pub const PROP_DISCUSSES: &str = "reg:discusses";
    pub const PROP_PARTICIPANT: &str = "reg:participant";
    pub const PROP_SPEAKER: &str = "reg:speaker";
    pub const PROP_STAKEHOLDER_TYPE: &str = "reg:stakeholderType";
    pub const PROP_STAKEHOLDER_ALIAS: &str = "reg:stakeholderAlias";
    pub const PROP_HAS_ROLE: &str = "reg:hasRole";
    pub const PROP_ROLE_NAME: &str = "reg:roleName";
    pub const PROP_ROLE_SCOPE: &str = "reg:roleScope";
    pub const PROP_MEMBER_OF: &str = "reg:memberOf";
}

/// A single subject-predicate-object edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triple {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// Pattern-match interface to the graph store.
///
/// `find` returns matching edges in a stable order; an empty string in
/// any position matches anything in that position. `add` appends one
/// edge; implementations are expected to be idempotent for exact
/// duplicates. Edges appended through this interface form an audit
/// trail and are never removed by the linking engine.
pub trait TripleStore {
    fn find(&self, subject: &str, predicate: &str, object: &str) -> Vec<Triple>;

    fn add(&mut self, subject: &str, predicate: &str, object: &str);
}

/// Insertion-ordered in-memory store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    triples: Vec<Triple>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    fn contains(&self, subject: &str, predicate: &str, object: &str) -> bool {
        self.triples
            .iter()
            .any(|t| t.subject == subject && t.predicate == predicate && t.object == object)
    }
}

impl TripleStore for MemoryStore {
    fn find(&self, subject: &str, predicate: &str, object: &str) -> Vec<Triple> {
        self.triples
            .iter()
            .filter(|t| {
                (subject.is_empty() || t.subject == subject)
                    && (predicate.is_empty() || t.predicate == predicate)
                    && (object.is_empty() || t.object == object)
            })
            .cloned()
            .collect()
    }

    fn add(&mut self, subject: &str, predicate: &str, object: &str) {
        // Empty components are not storable patterns, only query wildcards.
        if subject.is_empty() || predicate.is_empty() || object.is_empty() {
            return;
        }
        if self.contains(subject, predicate, object) {
            return;
        }
        self.triples.push(Triple::new(subject, predicate, object));
    }
}
