//! Entity extraction from deliberation text
//!
//! Runs the entity rule families over minutes text, resolves each
//! mention against the registry, and emits best-effort speaker and
//! stakeholder records whether or not resolution succeeded. Constructed
//! identifiers are derived deterministically from the normalized name,
//! so repeated runs over the same text against an unchanged registry
//! produce identical results.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::normalize::{
    is_likely_country_name, is_likely_person_name, is_plausible_state_name, is_vote_position,
    normalize_name, normalize_role, slug,
};
use crate::entity::patterns::{EntityPatterns, MentionKind};
use crate::entity::registry::{EntityContext, EntityRegistry};
use crate::error::Result;
use crate::model::{RoleAssignment, Speaker, Stakeholder, StakeholderType};
use crate::store::{vocab, TripleStore};

/// Characters of surrounding text captured for disambiguation.
const CONTEXT_WINDOW: usize = 50;

/// An entity mention found in text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityMention {
    /// Original mention text.
    pub text: String,

    /// Normalized form.
    pub normalized: String,

    /// Meeting where the mention occurred.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub meeting_uri: String,

    /// Character offset in the source text.
    pub source_offset: usize,

    /// Surrounding text for disambiguation.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub context: String,

    /// Inferred entity type.
    pub kind: MentionKind,

    /// Identifier if resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_uri: Option<String>,

    /// Resolution confidence (0.0-1.0); 0.0 when unresolved.
    pub confidence: f64,
}

impl EntityMention {
    pub fn is_resolved(&self) -> bool {
        self.resolved_uri.is_some()
    }
}

/// Results of one extraction pass over a text span.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub speakers: Vec<Speaker>,
    pub stakeholders: Vec<Stakeholder>,

    /// Every mention found, resolved or not.
    pub mentions: Vec<EntityMention>,

    pub resolved: usize,
    pub unresolved: usize,
}

impl ExtractionResult {
    /// All mentions that could not be resolved against the registry.
    pub fn unresolved_mentions(&self) -> Vec<&EntityMention> {
        self.mentions.iter().filter(|m| !m.is_resolved()).collect()
    }

    /// Pretty-printed JSON rendering, consumable by downstream
    /// reporting components.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Extracts speakers and stakeholders from deliberation text.
pub struct EntityExtractor {
    base_uri: String,
    patterns: EntityPatterns,
    registry: EntityRegistry,
}

impl EntityExtractor {
    /// Build an extractor whose registry is snapshotted from `store`.
    /// `base_uri` prefixes constructed entity identifiers.
    pub fn new(store: &dyn TripleStore, base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            patterns: EntityPatterns::compile(),
            registry: EntityRegistry::from_store(store),
        }
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Mutable registry access for runtime alias registration. Callers
    /// in concurrent settings must serialize these mutations.
    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    /// Extract all entities from a text span. Every rule family runs
    /// independently; results are deduplicated by identifier.
    pub fn extract(&self, text: &str, context: &EntityContext) -> ExtractionResult {
        let mut result = ExtractionResult::default();

        self.extract_speakers_with_affiliation(text, context, &mut result);
        self.extract_role_speakers(text, context, &mut result);
        self.extract_named_speakers(text, context, &mut result);
        self.extract_member_states(text, context, &mut result);
        self.extract_delegations(text, context, &mut result);
        self.extract_organizations(text, context, &mut result);
        self.extract_from_voting_records(text, context, &mut result);
        self.extract_document_authors(text, context, &mut result);

        result.speakers = dedup_by_uri(result.speakers, |s| &s.uri);
        result.stakeholders = dedup_by_uri(result.stakeholders, |s| &s.uri);

        result.resolved = result.mentions.iter().filter(|m| m.is_resolved()).count();
        result.unresolved = result.mentions.len() - result.resolved;

        debug!(
            mentions = result.mentions.len(),
            resolved = result.resolved,
            "entity extraction pass complete"
        );
        result
    }

    /// Append extracted entities to the store as stakeholder records
    /// with type, label, membership, alias and role edges.
    pub fn persist(&self, result: &ExtractionResult, store: &mut dyn TripleStore) {
        for speaker in &result.speakers {
            store.add(&speaker.uri, vocab::RDF_TYPE, vocab::CLASS_STAKEHOLDER);
            store.add(
                &speaker.uri,
                vocab::PROP_STAKEHOLDER_TYPE,
                StakeholderType::Individual.label(),
            );
            store.add(&speaker.uri, vocab::RDFS_LABEL, &speaker.name);

            if !speaker.affiliation.is_empty() {
                store.add(&speaker.uri, vocab::PROP_MEMBER_OF, &speaker.affiliation);
            }
            for alias in &speaker.aliases {
                store.add(&speaker.uri, vocab::PROP_STAKEHOLDER_ALIAS, alias);
            }
            for role in &speaker.roles {
                let role_uri = format!("{}:role", speaker.uri);
                store.add(&speaker.uri, vocab::PROP_HAS_ROLE, &role_uri);
                store.add(&role_uri, vocab::PROP_ROLE_NAME, &role.role);
                if !role.scope.is_empty() {
                    store.add(&role_uri, vocab::PROP_ROLE_SCOPE, &role.scope);
                }
            }
        }

        for stakeholder in &result.stakeholders {
            store.add(&stakeholder.uri, vocab::RDF_TYPE, vocab::CLASS_STAKEHOLDER);
            store.add(
                &stakeholder.uri,
                vocab::PROP_STAKEHOLDER_TYPE,
                stakeholder.kind.label(),
            );
            store.add(&stakeholder.uri, vocab::RDFS_LABEL, &stakeholder.name);

            if !stakeholder.parent_org.is_empty() {
                store.add(&stakeholder.uri, vocab::PROP_MEMBER_OF, &stakeholder.parent_org);
            }
            for alias in &stakeholder.aliases {
                store.add(&stakeholder.uri, vocab::PROP_STAKEHOLDER_ALIAS, alias);
            }
            for member in &stakeholder.members {
                store.add(member, vocab::PROP_MEMBER_OF, &stakeholder.uri);
            }
        }
    }

    /// "Mr. Smith (France) said..." -> a speaker plus the affiliated
    /// stakeholder.
    fn extract_speakers_with_affiliation(
        &self,
        text: &str,
        context: &EntityContext,
        result: &mut ExtractionResult,
    ) {
        for pattern in &self.patterns.speaker_with_affiliation {
            for caps in pattern.captures_iter(text) {
                let (Some(whole), Some(name), Some(affiliation)) =
                    (caps.get(0), caps.get(1), caps.get(2))
                else {
                    continue;
                };

                let mention = self.make_mention(
                    whole.as_str(),
                    name.as_str(),
                    whole.start(),
                    MentionKind::Speaker,
                    text,
                    context,
                );

                let speaker_uri = mention
                    .resolved_uri
                    .clone()
                    .unwrap_or_else(|| self.speaker_uri(name.as_str()));
                result.speakers.push(Speaker {
                    uri: speaker_uri,
                    name: normalize_name(name.as_str()),
                    affiliation: self.stakeholder_uri(affiliation.as_str()),
                    affiliation_name: normalize_name(affiliation.as_str()),
                    ..Default::default()
                });

                result.stakeholders.push(Stakeholder {
                    uri: self.stakeholder_uri(affiliation.as_str()),
                    name: normalize_name(affiliation.as_str()),
                    kind: self.infer_stakeholder_type(affiliation.as_str()),
                    aliases: Vec::new(),
                    members: Vec::new(),
                    parent_org: String::new(),
                });

                result.mentions.push(mention);
            }
        }
    }

    /// "The Chair noted...", "The Rapporteur Keller presented..."
    fn extract_role_speakers(
        &self,
        text: &str,
        context: &EntityContext,
        result: &mut ExtractionResult,
    ) {
        for pattern in &self.patterns.speaker_role {
            for caps in pattern.captures_iter(text) {
                let (Some(whole), Some(role)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };

                let mut mention = EntityMention {
                    text: whole.as_str().to_string(),
                    normalized: normalize_role(role.as_str()),
                    meeting_uri: context.meeting_uri.clone(),
                    source_offset: whole.start(),
                    context: String::new(),
                    kind: MentionKind::Role,
                    resolved_uri: None,
                    confidence: 0.0,
                };

                if let Some((entity, confidence)) =
                    self.registry.resolve_role(role.as_str(), context)
                {
                    mention.resolved_uri = Some(entity.uri);
                    mention.confidence = confidence;
                }

                result.mentions.push(mention);

                // The second rule form also captures the officer's name.
                if let Some(name) = caps.get(2) {
                    result.speakers.push(Speaker {
                        uri: self.speaker_uri(name.as_str()),
                        name: normalize_name(name.as_str()),
                        roles: vec![RoleAssignment {
                            role: normalize_role(role.as_str()),
                            scope: String::new(),
                            process_uri: context.process_uri.clone(),
                        }],
                        ..Default::default()
                    });
                }
            }
        }
    }

    /// "Ms Keller stated..." -> a named speaker.
    fn extract_named_speakers(
        &self,
        text: &str,
        context: &EntityContext,
        result: &mut ExtractionResult,
    ) {
        for pattern in &self.patterns.speaker_name {
            for caps in pattern.captures_iter(text) {
                let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };

                let mention = self.make_mention(
                    whole.as_str(),
                    name.as_str(),
                    whole.start(),
                    MentionKind::Speaker,
                    text,
                    context,
                );

                let uri = mention
                    .resolved_uri
                    .clone()
                    .unwrap_or_else(|| self.speaker_uri(name.as_str()));
                result.speakers.push(Speaker {
                    uri,
                    name: normalize_name(name.as_str()),
                    ..Default::default()
                });

                result.mentions.push(mention);
            }
        }
    }

    fn extract_member_states(
        &self,
        text: &str,
        context: &EntityContext,
        result: &mut ExtractionResult,
    ) {
        for pattern in &self.patterns.member_state {
            for caps in pattern.captures_iter(text) {
                let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                let state = name.as_str().trim();
                if !is_plausible_state_name(state) {
                    continue;
                }

                self.push_stakeholder_mention(
                    whole.as_str(),
                    state,
                    whole.start(),
                    MentionKind::MemberState,
                    StakeholderType::MemberState,
                    text,
                    context,
                    result,
                );
            }
        }
    }

    fn extract_delegations(
        &self,
        text: &str,
        context: &EntityContext,
        result: &mut ExtractionResult,
    ) {
        for pattern in &self.patterns.delegation {
            for caps in pattern.captures_iter(text) {
                let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                let delegation = name.as_str().trim();
                if !is_plausible_state_name(delegation) {
                    continue;
                }

                self.push_stakeholder_mention(
                    whole.as_str(),
                    delegation,
                    whole.start(),
                    MentionKind::Delegation,
                    StakeholderType::Delegation,
                    text,
                    context,
                    result,
                );
            }
        }
    }

    fn extract_organizations(
        &self,
        text: &str,
        context: &EntityContext,
        result: &mut ExtractionResult,
    ) {
        for pattern in &self.patterns.organization {
            for caps in pattern.captures_iter(text) {
                let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                let org = name.as_str().trim();
                if org.len() < 3 {
                    continue;
                }

                self.push_stakeholder_mention(
                    whole.as_str(),
                    org,
                    whole.start(),
                    MentionKind::Organization,
                    StakeholderType::Organization,
                    text,
                    context,
                    result,
                );
            }
        }
    }

    /// "France: For" and "Against: Germany, Italy" lines.
    fn extract_from_voting_records(
        &self,
        text: &str,
        context: &EntityContext,
        result: &mut ExtractionResult,
    ) {
        for pattern in &self.patterns.voting_record {
            for caps in pattern.captures_iter(text) {
                let Some(whole) = caps.get(0) else { continue };

                // Capture groups differ between the two rule forms:
                // the position keyword may come first.
                let names = match (caps.get(1), caps.get(2)) {
                    (Some(first), Some(second)) if is_vote_position(first.as_str()) => {
                        second.as_str()
                    }
                    (Some(first), _) => first.as_str(),
                    _ => continue,
                };

                for name in names.split(',') {
                    let name = name.trim();
                    if name.is_empty() || !is_plausible_state_name(name) {
                        continue;
                    }

                    self.push_stakeholder_mention(
                        name,
                        name,
                        whole.start(),
                        MentionKind::MemberState,
                        StakeholderType::MemberState,
                        text,
                        context,
                        result,
                    );
                }
            }
        }
    }

    /// "Submitted by: ...", "Sponsors: ..." lines; entries may be
    /// either people or organizations.
    fn extract_document_authors(
        &self,
        text: &str,
        context: &EntityContext,
        result: &mut ExtractionResult,
    ) {
        for pattern in &self.patterns.document_author {
            for caps in pattern.captures_iter(text) {
                let (Some(whole), Some(authors)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };

                for author in authors.as_str().split(',') {
                    let author = author.trim();
                    if author.is_empty() {
                        continue;
                    }

                    let kind = if is_likely_person_name(author) {
                        MentionKind::Speaker
                    } else {
                        MentionKind::Stakeholder
                    };
                    let mention = self.make_mention(
                        author,
                        author,
                        whole.start(),
                        kind,
                        text,
                        context,
                    );

                    if is_likely_person_name(author) {
                        let uri = mention
                            .resolved_uri
                            .clone()
                            .unwrap_or_else(|| self.speaker_uri(author));
                        result.speakers.push(Speaker {
                            uri,
                            name: normalize_name(author),
                            ..Default::default()
                        });
                    } else {
                        let uri = mention
                            .resolved_uri
                            .clone()
                            .unwrap_or_else(|| self.stakeholder_uri(author));
                        result.stakeholders.push(Stakeholder {
                            uri,
                            name: normalize_name(author),
                            kind: self.infer_stakeholder_type(author),
                            aliases: Vec::new(),
                            members: Vec::new(),
                            parent_org: String::new(),
                        });
                    }

                    result.mentions.push(mention);
                }
            }
        }
    }

    /// Build a mention with its context window and attempt resolution.
    fn make_mention(
        &self,
        matched: &str,
        name: &str,
        offset: usize,
        kind: MentionKind,
        text: &str,
        context: &EntityContext,
    ) -> EntityMention {
        let mut mention = EntityMention {
            text: matched.to_string(),
            normalized: normalize_name(name),
            meeting_uri: context.meeting_uri.clone(),
            source_offset: offset,
            context: context_window(text, offset, offset + matched.len()),
            kind,
            resolved_uri: None,
            confidence: 0.0,
        };

        if let Some((entity, confidence)) = self.registry.resolve(name, context) {
            mention.resolved_uri = Some(entity.uri);
            mention.confidence = confidence;
        }

        mention
    }

    /// Emit a stakeholder mention plus its best-effort record.
    #[allow(clippy::too_many_arguments)]
    fn push_stakeholder_mention(
        &self,
        matched: &str,
        name: &str,
        offset: usize,
        kind: MentionKind,
        stakeholder_kind: StakeholderType,
        text: &str,
        context: &EntityContext,
        result: &mut ExtractionResult,
    ) {
        let mention = self.make_mention(matched, name, offset, kind, text, context);

        let uri = mention
            .resolved_uri
            .clone()
            .unwrap_or_else(|| self.stakeholder_uri(name));
        result.stakeholders.push(Stakeholder {
            uri,
            name: normalize_name(name),
            kind: stakeholder_kind,
            aliases: Vec::new(),
            members: Vec::new(),
            parent_org: String::new(),
        });

        result.mentions.push(mention);
    }

    /// Deterministic constructed identifier for an unregistered speaker.
    fn speaker_uri(&self, name: &str) -> String {
        format!("{}speaker:{}", self.base_uri, slug(name))
    }

    /// Deterministic constructed identifier for an unregistered stakeholder.
    fn stakeholder_uri(&self, name: &str) -> String {
        format!("{}stakeholder:{}", self.base_uri, slug(name))
    }

    /// Infer the stakeholder type from its name, most specific keyword
    /// first.
    fn infer_stakeholder_type(&self, name: &str) -> StakeholderType {
        let lower = name.to_lowercase();

        if lower.contains("secretariat") {
            return StakeholderType::Secretariat;
        }
        if lower.contains("committee") {
            return StakeholderType::Committee;
        }
        if lower.contains("delegation") {
            return StakeholderType::Delegation;
        }
        if lower.contains("group") {
            return StakeholderType::PoliticalGroup;
        }
        if lower.contains("observer") {
            return StakeholderType::Observer;
        }
        if lower.contains("commission") || lower.contains("council") || lower.contains("parliament")
        {
            return StakeholderType::Organization;
        }
        if is_likely_country_name(name) {
            return StakeholderType::MemberState;
        }

        StakeholderType::Organization
    }
}

/// Extract a window of surrounding text, clamped to char boundaries.
fn context_window(text: &str, start: usize, end: usize) -> String {
    let mut from = start.saturating_sub(CONTEXT_WINDOW);
    while from > 0 && !text.is_char_boundary(from) {
        from -= 1;
    }
    let mut to = (end + CONTEXT_WINDOW).min(text.len());
    while to < text.len() && !text.is_char_boundary(to) {
        to += 1;
    }
    text[from..to].to_string()
}

/// Deduplicate records by identifier, preserving first-seen order.
fn dedup_by_uri<T, F>(items: Vec<T>, uri_of: F) -> Vec<T>
where
    F: Fn(&T) -> &String,
{
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(uri_of(item).clone()))
        .collect()
}
