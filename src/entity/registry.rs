//! Entity registry and resolution
//!
//! A read-mostly snapshot of the speakers and stakeholders known to the
//! graph store, with an alias index for fast in-memory lookup in the
//! hot path. Resolution is graduated: exact alias match, then token-set
//! fuzzy match, then context-based disambiguation.
//!
//! The registry is shared, mutable state: concurrent resolution reads
//! are safe, but `add_alias`/`add_entity` mutations must be serialized
//! by the caller.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::entity::normalize::{match_key, normalize_role};
use crate::store::{vocab, TripleStore};

/// Whether a registered entity is an individual speaker or a
/// stakeholder-typed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityClass {
    Speaker,
    Stakeholder,
    Other,
}

/// A canonical entity held in the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedEntity {
    pub uri: String,
    pub name: String,
    pub class: EntityClass,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

/// Context available when resolving a mention.
#[derive(Debug, Clone, Default)]
pub struct EntityContext {
    /// The current meeting.
    pub meeting_uri: String,
    /// The parent deliberation process.
    pub process_uri: String,
}

/// A fuzzy candidate with its score.
#[derive(Debug, Clone)]
struct FuzzyCandidate {
    uri: String,
    score: f64,
}

/// A role assignment snapshotted from the store.
#[derive(Debug, Clone)]
struct RoleRecord {
    entity_uri: String,
    role_key: String,
    scopes: Vec<String>,
}

/// Fuzzy-match acceptance threshold on token-set similarity.
const FUZZY_THRESHOLD: f64 = 0.8;

/// Score boost for candidates that participated in the current meeting.
const CONTEXT_BOOST: f64 = 0.1;

/// Confidence for role-based resolution ("the Chair" -> a person).
const ROLE_CONFIDENCE: f64 = 0.9;

/// Registry of known speakers and stakeholders with alias lookup.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    /// Canonical identifier -> entity.
    entities: HashMap<String, ResolvedEntity>,

    /// Normalized alias -> canonical identifier. Many aliases may map
    /// to one entity.
    alias_index: HashMap<String, String>,

    /// Meeting identifier -> participant identifiers, snapshotted for
    /// context disambiguation.
    participants: HashMap<String, HashSet<String>>,

    /// Role assignments snapshotted for role resolution.
    roles: Vec<RoleRecord>,
}

impl EntityRegistry {
    /// Build a registry from a snapshot of the store: every
    /// stakeholder-typed record and every recorded speaker, with their
    /// labels and declared aliases, plus meeting participation and role
    /// assignments for disambiguation.
    pub fn from_store(store: &dyn TripleStore) -> Self {
        let mut registry = EntityRegistry::default();

        for triple in store.find("", vocab::RDF_TYPE, vocab::CLASS_STAKEHOLDER) {
            let uri = triple.subject;
            let mut entity = ResolvedEntity {
                uri: uri.clone(),
                name: String::new(),
                class: EntityClass::Stakeholder,
                aliases: Vec::new(),
            };

            if let Some(label) = store.find(&uri, vocab::RDFS_LABEL, "").into_iter().next() {
                registry.alias_index.insert(match_key(&label.object), uri.clone());
                entity.name = label.object;
            }
            for alias in store.find(&uri, vocab::PROP_STAKEHOLDER_ALIAS, "") {
                registry
                    .alias_index
                    .insert(match_key(&alias.object), uri.clone());
                entity.aliases.push(alias.object);
            }

            registry.entities.insert(uri, entity);
        }

        // Speakers recorded on interventions may not carry a
        // stakeholder record of their own.
        for triple in store.find("", vocab::PROP_SPEAKER, "") {
            let uri = triple.object;
            if registry.entities.contains_key(&uri) {
                continue;
            }
            let mut entity = ResolvedEntity {
                uri: uri.clone(),
                name: String::new(),
                class: EntityClass::Speaker,
                aliases: Vec::new(),
            };
            if let Some(label) = store.find(&uri, vocab::RDFS_LABEL, "").into_iter().next() {
                registry.alias_index.insert(match_key(&label.object), uri.clone());
                entity.name = label.object;
            }
            registry.entities.insert(uri, entity);
        }

        for triple in store.find("", vocab::PROP_PARTICIPANT, "") {
            registry
                .participants
                .entry(triple.subject)
                .or_default()
                .insert(triple.object);
        }

        for triple in store.find("", vocab::PROP_HAS_ROLE, "") {
            let role_uri = triple.object;
            let Some(name) = store
                .find(&role_uri, vocab::PROP_ROLE_NAME, "")
                .into_iter()
                .next()
            else {
                continue;
            };
            let scopes = store
                .find(&role_uri, vocab::PROP_ROLE_SCOPE, "")
                .into_iter()
                .map(|t| t.object)
                .collect();
            registry.roles.push(RoleRecord {
                entity_uri: triple.subject,
                role_key: normalize_role(&name.object),
                scopes,
            });
        }

        debug!(
            entities = registry.entities.len(),
            aliases = registry.alias_index.len(),
            roles = registry.roles.len(),
            "entity registry loaded"
        );
        registry
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entity(&self, uri: &str) -> Option<&ResolvedEntity> {
        self.entities.get(uri)
    }

    /// Resolve a mention to a known entity.
    ///
    /// 1. Exact alias lookup on the normalized mention: confidence 1.0.
    /// 2. Fuzzy token-set lookup at threshold 0.8.
    /// 3. A single surviving candidate wins with its score; several
    ///    survivors are disambiguated by meeting participation
    ///    (+0.1 boost, then re-ranked).
    pub fn resolve(&self, mention: &str, context: &EntityContext) -> Option<(ResolvedEntity, f64)> {
        let key = match_key(mention);
        if key.is_empty() {
            return None;
        }

        if let Some(uri) = self.alias_index.get(&key) {
            return self.entities.get(uri).map(|e| (e.clone(), 1.0));
        }

        let mut candidates = self.fuzzy_match(&key, FUZZY_THRESHOLD);
        match candidates.len() {
            0 => None,
            1 => {
                let c = &candidates[0];
                self.entities.get(&c.uri).map(|e| (e.clone(), c.score))
            }
            _ => {
                self.boost_participants(&mut candidates, context);
                sort_candidates(&mut candidates, &key, self);
                let best = &candidates[0];
                // A boosted score stays a confidence, capped at certain.
                self.entities
                    .get(&best.uri)
                    .map(|e| (e.clone(), best.score.min(1.0)))
            }
        }
    }

    /// Resolve a role reference ("the Chair") to the person holding
    /// that role in the current meeting or process. Matches return
    /// confidence 0.9.
    pub fn resolve_role(&self, role: &str, context: &EntityContext) -> Option<(ResolvedEntity, f64)> {
        let role_key = normalize_role(role);
        if role_key.is_empty() {
            return None;
        }

        for record in &self.roles {
            if record.role_key != role_key {
                continue;
            }
            let in_scope = record
                .scopes
                .iter()
                .any(|s| s == &context.process_uri || s == &context.meeting_uri);
            if !in_scope {
                continue;
            }
            if let Some(entity) = self.entities.get(&record.entity_uri) {
                return Some((entity.clone(), ROLE_CONFIDENCE));
            }
        }

        None
    }

    /// Register an additional alias for a known entity. Later mentions
    /// in the same document then resolve exactly.
    pub fn add_alias(&mut self, uri: &str, alias: &str) {
        self.alias_index.insert(match_key(alias), uri.to_string());
        if let Some(entity) = self.entities.get_mut(uri) {
            entity.aliases.push(alias.to_string());
        }
    }

    /// Register a new entity with all its aliases.
    pub fn add_entity(&mut self, entity: ResolvedEntity) {
        self.alias_index
            .insert(match_key(&entity.name), entity.uri.clone());
        for alias in &entity.aliases {
            self.alias_index.insert(match_key(alias), entity.uri.clone());
        }
        self.entities.insert(entity.uri.clone(), entity);
    }

    /// All aliases at or above `threshold` token-set similarity,
    /// deduplicated by entity (keeping each entity's best score).
    fn fuzzy_match(&self, key: &str, threshold: f64) -> SmallVec<[FuzzyCandidate; 8]> {
        let mut best_by_uri: HashMap<&str, f64> = HashMap::new();

        for (alias, uri) in &self.alias_index {
            let score = crate::entity::normalize::token_set_similarity(key, alias);
            if score >= threshold {
                let entry = best_by_uri.entry(uri.as_str()).or_insert(0.0);
                if score > *entry {
                    *entry = score;
                }
            }
        }

        let mut candidates: SmallVec<[FuzzyCandidate; 8]> = best_by_uri
            .into_iter()
            .map(|(uri, score)| FuzzyCandidate {
                uri: uri.to_string(),
                score,
            })
            .collect();
        sort_candidates(&mut candidates, key, self);
        candidates
    }

    fn boost_participants(&self, candidates: &mut [FuzzyCandidate], context: &EntityContext) {
        let Some(attendees) = self.participants.get(&context.meeting_uri) else {
            return;
        };
        for candidate in candidates.iter_mut() {
            if attendees.contains(&candidate.uri) {
                candidate.score += CONTEXT_BOOST;
            }
        }
    }
}

/// Order candidates by score descending with deterministic tie-breaks:
/// Jaro-Winkler proximity of the canonical name to the mention, then
/// identifier. Registry iteration order never leaks into results.
fn sort_candidates(candidates: &mut [FuzzyCandidate], key: &str, registry: &EntityRegistry) {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                let jw = |c: &FuzzyCandidate| {
                    registry
                        .entity(&c.uri)
                        .map(|e| strsim::jaro_winkler(&match_key(&e.name), key))
                        .unwrap_or(0.0)
                };
                jw(b).partial_cmp(&jw(a)).unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.uri.cmp(&b.uri))
    });
}
