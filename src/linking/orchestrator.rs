//! Linking orchestration
//!
//! Walks the text-bearing fields of a structured meeting or resolution,
//! scans and resolves every provision reference, appends the resulting
//! edges to a target store and updates the source record's
//! cross-reference lists in memory. Unresolved mentions are data, not
//! errors: they end up in the report's unresolved list so a caller can
//! apply its own acceptance threshold.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{LinkError, Result};
use crate::linking::resolver::ProvisionResolver;
use crate::linking::scanner::MentionScanner;
use crate::model::{AgendaItem, Meeting, Resolution};
use crate::store::{vocab, TripleStore};

/// Classification of a link between a deliberation record and a provision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    /// The provision was named directly in the text.
    Explicit,
    /// The provision was referenced indirectly.
    Implicit,
    /// The link was derived from other links.
    Inferred,
}

/// Which text-bearing field a reference was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkSource {
    AgendaTitle,
    AgendaDescription,
    Intervention,
    Decision,
    Motion,
    Notes,
    Recital,
    OperativeClause,
}

impl LinkSource {
    pub fn label(&self) -> &'static str {
        match self {
            LinkSource::AgendaTitle => "agenda_title",
            LinkSource::AgendaDescription => "agenda_description",
            LinkSource::Intervention => "intervention",
            LinkSource::Decision => "decision",
            LinkSource::Motion => "motion",
            LinkSource::Notes => "notes",
            LinkSource::Recital => "recital",
            LinkSource::OperativeClause => "operative_clause",
        }
    }
}

impl std::fmt::Display for LinkSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of resolving one provision mention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkResult {
    /// Resolved identifier of the provision.
    pub provision_uri: String,

    /// Original reference text.
    pub raw_text: String,

    /// Resolution confidence (0.0-1.0).
    pub confidence: f64,

    pub link_type: LinkType,

    /// Field the reference was found in.
    pub source: LinkSource,
}

/// Aggregate linking outcome for one meeting or resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkingReport {
    /// The meeting or resolution that was processed.
    pub subject_uri: String,

    /// Count of detected references (resolved + unresolved).
    pub total_references: usize,

    pub resolved_count: usize,

    pub unresolved_count: usize,

    /// All successful links.
    pub links: Vec<LinkResult>,

    /// Raw reference strings that could not be resolved.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved_references: Vec<String>,
}

impl LinkingReport {
    fn finalize(&mut self) {
        self.resolved_count = self.links.len();
        self.unresolved_count = self.unresolved_references.len();
        self.total_references = self.resolved_count + self.unresolved_count;
    }
}

/// Links meeting discussions and resolutions to provisions in a
/// regulation graph.
pub struct DeliberationLinker {
    scanner: MentionScanner,
    resolver: ProvisionResolver,
}

impl DeliberationLinker {
    /// Build a linker over a snapshot of `regulation_store`.
    /// `base_uri` prefixes constructed provision identifiers.
    pub fn new(regulation_store: &dyn TripleStore, base_uri: impl Into<String>) -> Self {
        Self {
            scanner: MentionScanner::new(),
            resolver: ProvisionResolver::new(regulation_store, base_uri),
        }
    }

    pub fn resolver(&self) -> &ProvisionResolver {
        &self.resolver
    }

    /// Find and link all provision references in a meeting.
    ///
    /// For every resolved mention, two edges are appended to `target`:
    /// provision discussed-at meeting, and agenda item discusses
    /// provision. The agenda item's `provisions_discussed` list is
    /// updated in memory (deduplicated, appended, never replaced).
    pub fn link_meeting_to_regulations(
        &self,
        meeting: &mut Meeting,
        target: &mut dyn TripleStore,
    ) -> Result<LinkingReport> {
        if meeting.uri.is_empty() {
            return Err(LinkError::MissingInput("meeting URI"));
        }

        let mut report = LinkingReport {
            subject_uri: meeting.uri.clone(),
            ..Default::default()
        };

        for item in &mut meeting.agenda_items {
            let (links, unresolved) = self.links_in_agenda_item(item);

            for link in links {
                target.add(&link.provision_uri, vocab::PROP_DISCUSSED_AT, &meeting.uri);
                target.add(&item.uri, vocab::PROP_DISCUSSES, &link.provision_uri);

                if !item.provisions_discussed.contains(&link.provision_uri) {
                    item.provisions_discussed.push(link.provision_uri.clone());
                }
                report.links.push(link);
            }

            report.unresolved_references.extend(unresolved);
        }

        report.finalize();
        info!(
            meeting = %meeting.uri,
            resolved = report.resolved_count,
            unresolved = report.unresolved_count,
            "linked meeting to regulations"
        );
        Ok(report)
    }

    /// Link a resolution's recitals and operative clauses to provisions.
    /// Each resolved mention appends one "resolution references
    /// provision" edge to `target`.
    pub fn link_resolution_to_regulations(
        &self,
        resolution: &Resolution,
        target: &mut dyn TripleStore,
    ) -> Result<LinkingReport> {
        if resolution.uri.is_empty() {
            return Err(LinkError::MissingInput("resolution URI"));
        }

        let mut report = LinkingReport {
            subject_uri: resolution.uri.clone(),
            ..Default::default()
        };

        let recitals = resolution
            .preamble
            .iter()
            .map(|r| (r.text.as_str(), LinkSource::Recital));
        let clauses = resolution
            .operative_clauses
            .iter()
            .map(|c| (c.text.as_str(), LinkSource::OperativeClause));

        for (text, source) in recitals.chain(clauses) {
            let (links, unresolved) = self.scan_field(text, source);
            for link in links {
                target.add(&resolution.uri, vocab::PROP_REFERENCES, &link.provision_uri);
                report.links.push(link);
            }
            report.unresolved_references.extend(unresolved);
        }

        report.finalize();
        info!(
            resolution = %resolution.uri,
            resolved = report.resolved_count,
            unresolved = report.unresolved_count,
            "linked resolution to regulations"
        );
        Ok(report)
    }

    /// Resolve a single reference string (acceptance policy applied).
    pub fn resolve_reference(&self, raw: &str) -> Result<String> {
        self.resolver.resolve_reference(raw)
    }

    /// All provisions referenced from an agenda item, deduplicated by
    /// identifier, order preserved.
    pub fn discussed_provisions(&self, item: &AgendaItem) -> Vec<String> {
        let (links, _) = self.links_in_agenda_item(item);
        let mut uris = Vec::new();
        for link in links {
            if !uris.contains(&link.provision_uri) {
                uris.push(link.provision_uri);
            }
        }
        uris
    }

    /// All meetings a provision was discussed at, per previously
    /// persisted edges.
    pub fn provision_meetings(&self, provision_uri: &str, store: &dyn TripleStore) -> Vec<String> {
        store
            .find(provision_uri, vocab::PROP_DISCUSSED_AT, "")
            .into_iter()
            .map(|t| t.object)
            .collect()
    }

    /// All provisions discussed at a meeting, combining the agenda-item
    /// edges with the inverse discussed-at direction, deduplicated.
    pub fn meeting_provisions(&self, meeting_uri: &str, store: &dyn TripleStore) -> Vec<String> {
        let mut provisions = Vec::new();

        for triple in store.find("", vocab::PROP_HAS_AGENDA_ITEM, "") {
            if triple.subject != meeting_uri && !triple.subject.contains(meeting_uri) {
                continue;
            }
            for discussed in store.find(&triple.object, vocab::PROP_DISCUSSES, "") {
                if !provisions.contains(&discussed.object) {
                    provisions.push(discussed.object);
                }
            }
        }

        for triple in store.find("", vocab::PROP_DISCUSSED_AT, meeting_uri) {
            if !provisions.contains(&triple.subject) {
                provisions.push(triple.subject);
            }
        }

        provisions
    }

    /// Extract and resolve references from every text field of an
    /// agenda item, deduplicating links by (provision, source).
    fn links_in_agenda_item(&self, item: &AgendaItem) -> (Vec<LinkResult>, Vec<String>) {
        let mut links = Vec::new();
        let mut unresolved = Vec::new();

        let mut collect = |text: &str, source: LinkSource| {
            let (found, missed) = self.scan_field(text, source);
            links.extend(found);
            unresolved.extend(missed);
        };

        collect(&item.title, LinkSource::AgendaTitle);
        collect(&item.description, LinkSource::AgendaDescription);
        for intervention in &item.interventions {
            collect(&intervention.summary, LinkSource::Intervention);
        }
        for decision in &item.decisions {
            collect(&decision.description, LinkSource::Decision);
        }
        for motion in &item.motions {
            collect(&motion.text, LinkSource::Motion);
        }
        collect(&item.notes, LinkSource::Notes);

        (dedup_links(links), dedup_strings(unresolved))
    }

    /// Scan one text field, classifying each mention as a link or an
    /// unresolved reference.
    fn scan_field(&self, text: &str, source: LinkSource) -> (Vec<LinkResult>, Vec<String>) {
        let mut links = Vec::new();
        let mut unresolved = Vec::new();

        for raw in self.scanner.scan(text) {
            match self.resolver.resolve(&raw.text) {
                Some((uri, confidence)) => links.push(LinkResult {
                    provision_uri: uri,
                    raw_text: raw.text,
                    confidence,
                    link_type: LinkType::Explicit,
                    source,
                }),
                None => {
                    debug!(reference = %raw.text, %source, "unresolved reference");
                    unresolved.push(raw.text);
                }
            }
        }

        (links, unresolved)
    }
}

/// Deduplicate by (provision, source), keeping the maximum confidence
/// observed for each pair. Output is sorted by that key so report
/// contents never depend on map iteration order.
fn dedup_links(links: Vec<LinkResult>) -> Vec<LinkResult> {
    let mut by_key: BTreeMap<(String, LinkSource), LinkResult> = BTreeMap::new();
    for link in links {
        let key = (link.provision_uri.clone(), link.source);
        match by_key.get_mut(&key) {
            Some(existing) if existing.confidence >= link.confidence => {}
            _ => {
                by_key.insert(key, link);
            }
        }
    }
    by_key.into_values().collect()
}

fn dedup_strings(strings: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(strings.len());
    for s in strings {
        if !out.contains(&s) {
            out.push(s);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(uri: &str, source: LinkSource, confidence: f64) -> LinkResult {
        LinkResult {
            provision_uri: uri.to_string(),
            raw_text: String::new(),
            confidence,
            link_type: LinkType::Explicit,
            source,
        }
    }

    #[test]
    fn test_dedup_keeps_maximum_confidence() {
        let deduped = dedup_links(vec![
            link("reg:Art6", LinkSource::Notes, 0.75),
            link("reg:Art6", LinkSource::Notes, 1.0),
            link("reg:Art6", LinkSource::Notes, 0.25),
        ]);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].confidence, 1.0);
    }

    #[test]
    fn test_dedup_keys_on_provision_and_source() {
        let deduped = dedup_links(vec![
            link("reg:Art6", LinkSource::AgendaTitle, 1.0),
            link("reg:Art6", LinkSource::Intervention, 1.0),
        ]);
        // Same provision from two fields is two links (provenance).
        assert_eq!(deduped.len(), 2);
    }

    #[test]
    fn test_dedup_output_is_sorted() {
        let deduped = dedup_links(vec![
            link("reg:Art17", LinkSource::Notes, 1.0),
            link("reg:Art6", LinkSource::Notes, 1.0),
        ]);
        assert_eq!(deduped[0].provision_uri, "reg:Art17");
        assert_eq!(deduped[1].provision_uri, "reg:Art6");
    }

    #[test]
    fn test_link_source_labels() {
        assert_eq!(LinkSource::AgendaTitle.to_string(), "agenda_title");
        assert_eq!(LinkSource::OperativeClause.to_string(), "operative_clause");
    }
}
