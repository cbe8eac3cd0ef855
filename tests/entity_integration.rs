//! Integration tests for entity extraction and resolution
//!
//! Tests verify:
//! 1. Extraction over realistic minutes text against a seeded registry
//! 2. Context-sensitive disambiguation between homonymous participants
//! 3. Persisted entities are resolvable by a registry rebuilt from the
//!    target store (extraction closes the loop)
//! 4. Role resolution scoped to the current deliberation process

use reglink::{
    vocab, EntityContext, EntityExtractor, EntityRegistry, MemoryStore, MentionKind,
    StakeholderType, TripleStore,
};

const BASE: &str = "https://example.org/delib/";

/// A participant graph with two member states, one known speaker and a
/// chair role assignment.
fn participant_store() -> MemoryStore {
    let mut store = MemoryStore::new();

    store.add("ent:france", vocab::RDF_TYPE, vocab::CLASS_STAKEHOLDER);
    store.add("ent:france", vocab::RDFS_LABEL, "France");
    store.add("ent:france", vocab::PROP_STAKEHOLDER_TYPE, "member_state");

    store.add("ent:germany", vocab::RDF_TYPE, vocab::CLASS_STAKEHOLDER);
    store.add("ent:germany", vocab::RDFS_LABEL, "Germany");
    store.add("ent:germany", vocab::PROP_STAKEHOLDER_TYPE, "member_state");

    store.add("spk:keller", vocab::RDF_TYPE, vocab::CLASS_STAKEHOLDER);
    store.add("spk:keller", vocab::RDFS_LABEL, "Maria Keller");
    store.add("spk:keller", vocab::PROP_STAKEHOLDER_ALIAS, "Ms Keller");

    store.add("spk:keller", vocab::PROP_HAS_ROLE, "spk:keller:role");
    store.add("spk:keller:role", vocab::PROP_ROLE_NAME, "Chair");
    store.add("spk:keller:role", vocab::PROP_ROLE_SCOPE, "process:gdpr-review");

    store
}

const MINUTES: &str = "\
The Chair noted that the quorum was met. \
The representative of France stated that the compromise text was acceptable. \
The representative of Germany opposed the proposed timeline. \
Mr. Okafor (Nigeria) presented the observer statement. \
Against: France, Germany";

#[test]
fn test_extraction_over_minutes_text() {
    let store = participant_store();
    let extractor = EntityExtractor::new(&store, BASE);
    let context = EntityContext {
        process_uri: "process:gdpr-review".to_string(),
        ..Default::default()
    };

    let result = extractor.extract(MINUTES, &context);

    assert_eq!(
        result.resolved + result.unresolved,
        result.mentions.len()
    );

    // Known member states resolve to their registered identifiers.
    let resolved_uris: Vec<_> = result
        .mentions
        .iter()
        .filter_map(|m| m.resolved_uri.as_deref())
        .collect();
    assert!(resolved_uris.contains(&"ent:france"));
    assert!(resolved_uris.contains(&"ent:germany"));

    // The chair role resolves through the scoped role assignment.
    let chair = result
        .mentions
        .iter()
        .find(|m| m.kind == MentionKind::Role)
        .unwrap();
    assert_eq!(chair.resolved_uri.as_deref(), Some("spk:keller"));

    // The unknown speaker still gets a record with a constructed id.
    let okafor = result
        .speakers
        .iter()
        .find(|s| s.name == "Okafor")
        .unwrap();
    assert_eq!(okafor.uri, format!("{BASE}speaker:okafor"));
    assert_eq!(okafor.affiliation_name, "Nigeria");
}

#[test]
fn test_persisted_entities_resolve_on_rebuild() {
    let store = participant_store();
    let extractor = EntityExtractor::new(&store, BASE);
    let result = extractor.extract(MINUTES, &EntityContext::default());

    let mut target = MemoryStore::new();
    extractor.persist(&result, &mut target);

    // A registry built from the persisted graph knows the previously
    // unknown participants.
    let rebuilt = EntityRegistry::from_store(&target);
    let (okafor, confidence) = rebuilt
        .resolve("Mr. Okafor", &EntityContext::default())
        .unwrap();
    assert_eq!(okafor.uri, format!("{BASE}speaker:okafor"));
    assert_eq!(confidence, 1.0);

    let (nigeria, _) = rebuilt
        .resolve("Nigeria", &EntityContext::default())
        .unwrap();
    assert_eq!(nigeria.uri, format!("{BASE}stakeholder:nigeria"));
}

#[test]
fn test_persisted_stakeholder_types() {
    let store = participant_store();
    let extractor = EntityExtractor::new(&store, BASE);
    let result = extractor.extract(MINUTES, &EntityContext::default());

    let mut target = MemoryStore::new();
    extractor.persist(&result, &mut target);

    let nigeria = format!("{BASE}stakeholder:nigeria");
    let types = target.find(&nigeria, vocab::PROP_STAKEHOLDER_TYPE, "");
    assert_eq!(types.len(), 1);
    assert_eq!(
        StakeholderType::parse_label(&types[0].object),
        StakeholderType::MemberState
    );
}

#[test]
fn test_alias_registration_changes_resolution() {
    let store = participant_store();
    let mut extractor = EntityExtractor::new(&store, BASE);

    let before = extractor.extract(
        "The French Republic supported the amendment, tabled by French Republic",
        &EntityContext::default(),
    );
    assert!(before
        .mentions
        .iter()
        .all(|m| m.resolved_uri.as_deref() != Some("ent:france")));

    extractor
        .registry_mut()
        .add_alias("ent:france", "French Republic");

    let after = extractor.extract(
        "The amendment was tabled by French Republic",
        &EntityContext::default(),
    );
    assert!(after
        .mentions
        .iter()
        .any(|m| m.resolved_uri.as_deref() == Some("ent:france")));
}

#[test]
fn test_extraction_result_json_rendering() {
    let store = participant_store();
    let extractor = EntityExtractor::new(&store, BASE);
    let result = extractor.extract(MINUTES, &EntityContext::default());

    let json = result.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        value["mentions"].as_array().unwrap().len(),
        result.mentions.len()
    );
    assert_eq!(value["resolved"], result.resolved);
}
