// Copyright 2025 Cowboy AI, LLC.

use std::path::PathBuf;

use cim_necessity::{
    different_concepts_count, ConceptHierarchy, ConceptId, Hierarchy, HierarchyDocument,
    HierarchyIndex, SimilarityError,
};
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("demos")
        .join("data")
        .join(name)
}

fn id(s: &str) -> ConceptId {
    ConceptId::new(s)
}

#[test]
fn loads_demo_hierarchies() {
    let zoology = ConceptHierarchy::load(fixture("zoology.json")).unwrap();
    let household = ConceptHierarchy::load(fixture("household.json")).unwrap();
    assert_eq!(zoology.len(), 9);
    assert_eq!(household.len(), 9);

    let zoology = HierarchyIndex::prepare(&zoology).unwrap();
    let household = HierarchyIndex::prepare(&household).unwrap();

    let roots: Vec<_> = household.roots().iter().map(|c| c.as_str()).collect();
    assert_eq!(
        roots,
        vec!["http://example.org/home#Animal", "http://example.org/home#Appliance"]
    );
    assert_eq!(zoology.roots().len(), 1);

    // Animal, Mammal, Dog, Cat and Cow appear on both sides.
    assert_eq!(different_concepts_count(&zoology, &household).unwrap(), 8);
}

#[test]
fn labels_fall_back_to_local_names() {
    let household = ConceptHierarchy::load(fixture("household.json")).unwrap();
    let index = HierarchyIndex::prepare(&household).unwrap();
    assert_eq!(index.label(&id("http://example.org/home#Dog")).unwrap(), "Dog");
    assert_eq!(
        index.label(&id("http://example.org/home#Fridge")).unwrap(),
        "Refrigerator"
    );
    assert_eq!(
        index.find_by_label("dog"),
        Some(&id("http://example.org/home#Dog"))
    );
}

#[test]
fn shortest_route_prefers_the_lighter_branch() {
    let zoology = ConceptHierarchy::load(fixture("zoology.json")).unwrap();
    let index = HierarchyIndex::prepare(&zoology).unwrap();

    assert_eq!(
        index.necessity_degree(&id("zoo:Dog"), &id("zoo:Mammal")).unwrap(),
        0.5
    );
    let table = index.path_table(&id("zoo:Dog")).unwrap();
    assert_eq!(table.distance_to(&id("zoo:Animal")).unwrap(), 3.0);
    assert_eq!(
        table.path_to(&id("zoo:Animal")).unwrap(),
        &[id("zoo:Dog"), id("zoo:Carnivore"), id("zoo:Animal")]
    );
}

#[test]
fn save_then_load_preserves_the_hierarchy() {
    let original = ConceptHierarchy::load(fixture("zoology.json")).unwrap();
    let path = std::env::temp_dir().join(format!("cim-necessity-{}.json", std::process::id()));
    original.save(&path).unwrap();
    let reloaded = ConceptHierarchy::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(
        HierarchyDocument::from_hierarchy(&reloaded),
        HierarchyDocument::from_hierarchy(&original)
    );
    assert_eq!(
        reloaded.direct_parents(&id("zoo:Eagle")),
        vec![id("zoo:Bird"), id("zoo:Carnivore")]
    );
}

#[test]
fn missing_file_is_an_io_error() {
    let err = ConceptHierarchy::load(fixture("does-not-exist.json")).unwrap_err();
    assert!(matches!(err, SimilarityError::Io(_)));
}

#[test]
fn malformed_document_is_a_serialization_error() {
    let err = ConceptHierarchy::from_json(r#"{ "name": "broken", "concepts": 7 }"#).unwrap_err();
    assert!(matches!(err, SimilarityError::Serialization(_)));
}
