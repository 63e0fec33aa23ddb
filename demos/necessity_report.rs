// Copyright 2025 Cowboy AI, LLC.

//! Necessity Report Demo
//!
//! Loads two hierarchy documents and prints:
//! - necessity degrees of every subclass-of relation
//! - ancestor sets and the edges of the necessity graph
//! - shortest necessary paths from each concept to its roots
//! - one pairwise simNec and the ontology-level simNecOnto, with timings
//!
//! Usage: `cargo run --example necessity_report [first.json second.json]`

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use cim_necessity::{
    ConceptHierarchy, ConceptId, HierarchyIndex, NecessitySimilarity, SimilarityConfig,
};

fn default_fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("demos")
        .join("data")
        .join(name)
}

fn load(path: &PathBuf) -> anyhow::Result<HierarchyIndex> {
    let hierarchy = ConceptHierarchy::load(path)
        .with_context(|| format!("loading {}", path.display()))?;
    Ok(HierarchyIndex::prepare(&hierarchy)?)
}

fn print_structure(index: &HierarchyIndex) -> anyhow::Result<()> {
    println!("=== {} ===\n", index.name());

    println!("Necessity degrees:");
    for relation in index.necessity_degrees() {
        println!(
            "   {} ⊑ {}  degree {:.3} (distance {})",
            index.label(&relation.sub)?,
            index.label(&relation.parent)?,
            relation.degree,
            relation.distance
        );
    }

    println!("\nAncestors:");
    for (concept, ancestors) in index.ancestor_map() {
        let labels = ancestors
            .iter()
            .map(|a| index.label(a).map(str::to_string))
            .collect::<Result<Vec<_>, _>>()?;
        println!("   {}: {:?}", index.label(concept)?, labels);
    }

    println!("\nGraph edges:");
    for concept in index.concepts() {
        for parent in index.parents(concept)? {
            println!("   {} -> {}", concept, parent);
        }
    }

    println!("\nShortest necessary paths to roots:");
    for concept in index.concepts() {
        for (root, path) in index.paths_to_roots(concept)? {
            let steps = path
                .path
                .iter()
                .map(|c| index.label(c).map(str::to_string))
                .collect::<Result<Vec<_>, _>>()?;
            println!(
                "   {} => {} : {} (distance {})",
                index.label(concept)?,
                index.label(root)?,
                steps.join(" → "),
                path.distance
            );
        }
    }
    println!();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let first_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| default_fixture("zoology.json"));
    let second_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| default_fixture("household.json"));

    let started = Instant::now();
    let first = load(&first_path)?;
    let second = load(&second_path)?;
    println!("Indexed both hierarchies in {:?}\n", started.elapsed());

    print_structure(&first)?;
    print_structure(&second)?;

    let engine = NecessitySimilarity::new(SimilarityConfig::default())?;

    let c1 = ConceptId::new("zoo:Dog");
    let c2 = ConceptId::new("http://example.org/home#Cat");
    if first.contains(&c1) && second.contains(&c2) {
        let started = Instant::now();
        let lcs = engine.resolve_lcs(&first, &c1, &second, &c2)?;
        let sim = engine.sim_nec(&first, &c1, &second, &c2)?;
        println!(
            "simNec({}, {}) = {:.6} via LCS {} in {:?}",
            first.label(&c1)?,
            second.label(&c2)?,
            sim,
            lcs.label,
            started.elapsed()
        );
    }

    let started = Instant::now();
    let score = engine.sim_nec_onto(&first, &second)?;
    println!(
        "simNecOnto({}, {}) = {:.6} in {:?}",
        first.name(),
        second.name(),
        score,
        started.elapsed()
    );
    println!(
        "Concepts without a counterpart: {}",
        engine.different_concepts_count(&first, &second)?
    );

    Ok(())
}
