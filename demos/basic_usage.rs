//! Basic usage example for the coocgraph engine
//!
//! Run: cargo run --example basic_usage

use std::io::Cursor;

use coocgraph::{CoocGraph, CoocGraphView, DocumentIngestor};
use tempfile::TempDir;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== coocgraph - Basic Usage ===\n");

    let corpus = "\
d1
rust cargo crate
d2
rust cargo
d3
python pip
d4
python pip wheel
d5
rust crate
";

    println!("1. Ingesting corpus...");
    let mut graph = CoocGraph::new();
    let stats = DocumentIngestor::new(&mut graph).ingest_reader(Cursor::new(corpus))?;
    println!("   {} documents, {} skipped", stats.documents, stats.skipped);
    println!("   {} terms, {} edges\n", graph.node_count(), graph.edge_count());

    println!("2. Co-occurrence counts:");
    let mut out = std::io::stdout().lock();
    graph.write_text(&mut out)?;
    drop(out);

    println!("\n3. Chi-square pruning (threshold 3.0)...");
    let pruned = graph.chisq_prune(3.0);
    println!("   scored {}, removed {}", pruned.scored, pruned.removed);

    println!("\n4. Removing isolated vertices...");
    let removed = graph.remove_isolated_vertices();
    println!("   removed {} vertices", removed);

    println!("\n5. Saving and reloading...");
    let dir = TempDir::new()?;
    let path = dir.path().join("cooc.bin");
    graph.write_to_binfile(&path)?;
    let loaded = CoocGraph::read_from_binfile(&path)?;

    for id in loaded.node_ids() {
        let name = loaded.node_name(id).unwrap_or("?");
        let neighbors: Vec<&str> = loaded
            .neighbors(id)
            .into_iter()
            .filter_map(|n| loaded.node_name(n))
            .collect();
        println!("   {} -> {:?}", name, neighbors);
    }

    println!("\n{}", serde_json::to_string_pretty(&loaded.stats())?);
    Ok(())
}
