//! Benchmark suite for graph operations

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use coocgraph::{CoocGraph, DocumentIngestor};
use tempfile::TempDir;

/// Synthetic corpus: `docs` documents of `terms` distinct terms drawn from
/// a vocabulary of `vocab` words
fn make_corpus(docs: usize, terms: usize, vocab: usize) -> String {
    let mut corpus = String::new();
    for d in 0..docs {
        corpus.push_str(&format!("doc_{}\n", d));
        let line: Vec<String> = (0..terms)
            .map(|t| format!("w{}", (d * 7 + t * 13) % vocab))
            .collect();
        corpus.push_str(&line.join(" "));
        corpus.push('\n');
    }
    corpus
}

fn create_test_graph(docs: usize, terms: usize, vocab: usize) -> CoocGraph {
    let mut graph = CoocGraph::new();
    DocumentIngestor::new(&mut graph)
        .ingest_reader(make_corpus(docs, terms, vocab).as_bytes())
        .unwrap();
    graph
}

// Cost grows with the square of distinct terms per document
fn bench_ingest_terms_per_doc(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest_terms_per_doc");

    for terms in [8, 32, 128] {
        let corpus = make_corpus(200, terms, 5000);
        group.bench_with_input(BenchmarkId::from_parameter(terms), &corpus, |b, corpus| {
            b.iter(|| {
                let mut graph = CoocGraph::new();
                DocumentIngestor::new(&mut graph)
                    .ingest_reader(black_box(corpus.as_bytes()))
                    .unwrap();
                black_box(graph.edge_count());
            });
        });
    }

    group.finish();
}

fn bench_chisq_prune(c: &mut Criterion) {
    let mut group = c.benchmark_group("chisq_prune");

    for docs in [100, 1000, 5000] {
        let graph = create_test_graph(docs, 16, 2000);

        group.bench_with_input(BenchmarkId::from_parameter(docs), &graph, |b, graph| {
            b.iter(|| {
                let mut g = graph.clone();
                black_box(g.chisq_prune(black_box(3.84)));
            });
        });
    }

    group.finish();
}

fn bench_compact(c: &mut Criterion) {
    let mut group = c.benchmark_group("compact");

    for docs in [100, 1000, 5000] {
        let mut graph = create_test_graph(docs, 16, 2000);
        graph.chisq_prune(3.84);

        group.bench_with_input(BenchmarkId::from_parameter(docs), &graph, |b, graph| {
            b.iter(|| black_box(graph.compacted()));
        });
    }

    group.finish();
}

fn bench_write_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_read");
    let dir = TempDir::new().unwrap();

    for docs in [100, 1000, 5000] {
        let graph = create_test_graph(docs, 16, 2000);
        let path = dir.path().join(format!("cooc_{}.bin", docs));

        group.bench_with_input(BenchmarkId::from_parameter(docs), &graph, |b, graph| {
            b.iter(|| {
                graph.write_to_binfile(&path).unwrap();
                black_box(CoocGraph::read_from_binfile(&path).unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_ingest_terms_per_doc,
    bench_chisq_prune,
    bench_compact,
    bench_write_read
);
criterion_main!(benches);
