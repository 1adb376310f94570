//! Corpus ingestion: document records -> term counts and co-occurrence edges

use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;

use super::{CoocGraph, NodeId};
use crate::error::{GraphError, Result};

/// Counters of one ingestion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    /// Documents added to the graph
    pub documents: usize,
    /// Records dropped because their term line had no tokens
    pub skipped: usize,
}

impl CoocGraph {
    /// Add one document given its deduplicated node list
    ///
    /// Every node gets `cfreq += 1` and every unordered pair of the list
    /// gets `freq += 1`. The list is checked before anything is mutated:
    /// unknown ids and repeated ids are rejected and leave the graph as is.
    /// The document counter is not touched here.
    pub fn insert_doc(&mut self, doc: &[NodeId]) -> Result<()> {
        let mut seen = HashSet::with_capacity(doc.len());
        for &w in doc {
            if w >= self.node_count() {
                return Err(GraphError::NodeNotFound(w));
            }
            if !seen.insert(w) {
                return Err(GraphError::DuplicateNode(w));
            }
        }

        for (i, &w) in doc.iter().enumerate() {
            if let Some(node) = self.node_mut(w) {
                node.cfreq += 1;
            }
            for &later in &doc[i + 1..] {
                let e = self.find_or_insert_edge(w, later)?;
                if let Some(edge) = self.edge_mut(e) {
                    edge.freq += 1.0;
                }
            }
        }
        Ok(())
    }
}

/// Reads corpus records into a [`CoocGraph`]
///
/// The corpus is a sequence of records: a document-identifier line followed
/// by a line of whitespace-separated terms. Blank lines are skipped on both
/// sides of a record. Lines are decoded as UTF-8 with invalid sequences
/// replaced by U+FFFD, so legacy-encoded corpora still ingest completely.
pub struct DocumentIngestor<'g> {
    graph: &'g mut CoocGraph,
    record_doc_ids: bool,
}

impl<'g> DocumentIngestor<'g> {
    pub fn new(graph: &'g mut CoocGraph) -> Self {
        Self {
            graph,
            record_doc_ids: true,
        }
    }

    /// Whether document identifiers go into the graph's document set
    pub fn record_doc_ids(mut self, record: bool) -> Self {
        self.record_doc_ids = record;
        self
    }

    /// Ingest a single record. Returns `false` when the term line is empty
    /// and the record was skipped.
    pub fn ingest_document(&mut self, doc_id: &str, terms: &str) -> Result<bool> {
        // BTreeSet: dedup by exact string and order by name
        let words: BTreeSet<&str> = terms.split_whitespace().collect();
        if words.is_empty() {
            return Ok(false);
        }

        let ids: Vec<NodeId> = words
            .iter()
            .map(|w| self.graph.find_or_insert_node(w))
            .collect();
        self.graph.insert_doc(&ids)?;

        let doc_id = doc_id.trim();
        self.graph
            .record_document(self.record_doc_ids.then_some(doc_id));
        Ok(true)
    }

    /// Ingest every record of a corpus stream
    pub fn ingest_reader<R: BufRead>(&mut self, reader: R) -> Result<IngestStats> {
        let mut stats = IngestStats::default();
        let mut lines = CorpusLines::new(reader);

        while let Some(doc_id) = lines.next_non_blank()? {
            let terms = lines.next_non_blank()?.unwrap_or_default();
            if self.ingest_document(&doc_id, &terms)? {
                stats.documents += 1;
            } else {
                stats.skipped += 1;
                tracing::debug!(doc_id = doc_id.trim(), "Skipping document without terms");
            }
        }

        tracing::info!(
            documents = stats.documents,
            skipped = stats.skipped,
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "Corpus ingested"
        );
        Ok(stats)
    }

    /// Open `path` and ingest it
    pub fn ingest_file<P: AsRef<Path>>(&mut self, path: P) -> Result<IngestStats> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| GraphError::MissingFile {
            path: path.to_path_buf(),
            source,
        })?;
        self.ingest_reader(BufReader::new(file))
    }
}

/// Byte-oriented line reader over a corpus stream
struct CorpusLines<R> {
    reader: R,
    buf: Vec<u8>,
    line_no: usize,
}

impl<R: BufRead> CorpusLines<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_no: 0,
        }
    }

    /// Next line holding at least one non-whitespace character
    fn next_non_blank(&mut self) -> Result<Option<String>> {
        loop {
            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            if self.buf.last() == Some(&b'\n') {
                self.buf.pop();
                if self.buf.last() == Some(&b'\r') {
                    self.buf.pop();
                }
            }

            let line = match String::from_utf8_lossy(&self.buf) {
                Cow::Borrowed(line) => line.to_string(),
                Cow::Owned(line) => {
                    tracing::warn!(line = self.line_no, "Invalid UTF-8 in corpus line, bytes replaced");
                    line
                }
            };
            if !line.trim().is_empty() {
                return Ok(Some(line));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn edge_freq(g: &CoocGraph, a: &str, b: &str) -> Option<f32> {
        let u = g.vertex_by_name(a)?;
        let v = g.vertex_by_name(b)?;
        g.find_edge(u, v).map(|e| g.edges()[e].freq)
    }

    fn cfreq(g: &CoocGraph, name: &str) -> usize {
        let id = g.vertex_by_name(name).unwrap();
        g.node(id).unwrap().cfreq
    }

    #[test]
    fn test_two_document_scenario() {
        let mut g = CoocGraph::new();
        let corpus = "d1\na b\nd2\na c\n";
        let stats = DocumentIngestor::new(&mut g)
            .ingest_reader(Cursor::new(corpus))
            .unwrap();

        assert_eq!(stats, IngestStats { documents: 2, skipped: 0 });
        assert_eq!(g.doc_count(), 2);
        assert_eq!(cfreq(&g, "a"), 2);
        assert_eq!(cfreq(&g, "b"), 1);
        assert_eq!(cfreq(&g, "c"), 1);
        assert_eq!(edge_freq(&g, "a", "b"), Some(1.0));
        assert_eq!(edge_freq(&g, "a", "c"), Some(1.0));
        assert_eq!(edge_freq(&g, "b", "c"), None);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn test_empty_term_line_skipped() {
        let mut g = CoocGraph::new();
        let mut ingestor = DocumentIngestor::new(&mut g);
        assert!(!ingestor.ingest_document("d1", "   \t ").unwrap());
        assert!(!ingestor.ingest_document("d2", "").unwrap());

        assert_eq!(g.doc_count(), 0);
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.doc_ids().is_empty());
    }

    #[test]
    fn test_trailing_doc_id_without_terms() {
        let mut g = CoocGraph::new();
        let corpus = "d1\nx y\n\nd2\n\n\n";
        let stats = DocumentIngestor::new(&mut g)
            .ingest_reader(Cursor::new(corpus))
            .unwrap();

        assert_eq!(stats, IngestStats { documents: 1, skipped: 1 });
        assert_eq!(g.doc_count(), 1);
        assert_eq!(g.node_count(), 2);
    }

    #[test]
    fn test_blank_lines_between_records() {
        let mut g = CoocGraph::new();
        let corpus = "\n\n  d1  \n\n\t\nfoo bar baz\n\n\nd2\nbar   baz\n";
        DocumentIngestor::new(&mut g)
            .ingest_reader(Cursor::new(corpus))
            .unwrap();

        assert_eq!(g.doc_count(), 2);
        assert_eq!(edge_freq(&g, "bar", "baz"), Some(2.0));
        assert_eq!(edge_freq(&g, "foo", "bar"), Some(1.0));
        assert_eq!(cfreq(&g, "foo"), 1);
        let ids: Vec<&str> = g.doc_ids().iter().map(String::as_str).collect();
        assert_eq!(ids, vec!["d1", "d2"]);
    }

    #[test]
    fn test_duplicate_terms_counted_once() {
        let mut g = CoocGraph::new();
        DocumentIngestor::new(&mut g)
            .ingest_document("d1", "a a b a b")
            .unwrap();

        assert_eq!(cfreq(&g, "a"), 1);
        assert_eq!(cfreq(&g, "b"), 1);
        assert_eq!(edge_freq(&g, "a", "b"), Some(1.0));
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_terms_inserted_in_name_order() {
        let mut g = CoocGraph::new();
        DocumentIngestor::new(&mut g)
            .ingest_document("d1", "pear apple mango")
            .unwrap();

        let names: Vec<&str> = g.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["apple", "mango", "pear"]);
    }

    #[test]
    fn test_pairs_grow_quadratically() {
        let mut g = CoocGraph::new();
        let terms: Vec<String> = (0..20).map(|i| format!("t{}", i)).collect();
        DocumentIngestor::new(&mut g)
            .ingest_document("d1", &terms.join(" "))
            .unwrap();

        assert_eq!(g.node_count(), 20);
        assert_eq!(g.edge_count(), 20 * 19 / 2);
    }

    #[test]
    fn test_doc_ids_not_recorded_when_disabled() {
        let mut g = CoocGraph::new();
        DocumentIngestor::new(&mut g)
            .record_doc_ids(false)
            .ingest_reader(Cursor::new("d1\na b\n"))
            .unwrap();

        assert_eq!(g.doc_count(), 1);
        assert!(g.doc_ids().is_empty());
    }

    #[test]
    fn test_insert_doc_rejects_duplicates_without_mutation() {
        let mut g = CoocGraph::new();
        let a = g.find_or_insert_node("a");
        let b = g.find_or_insert_node("b");

        let err = g.insert_doc(&[a, b, a]).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateNode(0)));
        assert_eq!(g.node(a).unwrap().cfreq, 0);
        assert_eq!(g.edge_count(), 0);

        assert!(matches!(
            g.insert_doc(&[a, 9]),
            Err(GraphError::NodeNotFound(9))
        ));
        assert_eq!(g.node(a).unwrap().cfreq, 0);
    }

    #[test]
    fn test_ingest_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "doc-1").unwrap();
        writeln!(file, "red green blue").unwrap();
        writeln!(file, "doc-2").unwrap();
        writeln!(file, "green blue").unwrap();
        file.flush().unwrap();

        let mut g = CoocGraph::new();
        let stats = DocumentIngestor::new(&mut g).ingest_file(file.path()).unwrap();
        assert_eq!(stats.documents, 2);
        assert_eq!(edge_freq(&g, "blue", "green"), Some(2.0));
        assert_eq!(edge_freq(&g, "red", "blue"), Some(1.0));
    }

    #[test]
    fn test_ingest_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut g = CoocGraph::new();
        let err = DocumentIngestor::new(&mut g)
            .ingest_file(dir.path().join("nope.txt"))
            .unwrap_err();
        assert!(matches!(err, GraphError::MissingFile { .. }));
    }

    #[test]
    fn test_invalid_utf8_line_does_not_stop_ingestion() {
        let corpus: &[u8] = b"d1\na b\nd2\ncaf\xe9 b\nd3\na c\n";
        let mut g = CoocGraph::new();
        let stats = DocumentIngestor::new(&mut g)
            .ingest_reader(Cursor::new(corpus))
            .unwrap();

        assert_eq!(stats, IngestStats { documents: 3, skipped: 0 });
        assert_eq!(g.doc_count(), 3);
        assert_eq!(cfreq(&g, "caf\u{FFFD}"), 1);
        assert_eq!(cfreq(&g, "a"), 2);
        assert_eq!(cfreq(&g, "b"), 2);
        assert_eq!(edge_freq(&g, "b", "caf\u{FFFD}"), Some(1.0));
        assert_eq!(edge_freq(&g, "a", "c"), Some(1.0));
    }

    #[test]
    fn test_crlf_line_endings() {
        let mut g = CoocGraph::new();
        DocumentIngestor::new(&mut g)
            .ingest_reader(Cursor::new("d1\r\nx y\r\n\r\nd2\r\ny z"))
            .unwrap();

        assert_eq!(g.doc_count(), 2);
        assert_eq!(edge_freq(&g, "x", "y"), Some(1.0));
        assert_eq!(edge_freq(&g, "y", "z"), Some(1.0));
        let ids: Vec<&str> = g.doc_ids().iter().map(String::as_str).collect();
        assert_eq!(ids, vec!["d1", "d2"]);
    }
}
