//! Graph records and the framed binary format

pub mod segment;
pub mod writer;

use serde::Serialize;

pub use segment::{SegmentReader, MAGIC};
pub use writer::SegmentWriter;

/// Vocabulary term stored as a graph node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermNode {
    /// Unique term string, key of the name registry
    pub name: String,

    /// Number of ingested documents containing the term
    pub cfreq: usize,
}

impl TermNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cfreq: 0,
        }
    }
}

/// Undirected co-occurrence edge
///
/// `source`/`target` only record insertion order, the pair is unordered.
/// `freq` is the document co-occurrence count until the graph is pruned,
/// afterwards it holds the chi-square score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoocEdge {
    pub source: usize,
    pub target: usize,
    pub freq: f32,
}

impl CoocEdge {
    pub fn new(source: usize, target: usize) -> Self {
        Self {
            source,
            target,
            freq: 0.0,
        }
    }

    /// Canonical `(min, max)` key of the unordered pair
    pub fn key(&self) -> (usize, usize) {
        pair_key(self.source, self.target)
    }

    /// The endpoint opposite to `node`
    pub fn other(&self, node: usize) -> usize {
        if self.source == node {
            self.target
        } else {
            self.source
        }
    }
}

pub(crate) fn pair_key(u: usize, v: usize) -> (usize, usize) {
    if u <= v {
        (u, v)
    } else {
        (v, u)
    }
}
