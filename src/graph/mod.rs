//! Co-occurrence graph API and implementation

pub mod cooc;
pub mod ingest;
pub mod chisq;
pub mod compact;


use std::ops::Range;

pub use cooc::{CoocGraph, GraphStats};
pub use ingest::{DocumentIngestor, IngestStats};
pub use chisq::{chi_square, PruneStats};

/// Dense node id, position in the node array
pub type NodeId = usize;

/// Edge id, position in the edge array (renumbered by pruning)
pub type EdgeId = usize;

/// Read-only accessors consumed by downstream graph systems
///
/// All methods are side-effect free. Ids outside the graph yield `None`
/// (or an empty neighbor list).
pub trait CoocGraphView {
    /// Name lookup, `None` when the term is unknown
    fn vertex_by_name(&self, name: &str) -> Option<NodeId>;

    fn node_count(&self) -> usize;

    fn edge_count(&self) -> usize;

    /// All node ids; the range can be re-requested any number of times
    fn node_ids(&self) -> Range<NodeId>;

    /// All edge ids
    fn edge_ids(&self) -> Range<EdgeId>;

    fn node_name(&self, id: NodeId) -> Option<&str>;

    /// Corpus frequency of a node
    fn node_cfreq(&self, id: NodeId) -> Option<usize>;

    /// `(source, target)` of an edge, in insertion order
    fn edge_endpoints(&self, id: EdgeId) -> Option<(NodeId, NodeId)>;

    fn edge_freq(&self, id: EdgeId) -> Option<f32>;

    /// Nodes sharing an edge with `id`
    fn neighbors(&self, id: NodeId) -> Vec<NodeId>;
}
