//! CoocGraph: term nodes, co-occurrence edges and the name registry

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::Write;
use std::ops::Range;

use serde::Serialize;

use super::{CoocGraphView, EdgeId, NodeId};
use crate::error::{GraphError, Result};
use crate::storage::{pair_key, CoocEdge, TermNode};

/// Weighted undirected co-occurrence graph over vocabulary terms
///
/// Nodes live in a dense array indexed by [`NodeId`]; ids are assigned in
/// insertion order and never reused until the graph is replaced wholesale
/// by compaction or loading. Edges are kept in an array too, with a
/// `(min, max)` pair index for O(1) lookup and per-node adjacency lists.
#[derive(Debug, Clone, Default)]
pub struct CoocGraph {
    nodes: Vec<TermNode>,

    // Name registry, always 1:1 with `nodes`
    node_map: BTreeMap<String, NodeId>,

    edges: Vec<CoocEdge>,
    edge_index: HashMap<(NodeId, NodeId), EdgeId>,

    // node -> incident edge ids
    adjacency: Vec<Vec<EdgeId>>,

    doc_n: usize,
    doc_set: BTreeSet<String>,
}

/// Summary counters of a graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub doc_count: usize,
    pub doc_ids: usize,
    pub node_count: usize,
    pub edge_count: usize,
    pub isolated_nodes: usize,
}

impl CoocGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // === NODES ===

    /// Return the id of `name`, creating the node (cfreq 0) if it is new
    pub fn find_or_insert_node(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.node_map.get(name) {
            return id;
        }

        let id = self.nodes.len();
        self.nodes.push(TermNode::new(name));
        self.adjacency.push(Vec::new());
        self.node_map.insert(name.to_string(), id);
        id
    }

    /// Lookup without mutation
    pub fn vertex_by_name(&self, name: &str) -> Option<NodeId> {
        self.node_map.get(name).copied()
    }

    pub fn node(&self, id: NodeId) -> Option<&TermNode> {
        self.nodes.get(id)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut TermNode> {
        self.nodes.get_mut(id)
    }

    pub fn nodes(&self) -> &[TermNode] {
        &self.nodes
    }

    /// Name registry ordered by name
    pub fn node_map(&self) -> &BTreeMap<String, NodeId> {
        &self.node_map
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of incident edges
    pub fn degree(&self, id: NodeId) -> usize {
        self.adjacency.get(id).map_or(0, Vec::len)
    }

    // === EDGES ===

    /// Return the edge for the unordered pair `{u, v}`, creating it with
    /// `freq = 0` if absent
    pub fn find_or_insert_edge(&mut self, u: NodeId, v: NodeId) -> Result<EdgeId> {
        if u == v {
            return Err(GraphError::SelfLoop(u));
        }
        for id in [u, v] {
            if id >= self.nodes.len() {
                return Err(GraphError::NodeNotFound(id));
            }
        }

        let key = pair_key(u, v);
        if let Some(&e) = self.edge_index.get(&key) {
            return Ok(e);
        }

        let e = self.edges.len();
        self.edges.push(CoocEdge::new(u, v));
        self.edge_index.insert(key, e);
        self.adjacency[u].push(e);
        self.adjacency[v].push(e);
        Ok(e)
    }

    /// Edge id for the unordered pair `{u, v}`
    pub fn find_edge(&self, u: NodeId, v: NodeId) -> Option<EdgeId> {
        self.edge_index.get(&pair_key(u, v)).copied()
    }

    pub fn edge(&self, id: EdgeId) -> Option<&CoocEdge> {
        self.edges.get(id)
    }

    pub(crate) fn edge_mut(&mut self, id: EdgeId) -> Option<&mut CoocEdge> {
        self.edges.get_mut(id)
    }

    pub fn edges(&self) -> &[CoocEdge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Keep only edges matching `keep`, then rebuild the pair index and
    /// adjacency lists. Edge ids are renumbered; node ids are untouched.
    pub(crate) fn retain_edges<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&CoocEdge) -> bool,
    {
        let before = self.edges.len();
        self.edges.retain(keep);

        self.edge_index.clear();
        for list in &mut self.adjacency {
            list.clear();
        }
        for (e, edge) in self.edges.iter().enumerate() {
            self.edge_index.insert(edge.key(), e);
            self.adjacency[edge.source].push(e);
            self.adjacency[edge.target].push(e);
        }

        before - self.edges.len()
    }

    // === DOCUMENTS ===

    /// Number of ingested non-empty documents
    pub fn doc_count(&self) -> usize {
        self.doc_n
    }

    pub fn doc_ids(&self) -> &BTreeSet<String> {
        &self.doc_set
    }

    pub(crate) fn set_doc_count(&mut self, n: usize) {
        self.doc_n = n;
    }

    pub(crate) fn set_doc_ids(&mut self, ids: BTreeSet<String>) {
        self.doc_set = ids;
    }

    pub(crate) fn record_document(&mut self, doc_id: Option<&str>) {
        self.doc_n += 1;
        if let Some(id) = doc_id {
            self.doc_set.insert(id.to_string());
        }
    }

    // === STATS / DISPLAY ===

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            doc_count: self.doc_n,
            doc_ids: self.doc_set.len(),
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            isolated_nodes: self.adjacency.iter().filter(|a| a.is_empty()).count(),
        }
    }

    /// Text dump, one edge per line: `name:cfreq:name:cfreq:freq`
    pub fn write_text<W: Write>(&self, out: &mut W) -> Result<()> {
        for edge in &self.edges {
            let u = &self.nodes[edge.source];
            let v = &self.nodes[edge.target];
            writeln!(out, "{}:{}:{}:{}:{}", u.name, u.cfreq, v.name, v.cfreq, edge.freq)?;
        }
        Ok(())
    }
}

impl CoocGraphView for CoocGraph {
    fn vertex_by_name(&self, name: &str) -> Option<NodeId> {
        CoocGraph::vertex_by_name(self, name)
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn node_ids(&self) -> Range<NodeId> {
        0..self.nodes.len()
    }

    fn edge_ids(&self) -> Range<EdgeId> {
        0..self.edges.len()
    }

    fn node_name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id).map(|n| n.name.as_str())
    }

    fn node_cfreq(&self, id: NodeId) -> Option<usize> {
        self.nodes.get(id).map(|n| n.cfreq)
    }

    fn edge_endpoints(&self, id: EdgeId) -> Option<(NodeId, NodeId)> {
        self.edges.get(id).map(|e| (e.source, e.target))
    }

    fn edge_freq(&self, id: EdgeId) -> Option<f32> {
        self.edges.get(id).map(|e| e.freq)
    }

    fn neighbors(&self, id: NodeId) -> Vec<NodeId> {
        self.adjacency
            .get(id)
            .map(|list| list.iter().map(|&e| self.edges[e].other(id)).collect())
            .unwrap_or_default()
    }
}
