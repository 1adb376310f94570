//! Compaction: rebuild a graph without isolated vertices

use super::{CoocGraph, NodeId};

impl CoocGraph {
    /// Copy of this graph holding only nodes with at least one edge
    ///
    /// Retained nodes keep name and cfreq, edges keep freq and orientation.
    /// Ids are reassigned contiguously in the old id order. Document count
    /// and document set are carried over.
    pub fn compacted(&self) -> CoocGraph {
        let mut out = CoocGraph::new();
        let mut id_map: Vec<Option<NodeId>> = vec![None; self.node_count()];

        for (old, node) in self.nodes().iter().enumerate() {
            if self.degree(old) == 0 {
                continue;
            }
            let new = out.find_or_insert_node(&node.name);
            if let Some(n) = out.node_mut(new) {
                n.cfreq = node.cfreq;
            }
            id_map[old] = Some(new);
        }

        for edge in self.edges() {
            // Endpoints of an edge have degree >= 1, both are mapped
            let endpoints = id_map[edge.source].zip(id_map[edge.target]);
            debug_assert!(endpoints.is_some(), "unmapped endpoint of edge {:?}", edge);
            let Some((u, v)) = endpoints else {
                tracing::warn!(source = edge.source, target = edge.target, "Edge endpoint not retained");
                continue;
            };

            match out.find_or_insert_edge(u, v) {
                Ok(e) => {
                    if let Some(copy) = out.edge_mut(e) {
                        copy.freq = edge.freq;
                    }
                }
                Err(err) => {
                    debug_assert!(false, "edge {:?} not copyable: {}", edge, err);
                    tracing::warn!(%err, "Edge not copied during compaction");
                }
            }
        }

        out.set_doc_count(self.doc_count());
        out.set_doc_ids(self.doc_ids().clone());
        out
    }

    /// Replace this graph by its compacted copy in a single assignment
    ///
    /// Returns the number of dropped nodes.
    pub fn remove_isolated_vertices(&mut self) -> usize {
        let compacted = self.compacted();
        let dropped = self.node_count() - compacted.node_count();
        *self = compacted;

        tracing::info!(
            dropped,
            nodes = self.node_count(),
            edges = self.edge_count(),
            "Removed isolated vertices"
        );
        dropped
    }
}
