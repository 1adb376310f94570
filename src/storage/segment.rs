//! Graph file decoding with magic checkpoints

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::error::{GraphError, Result};
use crate::graph::CoocGraph;

/// Magic number written at the four structural checkpoints
pub const MAGIC: usize = 0x071109;

/// Width of every integer field: native `usize`
pub const WORD: usize = std::mem::size_of::<usize>();

const F32_SIZE: usize = std::mem::size_of::<f32>();

/// Structural boundaries validated while reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    Header,
    AfterMaps,
    AfterVertices,
    AfterEdges,
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let place = match self {
            Checkpoint::Header => "at file start (is this a cooc graph?)",
            Checkpoint::AfterMaps => "after reading maps",
            Checkpoint::AfterVertices => "after reading vertices",
            Checkpoint::AfterEdges => "after reading edges",
        };
        f.write_str(place)
    }
}

/// Decoder over a complete graph file held in memory
///
/// Layout, all integers native `usize`, strings length-prefixed UTF-8:
///
/// ```text
/// MAGIC docN
///   docSet  count (string)*
///   nodeMap count (string id)*
/// MAGIC vertexCount (name cfreq)*
/// MAGIC edgeCount (target source freq:f32)*
/// MAGIC
/// ```
pub struct SegmentReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> SegmentReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Decode the whole buffer into a fresh graph
    ///
    /// Nothing is returned unless all four checkpoints match, every record
    /// is consistent and the buffer is fully consumed.
    pub fn read_graph(mut self) -> Result<CoocGraph> {
        self.expect_magic(Checkpoint::Header)?;

        let doc_n = self.read_usize()?;

        let doc_count = self.read_count(WORD, "document id")?;
        let mut doc_set = BTreeSet::new();
        for _ in 0..doc_count {
            let id = self.read_string()?;
            if !doc_set.insert(id) {
                return Err(GraphError::InvalidFormat("Duplicate document id".into()));
            }
        }

        let map_count = self.read_count(2 * WORD, "name registry")?;
        let mut node_map = BTreeMap::new();
        for _ in 0..map_count {
            let name = self.read_string()?;
            let id = self.read_usize()?;
            if node_map.insert(name, id).is_some() {
                return Err(GraphError::InvalidFormat("Duplicate name in registry".into()));
            }
        }

        self.expect_magic(Checkpoint::AfterMaps)?;

        let mut graph = CoocGraph::new();

        let vertex_count = self.read_count(2 * WORD, "vertex")?;
        for i in 0..vertex_count {
            let name = self.read_string()?;
            let cfreq = self.read_usize()?;
            let id = graph.find_or_insert_node(&name);
            if id != i {
                return Err(GraphError::InvalidFormat(format!(
                    "Vertex {} repeats the name of vertex {}",
                    i, id
                )));
            }
            if let Some(node) = graph.node_mut(id) {
                node.cfreq = cfreq;
            }
        }

        if &node_map != graph.node_map() {
            return Err(GraphError::InvalidFormat(
                "Name registry does not match the vertex table".into(),
            ));
        }

        self.expect_magic(Checkpoint::AfterVertices)?;

        let edge_count = self.read_count(2 * WORD + F32_SIZE, "edge")?;
        for _ in 0..edge_count {
            let target = self.read_usize()?;
            let source = self.read_usize()?;
            let freq = self.read_f32()?;

            for index in [target, source] {
                if index >= vertex_count {
                    return Err(GraphError::IndexOutOfRange { index, vertex_count });
                }
            }
            if source == target {
                return Err(GraphError::InvalidFormat(format!(
                    "Self-loop edge on vertex {}",
                    source
                )));
            }
            if graph.find_edge(source, target).is_some() {
                return Err(GraphError::InvalidFormat(format!(
                    "Duplicate edge {} - {}",
                    source, target
                )));
            }
            if freq.is_nan() || freq < 0.0 {
                return Err(GraphError::InvalidFormat(format!(
                    "Invalid edge frequency {}",
                    freq
                )));
            }

            let e = graph.find_or_insert_edge(source, target)?;
            if let Some(edge) = graph.edge_mut(e) {
                edge.freq = freq;
            }
        }

        self.expect_magic(Checkpoint::AfterEdges)?;

        if self.offset != self.data.len() {
            return Err(GraphError::InvalidFormat(format!(
                "{} trailing bytes after the last checkpoint",
                self.data.len() - self.offset
            )));
        }

        graph.set_doc_count(doc_n);
        graph.set_doc_ids(doc_set);
        Ok(graph)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| {
                GraphError::InvalidFormat(format!(
                    "Unexpected end of data at offset {} (need {} bytes)",
                    self.offset, len
                ))
            })?;
        let bytes = &self.data[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    fn read_usize(&mut self) -> Result<usize> {
        let bytes = self.take(WORD)?;
        let word = bytes
            .try_into()
            .map_err(|_| GraphError::InvalidFormat("Invalid integer width".into()))?;
        Ok(usize::from_ne_bytes(word))
    }

    fn read_f32(&mut self) -> Result<f32> {
        let bytes = self.take(F32_SIZE)?;
        let word = bytes
            .try_into()
            .map_err(|_| GraphError::InvalidFormat("Invalid float width".into()))?;
        Ok(f32::from_ne_bytes(word))
    }

    fn read_string(&mut self) -> Result<String> {
        let len = self.read_usize()?;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|e| GraphError::InvalidFormat(format!("Invalid UTF-8 string: {}", e)))
    }

    /// Read a record count, rejecting counts the remaining bytes cannot hold
    fn read_count(&mut self, min_record: usize, what: &str) -> Result<usize> {
        let count = self.read_usize()?;
        let remaining = self.data.len() - self.offset;
        if count > remaining / min_record {
            return Err(GraphError::InvalidFormat(format!(
                "{} count {} exceeds remaining data",
                what, count
            )));
        }
        Ok(count)
    }

    fn expect_magic(&mut self, checkpoint: Checkpoint) -> Result<()> {
        let found = self.read_usize()?;
        if found != MAGIC {
            return Err(GraphError::CorruptStream { checkpoint, found });
        }
        Ok(())
    }
}

impl CoocGraph {
    /// Decode a graph from an in-memory file image
    pub fn from_bytes(data: &[u8]) -> Result<CoocGraph> {
        SegmentReader::new(data).read_graph()
    }

    /// Load a graph file written by [`CoocGraph::write_to_binfile`]
    pub fn read_from_binfile<P: AsRef<Path>>(path: P) -> Result<CoocGraph> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| GraphError::MissingFile {
            path: path.to_path_buf(),
            source,
        })?;

        let graph = if file.metadata()?.len() == 0 {
            SegmentReader::new(&[]).read_graph()?
        } else {
            // File is opened read-only and not modified while mapped
            let mmap = unsafe { Mmap::map(&file)? };
            SegmentReader::new(&mmap[..]).read_graph()?
        };

        tracing::info!(
            path = %path.display(),
            documents = graph.doc_count(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Graph loaded"
        );
        Ok(graph)
    }
}
