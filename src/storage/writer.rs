//! Graph writer - serialize a CoocGraph into the framed binary layout

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{GraphError, Result};
use crate::graph::CoocGraph;
use crate::storage::segment::MAGIC;

/// Writer for graph files on disk
pub struct SegmentWriter {
    path: PathBuf,
}

impl SegmentWriter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Write the whole graph, replacing any existing file
    pub fn write_graph(&self, graph: &CoocGraph) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|source| GraphError::MissingFile {
                path: self.path.clone(),
                source,
            })?;

        let mut writer = BufWriter::new(file);
        write_graph_to(&mut writer, graph)?;
        writer.flush()?;

        tracing::info!(
            path = %self.path.display(),
            documents = graph.doc_count(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Graph written"
        );
        Ok(())
    }
}

/// Encode `graph` into `writer`
///
/// Sections are separated by [`MAGIC`]. Edges are written as
/// `(target, source, freq)`.
pub fn write_graph_to<W: Write>(writer: &mut W, graph: &CoocGraph) -> Result<()> {
    write_usize(writer, MAGIC)?;

    write_usize(writer, graph.doc_count())?;
    write_usize(writer, graph.doc_ids().len())?;
    for id in graph.doc_ids() {
        write_str(writer, id)?;
    }
    write_usize(writer, graph.node_map().len())?;
    for (name, &id) in graph.node_map() {
        write_str(writer, name)?;
        write_usize(writer, id)?;
    }

    write_usize(writer, MAGIC)?;

    write_usize(writer, graph.node_count())?;
    for node in graph.nodes() {
        write_str(writer, &node.name)?;
        write_usize(writer, node.cfreq)?;
    }

    write_usize(writer, MAGIC)?;

    write_usize(writer, graph.edge_count())?;
    for edge in graph.edges() {
        write_usize(writer, edge.target)?;
        write_usize(writer, edge.source)?;
        writer.write_all(&edge.freq.to_ne_bytes())?;
    }

    write_usize(writer, MAGIC)?;
    Ok(())
}

fn write_usize<W: Write>(writer: &mut W, value: usize) -> Result<()> {
    writer.write_all(&value.to_ne_bytes())?;
    Ok(())
}

fn write_str<W: Write>(writer: &mut W, s: &str) -> Result<()> {
    write_usize(writer, s.len())?;
    writer.write_all(s.as_bytes())?;
    Ok(())
}

impl CoocGraph {
    /// Encode into an in-memory file image
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        write_graph_to(&mut buf, self)?;
        Ok(buf)
    }

    /// Write the graph file at `path`
    pub fn write_to_binfile<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        SegmentWriter::new(path).write_graph(self)
    }
}
