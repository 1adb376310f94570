//! Error types for the co-occurrence graph

use std::path::PathBuf;
use thiserror::Error;

use crate::graph::NodeId;
use crate::storage::segment::Checkpoint;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Cannot open {}: {source}", path.display())]
    MissingFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt stream: invalid magic {found:#x} {checkpoint}")]
    CorruptStream { checkpoint: Checkpoint, found: usize },

    #[error("Edge references vertex {index}, but the graph has {vertex_count} vertices")]
    IndexOutOfRange { index: usize, vertex_count: usize },

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    #[error("Self-loop edge on node {0}")]
    SelfLoop(NodeId),

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node {0} listed twice in one document")]
    DuplicateNode(NodeId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
