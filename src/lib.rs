//! coocgraph - term co-occurrence graph engine
//!
//! # Architecture
//!
//! - **Graph**: dense term nodes + undirected edges keyed by `(min, max)` pair
//! - **Ingestion**: `docId` / term-line records, per-document deduplication
//! - **Chi-square pruning**: drop weakly associated term pairs
//! - **Compaction**: rebuild without isolated vertices
//! - **Storage**: magic-framed binary file, loaded through mmap
//!
//! # Usage example
//!
//! ```no_run
//! use coocgraph::{CoocGraph, DocumentIngestor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut graph = CoocGraph::new();
//! DocumentIngestor::new(&mut graph).ingest_file("corpus.txt")?;
//!
//! graph.chisq_prune(3.84);
//! graph.remove_isolated_vertices();
//! graph.write_to_binfile("cooc.bin")?;
//!
//! let loaded = CoocGraph::read_from_binfile("cooc.bin")?;
//! println!("{} terms, {} edges", loaded.node_count(), loaded.edge_count());
//! # Ok(())
//! # }
//! ```

pub mod graph;
pub mod storage;
pub mod error;
pub mod config;

pub use graph::{CoocGraph, CoocGraphView, DocumentIngestor, GraphStats, IngestStats, PruneStats};
pub use graph::{NodeId, EdgeId};
pub use storage::{TermNode, CoocEdge};
pub use config::BuildConfig;
pub use error::{GraphError, Result};
