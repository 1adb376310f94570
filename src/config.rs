//! Build configuration for the co-occurrence pipeline

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

/// Pipeline settings, loadable from a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Prune edges scoring below this chi-square value after ingestion
    pub chisq_threshold: Option<f32>,
    /// Remove isolated vertices before saving
    pub compact: bool,
    /// Keep document identifiers in the graph's document set
    pub record_doc_ids: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            chisq_threshold: None,
            compact: false,
            record_doc_ids: true,
        }
    }
}

impl BuildConfig {
    /// Read a JSON config file; absent fields keep their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| GraphError::MissingFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }
}
