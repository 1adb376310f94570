//! coocgraph - build, prune and inspect term co-occurrence graphs
//!
//! Usage:
//!   coocgraph build --corpus corpus.txt --out cooc.bin [--chisq 3.84] [--compact]
//!   coocgraph prune cooc.bin pruned.bin --chisq 3.84 [--compact]
//!   coocgraph compact cooc.bin compact.bin
//!   coocgraph info cooc.bin
//!   coocgraph dump cooc.bin
//!
//! Corpus format: a document id line followed by a line of
//! whitespace-separated terms, repeated; blank lines are ignored.

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;

use coocgraph::{BuildConfig, CoocGraph, DocumentIngestor};

#[derive(Parser, Debug)]
#[command(name = "coocgraph", version, about = "Term co-occurrence graph builder")]
struct Cli {
    /// More log output (DEBUG)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a graph from a corpus and write it
    Build {
        /// Corpus text file
        #[arg(long)]
        corpus: PathBuf,
        /// Output graph file
        #[arg(long)]
        out: PathBuf,
        /// JSON build config
        #[arg(long)]
        config: Option<PathBuf>,
        /// Chi-square pruning threshold (overrides config)
        #[arg(long, value_parser = parse_threshold)]
        chisq: Option<f32>,
        /// Remove isolated vertices before writing
        #[arg(long)]
        compact: bool,
        /// Do not store document ids in the graph
        #[arg(long)]
        no_doc_ids: bool,
    },

    /// Prune a stored graph
    Prune {
        input: PathBuf,
        output: PathBuf,
        /// Chi-square threshold
        #[arg(long, value_parser = parse_threshold)]
        chisq: f32,
        /// Remove isolated vertices afterwards
        #[arg(long)]
        compact: bool,
    },

    /// Remove isolated vertices from a stored graph
    Compact { input: PathBuf, output: PathBuf },

    /// Print graph statistics as JSON
    Info { input: PathBuf },

    /// Print every edge as name:cfreq:name:cfreq:freq
    Dump { input: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Build { corpus, out, config, chisq, compact, no_doc_ids } => {
            let mut config = match config {
                Some(path) => BuildConfig::load(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => BuildConfig::default(),
            };
            if chisq.is_some() {
                config.chisq_threshold = chisq;
            }
            config.compact |= compact;
            config.record_doc_ids &= !no_doc_ids;

            cmd_build(&corpus, &out, &config)
        }
        Commands::Prune { input, output, chisq, compact } => {
            let mut graph = load(&input)?;
            graph.chisq_prune(chisq);
            if compact {
                graph.remove_isolated_vertices();
            }
            save(&graph, &output)
        }
        Commands::Compact { input, output } => {
            let mut graph = load(&input)?;
            graph.remove_isolated_vertices();
            save(&graph, &output)
        }
        Commands::Info { input } => {
            let graph = load(&input)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            serde_json::to_writer_pretty(&mut out, &graph.stats())?;
            writeln!(out)?;
            Ok(())
        }
        Commands::Dump { input } => {
            let graph = load(&input)?;
            let mut out = BufWriter::new(io::stdout().lock());
            graph.write_text(&mut out)?;
            out.flush()?;
            Ok(())
        }
    }
}

/// Chi-square threshold argument, NaN rejected
fn parse_threshold(arg: &str) -> std::result::Result<f32, String> {
    let threshold: f32 = arg
        .trim()
        .parse()
        .map_err(|e| format!("invalid threshold '{}': {}", arg, e))?;
    if threshold.is_nan() {
        return Err("threshold must be a number, got NaN".to_string());
    }
    Ok(threshold)
}

fn cmd_build(corpus: &Path, out: &Path, config: &BuildConfig) -> Result<()> {
    tracing::debug!(?config, "Build configuration");

    let mut graph = CoocGraph::new();
    DocumentIngestor::new(&mut graph)
        .record_doc_ids(config.record_doc_ids)
        .ingest_file(corpus)
        .with_context(|| format!("Failed to ingest corpus {}", corpus.display()))?;

    if let Some(threshold) = config.chisq_threshold {
        graph.chisq_prune(threshold);
    }
    if config.compact {
        graph.remove_isolated_vertices();
    }

    save(&graph, out)
}

fn load(path: &Path) -> Result<CoocGraph> {
    CoocGraph::read_from_binfile(path)
        .with_context(|| format!("Failed to read graph {}", path.display()))
}

fn save(graph: &CoocGraph, path: &Path) -> Result<()> {
    graph
        .write_to_binfile(path)
        .with_context(|| format!("Failed to write graph {}", path.display()))
}
