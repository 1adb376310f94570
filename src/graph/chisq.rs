//! Chi-square scoring and pruning of co-occurrence edges

use serde::Serialize;

use super::CoocGraph;

/// Counters of one pruning pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PruneStats {
    /// Edges scored
    pub scored: usize,
    /// Edges physically removed
    pub removed: usize,
}

/// Association score of a term pair
///
/// `o11` is the number of documents containing both terms, `cfreq_i` and
/// `cfreq_j` the document frequencies of the source and target term and
/// `doc_n` the corpus size. Contingency cells:
///
/// ```text
/// o12 = cfreq_i - o11
/// o21 = cfreq_j - o11
/// o22 = doc_n - (cfreq_i + cfreq_j - o11)
/// a   = o11*o22 - o12*o21
/// b   = (o11+o12) * (o11+o21) * (o12+o22) + (o21+o22)
/// chisq = doc_n * a^2 / b
/// ```
///
/// The last term of `b` is added, not multiplied, so this is not the
/// textbook statistic and it is not symmetric in `i`/`j`. Cell arithmetic
/// is done in `i128`; `doc_n * a^2` is exact while it fits and falls back to
/// `f64` otherwise. A zero denominator (both terms in every document)
/// scores `0.0`.
///
/// ```
/// use coocgraph::graph::chi_square;
///
/// assert_eq!(chi_square(3, 4, 5, 10), 1000.0 / 106.0);
/// ```
pub fn chi_square(o11: usize, cfreq_i: usize, cfreq_j: usize, doc_n: usize) -> f64 {
    let (o11, ci, cj, n) = (o11 as i128, cfreq_i as i128, cfreq_j as i128, doc_n as i128);

    let o12 = ci - o11;
    let o21 = cj - o11;
    let o22 = n - (ci + cj - o11);

    let a = o11.saturating_mul(o22).saturating_sub(o12.saturating_mul(o21));
    let b = (o11 + o12)
        .saturating_mul(o11 + o21)
        .saturating_mul(o12 + o22)
        .saturating_add(o21 + o22);

    if b == 0 {
        return 0.0;
    }

    let numerator = a
        .checked_mul(a)
        .and_then(|a2| a2.checked_mul(n))
        .map(|v| v as f64)
        .unwrap_or_else(|| n as f64 * (a as f64) * (a as f64));

    numerator / b as f64
}

impl CoocGraph {
    /// Score every edge and drop those below `threshold`
    ///
    /// The co-occurrence count of a surviving edge is replaced by its score.
    /// Edges scoring below the threshold are zeroed, then every edge whose
    /// value is exactly `0.0` is removed. Node ids are unchanged, edge ids
    /// are renumbered.
    ///
    /// A NaN `threshold` compares false against every score, so it is
    /// rejected with a warning and the graph is left untouched.
    pub fn chisq_prune(&mut self, threshold: f32) -> PruneStats {
        if threshold.is_nan() {
            tracing::warn!("NaN chi-square threshold, pruning skipped");
            return PruneStats::default();
        }

        let doc_n = self.doc_count();
        let scored = self.edge_count();
        let threshold = f64::from(threshold);

        for e in 0..scored {
            let edge = &self.edges()[e];
            let o11 = edge.freq as usize;
            let cfreq_i = self.nodes()[edge.source].cfreq;
            let cfreq_j = self.nodes()[edge.target].cfreq;

            let chisq = chi_square(o11, cfreq_i, cfreq_j, doc_n);
            let score = if chisq < threshold { 0.0 } else { chisq as f32 };

            if let Some(edge) = self.edge_mut(e) {
                edge.freq = score;
            }
        }

        let removed = self.retain_edges(|edge| edge.freq != 0.0);

        tracing::info!(
            threshold,
            scored,
            removed,
            remaining = self.edge_count(),
            "Chi-square pruning complete"
        );
        PruneStats { scored, removed }
    }
}
