use serde::Serialize;

use crate::bins::Bin;
use crate::layout::Layout;

/// Ordered bins over one [`Layout`]. Used both as a worker's private local
/// histogram and as the global result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    layout: Layout,
    bins: Vec<Bin>,
}

impl Histogram {
    pub fn new(layout: Layout) -> Self {
        Self {
            bins: layout.empty_bins(),
            layout,
        }
    }

    /// Rebuild from raw per-bin counts, e.g. after a collective reduction.
    ///
    /// # Panics
    /// If `counts.len()` differs from the layout's bin count.
    pub fn from_counts(layout: Layout, counts: &[u64]) -> Self {
        assert_eq!(counts.len(), layout.bin_count(), "count vector does not match layout");
        let bins = layout
            .empty_bins()
            .into_iter()
            .zip(counts)
            .map(|(b, &c)| Bin::with_count(b.upper_bound, c))
            .collect();
        Self { layout, bins }
    }

    pub fn record(&mut self, value: f64) {
        let idx = self.layout.classify(value);
        self.bins[idx].increment();
    }

    /// Fold `other` into `self` bin by bin. `other` is consumed.
    ///
    /// # Panics
    /// If the two histograms were built from different layouts.
    pub fn merge_from(&mut self, other: Histogram) {
        assert_eq!(self.layout, other.layout, "merging histograms with different layouts");
        for (mine, theirs) in self.bins.iter_mut().zip(other.bins) {
            *mine = Bin::merge(*mine, theirs);
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    pub fn counts(&self) -> Vec<u64> {
        self.bins.iter().map(|b| b.count).collect()
    }

    pub fn total(&self) -> u64 {
        self.bins.iter().map(|b| b.count).sum()
    }
}
