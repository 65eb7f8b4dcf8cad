pub mod distributed;
pub mod shared;

pub use distributed::CollectiveReduction;
pub use shared::SharedAccumulator;

use parhist_common::{Result, Topology};

use crate::histogram::Histogram;
use crate::layout::Layout;

/// Runs `workers` local counters over `dataset` and reduces their local
/// histograms into one global histogram.
///
/// Implementations differ only in how partial results are exchanged; for the
/// same input every implementation yields the same counts.
pub trait Reducer: Send + Sync {
    fn topology(&self) -> Topology;

    fn run(&self, dataset: &[f64], layout: &Layout, workers: usize) -> Result<Histogram>;
}

pub fn reducer(topology: Topology) -> Box<dyn Reducer> {
    match topology {
        Topology::Shared => Box::new(SharedAccumulator),
        Topology::Distributed => Box::new(CollectiveReduction::default()),
    }
}

/// Sequentially fold local histograms into a fresh global one.
pub fn merge_locals<I>(layout: &Layout, locals: I) -> Histogram
where
    I: IntoIterator<Item = Histogram>,
{
    locals.into_iter().fold(Histogram::new(*layout), |mut global, local| {
        global.merge_from(local);
        global
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::count_partition;

    #[test]
    fn reducer_matches_topology() {
        assert_eq!(reducer(Topology::Shared).topology(), Topology::Shared);
        assert_eq!(reducer(Topology::Distributed).topology(), Topology::Distributed);
    }

    #[test]
    fn merge_locals_of_nothing_is_empty() {
        let layout = Layout::new(0.0, 1.0, 3).unwrap();
        assert_eq!(merge_locals(&layout, Vec::new()).counts(), vec![0, 0, 0]);
    }

    #[test]
    fn merge_order_is_irrelevant() {
        let layout = Layout::new(0.0, 10.0, 5).unwrap();
        let locals = || {
            vec![
                count_partition(&[0.1, 9.0], &layout),
                count_partition(&[4.4, 4.5, 10.0], &layout),
                count_partition(&[], &layout),
            ]
        };
        let forward = merge_locals(&layout, locals());
        let backward = merge_locals(&layout, locals().into_iter().rev());
        assert_eq!(forward, backward);
        assert_eq!(forward.counts(), vec![1, 0, 2, 0, 2]);
    }
}
