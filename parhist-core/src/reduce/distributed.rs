use log::debug;
use parhist_common::{ParhistError, Result, Topology};

use super::Reducer;
use crate::comm::{ProcessGroup, ScatterPayload};
use crate::counter::count_partition;
use crate::histogram::Histogram;
use crate::layout::Layout;

/// Independent ranks with no shared state: the root scatters padded slices,
/// every rank counts its own, and a sum-reduce materializes the global
/// histogram at the root.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectiveReduction {
    root: usize,
}

impl CollectiveReduction {
    pub fn with_root(root: usize) -> Self {
        Self { root }
    }
}

impl Reducer for CollectiveReduction {
    fn topology(&self) -> Topology {
        Topology::Distributed
    }

    fn run(&self, dataset: &[f64], layout: &Layout, workers: usize) -> Result<Histogram> {
        let group = ProcessGroup::new(workers)?;
        let root = self.root;
        let layout = *layout;
        debug!(
            "scattering {} values from root {root} across {} ranks",
            dataset.len(),
            group.size()
        );

        let per_rank = group.run(|comm| {
            // only the root ever reads the dataset
            let payload = comm
                .is_root(root)
                .then(|| ScatterPayload::pad(dataset, comm.size()));
            let mine = comm.scatter(root, payload)?;
            let local = count_partition(&mine, &layout);
            debug!("rank {} counted {} values", comm.rank(), mine.len());
            let reduced = comm.reduce_sum(root, local.counts())?;
            Ok(reduced.map(|counts| Histogram::from_counts(layout, &counts)))
        })?;

        per_rank.into_iter().flatten().next().ok_or_else(|| {
            ParhistError::CollectiveDesync(format!("root {root} finished without a result"))
        })
    }
}
