use log::debug;
use parhist_common::{ParhistError, Result, Topology};
use parking_lot::Mutex;

use super::Reducer;
use crate::counter::count_partition;
use crate::histogram::Histogram;
use crate::layout::Layout;
use crate::partition::partition;

/// In-process workers on a dedicated rayon pool, merging into one
/// lock-guarded global histogram.
///
/// Each worker holds the lock for its whole bin-by-bin merge, so no two
/// merges ever interleave.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedAccumulator;

impl Reducer for SharedAccumulator {
    fn topology(&self) -> Topology {
        Topology::Shared
    }

    fn run(&self, dataset: &[f64], layout: &Layout, workers: usize) -> Result<Histogram> {
        let parts = partition(dataset.len(), workers)?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("parhist-worker-{i}"))
            .build()
            .map_err(|e| ParhistError::ThreadPool(e.to_string()))?;
        let global = Mutex::new(Histogram::new(*layout));

        // scope returns only after every spawned worker has finished
        pool.scope(|s| {
            for part in &parts {
                let global = &global;
                s.spawn(move |_| {
                    let local = count_partition(part.slice(dataset), layout);
                    debug!("worker {} counted {} values", part.worker, part.len());
                    global.lock().merge_from(local);
                });
            }
        });

        Ok(global.into_inner())
    }
}
