use log::info;
use parhist_common::{ParhistError, Result, Topology};
use serde::Serialize;
use std::time::Instant;

use crate::histogram::Histogram;
use crate::layout::Layout;
use crate::reduce::{reducer, Reducer};

#[derive(Debug, Clone, Serialize)]
pub struct HistogramRun {
    pub topology: Topology,
    pub workers: usize,
    pub value_count: usize,
    pub elapsed_ms: f64,
    pub histogram: Histogram,
}

/// Wires layout, worker count and a reduction topology together.
pub struct Orchestrator {
    layout: Layout,
    workers: usize,
    reducer: Box<dyn Reducer>,
}

impl Orchestrator {
    pub fn new(layout: Layout, workers: usize, topology: Topology) -> Result<Self> {
        Self::with_reducer(layout, workers, reducer(topology))
    }

    pub fn with_reducer(layout: Layout, workers: usize, reducer: Box<dyn Reducer>) -> Result<Self> {
        if workers == 0 {
            return Err(ParhistError::InvalidWorkerCount(workers));
        }
        Ok(Self { layout, workers, reducer })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn topology(&self) -> Topology {
        self.reducer.topology()
    }

    /// Count `dataset` and return the global histogram. Returns only once
    /// every worker's contribution has been merged.
    pub fn run(&self, dataset: &[f64]) -> Result<HistogramRun> {
        info!(
            "histogram of {} values: {} bins over [{}, {}], {} workers, {} topology",
            dataset.len(),
            self.layout.bin_count(),
            self.layout.min(),
            self.layout.max(),
            self.workers,
            self.topology()
        );
        let start = Instant::now();
        let histogram = self.reducer.run(dataset, &self.layout, self.workers)?;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        let total = histogram.total();
        if total != dataset.len() as u64 {
            return Err(ParhistError::Other(format!(
                "lost values during reduction: counted {total} of {}",
                dataset.len()
            )));
        }
        info!("{} topology finished in {elapsed_ms:.3} ms", self.topology());
        Ok(HistogramRun {
            topology: self.topology(),
            workers: self.workers,
            value_count: dataset.len(),
            elapsed_ms,
            histogram,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TopologyComparison {
    pub shared: HistogramRun,
    pub distributed: HistogramRun,
    pub identical: bool,
}

/// Run the same input through both topologies.
pub fn compare_topologies(
    dataset: &[f64],
    layout: Layout,
    workers: usize,
) -> Result<TopologyComparison> {
    let shared = Orchestrator::new(layout, workers, Topology::Shared)?.run(dataset)?;
    let distributed = Orchestrator::new(layout, workers, Topology::Distributed)?.run(dataset)?;
    let identical = shared.histogram == distributed.histogram;
    Ok(TopologyComparison {
        shared,
        distributed,
        identical,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> (Vec<f64>, Layout) {
        (vec![0.5, 1.5, 2.5, 9.9, 10.0], Layout::new(0.0, 10.0, 2).unwrap())
    }

    #[test]
    fn run_reports_final_histogram() {
        let (data, layout) = scenario();
        for topology in [Topology::Shared, Topology::Distributed] {
            let run = Orchestrator::new(layout, 2, topology).unwrap().run(&data).unwrap();
            assert_eq!(run.topology, topology);
            assert_eq!(run.value_count, 5);
            assert_eq!(run.histogram.counts(), vec![3, 2]);
            assert_eq!(run.histogram.bins()[0].upper_bound, 5.0);
        }
    }

    #[test]
    fn zero_workers_rejected_up_front() {
        let (_, layout) = scenario();
        assert!(matches!(
            Orchestrator::new(layout, 0, Topology::Distributed),
            Err(ParhistError::InvalidWorkerCount(0))
        ));
    }

    #[test]
    fn degenerate_partitions_do_not_change_totals() {
        let layout = Layout::new(0.0, 10.0, 5).unwrap();
        let run = Orchestrator::new(layout, 4, Topology::Shared).unwrap().run(&[7.5]).unwrap();
        assert_eq!(run.histogram.counts(), vec![0, 0, 0, 1, 0]);
    }

    #[test]
    fn topologies_agree() {
        let (data, layout) = scenario();
        let cmp = compare_topologies(&data, layout, 3).unwrap();
        assert!(cmp.identical);
        assert_eq!(cmp.shared.histogram, cmp.distributed.histogram);
    }
}
