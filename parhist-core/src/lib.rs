pub mod bins;
pub mod comm;
pub mod counter;
pub mod export;
pub mod generate;
pub mod histogram;
pub mod layout;
pub mod orchestrator;
pub mod partition;
pub mod reader;
pub mod reduce;

pub use bins::Bin;
pub use comm::{Communicator, ProcessGroup, ScatterPayload};
pub use counter::count_partition;
pub use export::{
    export_csv, export_json, print_comparison, print_histogram, print_run_summary, write_csv,
    write_histogram,
};
pub use generate::generate_uniform;
pub use histogram::Histogram;
pub use layout::Layout;
pub use orchestrator::{compare_topologies, HistogramRun, Orchestrator, TopologyComparison};
pub use parhist_common::{ParhistError, Result, Topology};
pub use partition::{partition, Partition};
pub use reader::read_float_column;
pub use reduce::{merge_locals, reducer, CollectiveReduction, Reducer, SharedAccumulator};
