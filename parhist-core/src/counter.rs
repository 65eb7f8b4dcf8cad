use crate::histogram::Histogram;
use crate::layout::Layout;

/// Count one partition into a fresh private histogram.
///
/// The returned histogram is handed off whole; nothing else observes it while
/// it is being filled.
pub fn count_partition(values: &[f64], layout: &Layout) -> Histogram {
    let mut local = Histogram::new(*layout);
    for &v in values {
        local.record(v);
    }
    local
}
