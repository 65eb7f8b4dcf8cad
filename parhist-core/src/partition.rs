use parhist_common::{ParhistError, Result};
use serde::Serialize;
use std::ops::Range;

/// Contiguous `[start, end)` slice of the dataset owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Partition {
    pub worker: usize,
    pub start: usize,
    pub end: usize,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn slice<'a>(&self, data: &'a [f64]) -> &'a [f64] {
        &data[self.range()]
    }
}

/// Split `len` elements into `workers` contiguous ranges.
///
/// The first `workers - 1` ranges get `len / workers` elements each and the
/// last one takes whatever is left, so it is never shorter than the others.
/// When `len < workers` the leading ranges are empty.
pub fn partition(len: usize, workers: usize) -> Result<Vec<Partition>> {
    if workers == 0 {
        return Err(ParhistError::InvalidWorkerCount(workers));
    }
    let base = len / workers;
    let mut parts: Vec<Partition> = (0..workers - 1)
        .map(|w| Partition {
            worker: w,
            start: base * w,
            end: base * (w + 1),
        })
        .collect();
    // last partition absorbs the remainder
    parts.push(Partition {
        worker: workers - 1,
        start: base * (workers - 1),
        end: len,
    });
    Ok(parts)
}
