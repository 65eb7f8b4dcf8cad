use parhist_common::{ParhistError, Result};
use serde::Serialize;

use crate::bins::Bin;

/// Equal-width bin boundaries over `[min, max]`, shared by every worker.
///
/// Only constructible through [`Layout::new`], so a `Layout` in hand is always
/// valid: `bin_count > 0`, finite bounds, `max > min`, finite non-zero width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Layout {
    min: f64,
    max: f64,
    bin_count: usize,
}

impl Layout {
    pub fn new(min: f64, max: f64, bin_count: usize) -> Result<Self> {
        if bin_count == 0 {
            return Err(ParhistError::InvalidLayout("bin count must be positive".into()));
        }
        if !min.is_finite() || !max.is_finite() {
            return Err(ParhistError::InvalidLayout(format!(
                "bounds must be finite, got [{min}, {max}]"
            )));
        }
        if max <= min {
            return Err(ParhistError::InvalidLayout(format!(
                "max ({max}) must exceed min ({min})"
            )));
        }
        let width = (max - min) / bin_count as f64;
        if !width.is_finite() || width <= 0.0 {
            return Err(ParhistError::InvalidLayout(format!(
                "[{min}, {max}] cannot be split into {bin_count} bins of finite, non-zero width"
            )));
        }
        Ok(Self { min, max, bin_count })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    pub fn width(&self) -> f64 {
        (self.max - self.min) / self.bin_count as f64
    }

    /// Bin index for `value`, clamped into `[0, bin_count - 1]`.
    ///
    /// Values outside `[min, max]` land in the nearest edge bin rather than
    /// being rejected. NaN lands in bin 0.
    pub fn classify(&self, value: f64) -> usize {
        let last = self.bin_count - 1;
        let pos = ((value - self.min) / self.width()).floor();
        if pos.is_nan() || pos <= 0.0 {
            0
        } else if pos >= last as f64 {
            last
        } else {
            pos as usize
        }
    }

    pub fn upper_bound(&self, index: usize) -> f64 {
        if index + 1 >= self.bin_count {
            self.max
        } else {
            self.min + self.width() * (index + 1) as f64
        }
    }

    pub fn empty_bins(&self) -> Vec<Bin> {
        (0..self.bin_count).map(|i| Bin::new(self.upper_bound(i))).collect()
    }
}
