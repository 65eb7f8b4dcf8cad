use serde::{Deserialize, Serialize};

/// One equal-width bucket: everything at or below `upper_bound` that did not
/// fit a lower bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub upper_bound: f64,
    pub count: u64,
}

impl Bin {
    pub fn new(upper_bound: f64) -> Self {
        Self { upper_bound, count: 0 }
    }

    pub fn with_count(upper_bound: f64, count: u64) -> Self {
        Self { upper_bound, count }
    }

    pub fn increment(&mut self) {
        self.count += 1;
    }

    /// true when `value` sorts strictly below this bin's upper bound
    pub fn is_above(&self, value: f64) -> bool {
        value < self.upper_bound
    }

    /// Sum two bins covering the same interval.
    ///
    /// # Panics
    /// If the upper bounds differ. Bins from different layouts never meet in a
    /// correct program.
    pub fn merge(a: Bin, b: Bin) -> Bin {
        assert!(
            a.upper_bound.to_bits() == b.upper_bound.to_bits(),
            "merging bins with different upper bounds: {} vs {}",
            a.upper_bound,
            b.upper_bound
        );
        Bin {
            upper_bound: a.upper_bound,
            count: a.count + b.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_counts_up() {
        let mut b = Bin::new(5.0);
        b.increment();
        b.increment();
        assert_eq!(b.count, 2);
    }

    #[test]
    fn merge_adds_counts() {
        let m = Bin::merge(Bin::with_count(5.0, 3), Bin::with_count(5.0, 4));
        assert_eq!(m, Bin::with_count(5.0, 7));
    }

    #[test]
    #[should_panic(expected = "different upper bounds")]
    fn merge_rejects_mismatched_bounds() {
        Bin::merge(Bin::new(5.0), Bin::new(10.0));
    }

    #[test]
    fn ordering_against_value() {
        let b = Bin::new(5.0);
        assert!(b.is_above(4.99));
        assert!(!b.is_above(5.0));
    }
}
