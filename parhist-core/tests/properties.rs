//! Property tests for the partition/count/merge engine.

use parhist_core::{
    count_partition, merge_locals, partition, CollectiveReduction, Layout, Reducer,
    SharedAccumulator,
};
use proptest::prelude::*;

fn layout_strategy() -> impl Strategy<Value = Layout> {
    (-1000.0f64..1000.0, 0.001f64..500.0, 1usize..64)
        .prop_map(|(min, span, bins)| Layout::new(min, min + span, bins).unwrap())
}

/// Values mostly inside the layout range, with some outliers on either side.
fn dataset_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1500.0f64..2000.0, 0..400)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn partitions_cover_exactly_once(len in 0usize..5000, workers in 1usize..64) {
        let parts = partition(len, workers).unwrap();
        prop_assert_eq!(parts.len(), workers);
        let mut next = 0;
        for p in &parts {
            prop_assert_eq!(p.start, next);
            prop_assert!(p.end >= p.start);
            next = p.end;
        }
        prop_assert_eq!(next, len);
        let base = len / workers;
        prop_assert!(parts[..workers - 1].iter().all(|p| p.len() == base));
        prop_assert!(parts[workers - 1].len() >= base);
    }

    #[test]
    fn shared_conserves_counts(
        data in dataset_strategy(),
        layout in layout_strategy(),
        workers in 1usize..9,
    ) {
        let h = SharedAccumulator.run(&data, &layout, workers).unwrap();
        prop_assert_eq!(h.total(), data.len() as u64);
        prop_assert_eq!(h.bins().len(), layout.bin_count());
    }

    #[test]
    fn distributed_conserves_counts(
        data in dataset_strategy(),
        layout in layout_strategy(),
        workers in 1usize..9,
    ) {
        let h = CollectiveReduction::default().run(&data, &layout, workers).unwrap();
        prop_assert_eq!(h.total(), data.len() as u64);
    }

    #[test]
    fn merge_order_does_not_matter(
        (data, order) in dataset_strategy().prop_flat_map(|d| {
            let w = 6usize;
            (Just(d), Just((0..w).collect::<Vec<_>>()).prop_shuffle())
        }),
        layout in layout_strategy(),
    ) {
        let parts = partition(data.len(), order.len()).unwrap();
        let locals: Vec<_> = parts
            .iter()
            .map(|p| count_partition(p.slice(&data), &layout))
            .collect();
        let in_order = merge_locals(&layout, locals.clone());
        let shuffled = merge_locals(&layout, order.iter().map(|&i| locals[i].clone()));
        prop_assert_eq!(in_order, shuffled);
    }

    #[test]
    fn topologies_are_equivalent(
        data in dataset_strategy(),
        layout in layout_strategy(),
        workers in 1usize..9,
    ) {
        let shared = SharedAccumulator.run(&data, &layout, workers).unwrap();
        let distributed = CollectiveReduction::default().run(&data, &layout, workers).unwrap();
        prop_assert_eq!(shared.counts(), distributed.counts());
        prop_assert_eq!(shared, distributed);
    }

    #[test]
    fn matches_single_pass_count(
        data in dataset_strategy(),
        layout in layout_strategy(),
        workers in 1usize..9,
    ) {
        let whole = count_partition(&data, &layout);
        let shared = SharedAccumulator.run(&data, &layout, workers).unwrap();
        prop_assert_eq!(whole, shared);
    }
}

#[test]
fn max_value_lands_in_last_bin() {
    let layout = Layout::new(0.0, 10.0, 5).unwrap();
    assert_eq!(layout.classify(10.0), 4);
    let h = SharedAccumulator.run(&[10.0], &layout, 1).unwrap();
    assert_eq!(h.counts(), vec![0, 0, 0, 0, 1]);
}

#[test]
fn single_value_over_four_workers() {
    let layout = Layout::new(0.0, 10.0, 2).unwrap();
    let parts = partition(1, 4).unwrap();
    let locals: Vec<_> = parts.iter().map(|p| count_partition(p.slice(&[6.0]), &layout)).collect();
    assert_eq!(locals.iter().filter(|h| h.total() == 0).count(), 3);
    assert_eq!(merge_locals(&layout, locals).counts(), vec![0, 1]);
}
