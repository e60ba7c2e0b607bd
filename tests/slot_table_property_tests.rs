//! Property-based tests (proptest) for the content-addressed sequence
//! trees: round-trips, random access, and injectivity of interning.

use groundplan::intern::{SequenceTable, SlotTable};
use proptest::prelude::*;

fn sorted_sequence() -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::vec(0u32..10_000, 0..64).prop_map(|mut values| {
        values.sort_unstable();
        values.dedup();
        values
    })
}

proptest! {
    #[test]
    fn prop_iterate_roundtrips(sequence in sorted_sequence()) {
        let mut table = SequenceTable::new();
        let root = table.intern_sorted(&sequence).unwrap();
        prop_assert_eq!(table.decode(root), sequence.clone());
        prop_assert_eq!(table.length(root), sequence.len());
    }

    #[test]
    fn prop_lookup_matches_indexing(sequence in sorted_sequence()) {
        let mut table = SequenceTable::new();
        let root = table.intern_sorted(&sequence).unwrap();
        for (k, &expected) in sequence.iter().enumerate() {
            prop_assert_eq!(table.lookup(root, k), expected);
        }
    }

    #[test]
    fn prop_roots_equal_iff_sequences_equal(
        left in sorted_sequence(),
        right in sorted_sequence(),
    ) {
        let mut table = SequenceTable::new();
        let left_root = table.intern_sorted(&left).unwrap();
        let right_root = table.intern_sorted(&right).unwrap();
        prop_assert_eq!(left_root == right_root, left == right);
    }

    #[test]
    fn prop_interning_is_insertion_order_independent(
        sequences in proptest::collection::vec(sorted_sequence(), 1..8),
    ) {
        // Interning the same sequences in two different orders yields
        // the same root for each sequence.
        let mut forward = SequenceTable::new();
        let forward_roots: Vec<u32> = sequences
            .iter()
            .map(|s| forward.intern_sorted(s).unwrap())
            .collect();

        let mut backward = SequenceTable::new();
        let mut backward_roots: Vec<u32> = sequences
            .iter()
            .rev()
            .map(|s| backward.intern_sorted(s).unwrap())
            .collect();
        backward_roots.reverse();

        for (index, sequence) in sequences.iter().enumerate() {
            prop_assert_eq!(forward.decode(forward_roots[index]), sequence.clone());
            prop_assert_eq!(backward.decode(backward_roots[index]), sequence.clone());
        }
    }

    #[test]
    fn prop_slot_interning_is_idempotent(pairs in proptest::collection::vec((any::<u32>(), any::<u32>()), 1..64)) {
        let mut table = SlotTable::new();
        let first: Vec<u32> = pairs.iter().map(|&(l, r)| table.intern(l, r).unwrap()).collect();
        let second: Vec<u32> = pairs.iter().map(|&(l, r)| table.intern(l, r).unwrap()).collect();
        prop_assert_eq!(&first, &second);
        for (&(l, r), &index) in pairs.iter().zip(first.iter()) {
            prop_assert_eq!(table.get(index), (l, r));
        }
    }
}
