/*!
 * Invariant Property Tests
 * Random operation sequences must never break the block list
 */

use partition_sim::memory::{MemoryError, MemoryModel};
use proptest::prelude::*;
use std::collections::HashMap;

const NAMES: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

#[derive(Debug, Clone)]
enum Op {
    Allocate(usize, usize),
    Free(usize),
    Compact,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..NAMES.len(), 1usize..24).prop_map(|(name, size)| Op::Allocate(name, size)),
        3 => (0..NAMES.len()).prop_map(Op::Free),
        1 => Just(Op::Compact),
    ]
}

proptest! {
    #[test]
    fn prop_operations_preserve_invariants(
        capacity in 1usize..96,
        ops in prop::collection::vec(op_strategy(), 1..64),
    ) {
        let mut model = MemoryModel::new(capacity).unwrap();
        let mut loaded: HashMap<&str, usize> = HashMap::new();

        for op in ops {
            match op {
                Op::Allocate(index, size) => {
                    let name = NAMES[index];
                    let free_before = model.external_fragmentation().total_free;
                    match model.allocate(name, size) {
                        Ok(_) => {
                            prop_assert!(!loaded.contains_key(name));
                            loaded.insert(name, size);
                            prop_assert_eq!(
                                model.external_fragmentation().total_free,
                                free_before - size
                            );
                        }
                        Err(MemoryError::DuplicateName(_)) => {
                            prop_assert!(loaded.contains_key(name));
                        }
                        Err(MemoryError::InsufficientSpace { largest_free, .. }) => {
                            prop_assert!(largest_free < size);
                        }
                        Err(other) => prop_assert!(false, "unexpected error {:?}", other),
                    }
                }
                Op::Free(index) => {
                    let name = NAMES[index];
                    match model.free(name) {
                        Ok(size) => prop_assert_eq!(loaded.remove(name), Some(size)),
                        Err(MemoryError::NotFound(_)) => prop_assert!(!loaded.contains_key(name)),
                        Err(other) => prop_assert!(false, "unexpected error {:?}", other),
                    }
                }
                Op::Compact => {
                    model.compact();
                    let once = model.blocks().to_vec();
                    model.compact();
                    prop_assert_eq!(model.blocks(), once.as_slice());
                    prop_assert!(model.external_fragmentation().free_blocks <= 1);
                }
            }

            prop_assert_eq!(model.verify(), Ok(()));
            prop_assert_eq!(model.used_memory(), loaded.values().sum::<usize>());
            for (name, size) in &loaded {
                prop_assert_eq!(model.find(name).map(|block| block.size), Some(*size));
            }
        }
    }

    #[test]
    fn prop_compaction_keeps_relative_order(
        sizes in prop::collection::vec(1usize..10, 1..6),
        freed in prop::collection::vec(any::<bool>(), 6),
    ) {
        let capacity: usize = sizes.iter().sum::<usize>() + 5;
        let mut model = MemoryModel::new(capacity).unwrap();
        for (index, size) in sizes.iter().enumerate() {
            model.allocate(NAMES[index], *size).unwrap();
        }
        for (index, free) in freed.iter().enumerate().take(sizes.len()) {
            if *free {
                model.free(NAMES[index]).unwrap();
            }
        }

        let order_before: Vec<String> = model
            .blocks()
            .iter()
            .filter_map(|block| block.owner.process().map(|name| name.to_string()))
            .collect();
        model.compact();
        let order_after: Vec<String> = model
            .blocks()
            .iter()
            .filter_map(|block| block.owner.process().map(|name| name.to_string()))
            .collect();

        prop_assert_eq!(order_before, order_after);
        prop_assert_eq!(model.blocks()[0].start, 0);
        prop_assert!(model.blocks().last().unwrap().is_free());
    }
}
