//! Property-based tests for the qubit pool.

use std::collections::BTreeSet;

use proptest::prelude::*;
use qsim_hal::{DeviceError, QubitId, QubitPool};

/// A pool operation. `Release` picks an in-use id by position so every
/// generated sequence stays well-formed.
#[derive(Debug, Clone)]
enum PoolOp {
    Allocate,
    Release(usize),
}

fn arb_pool_op() -> impl Strategy<Value = PoolOp> {
    prop_oneof![
        Just(PoolOp::Allocate),
        any::<usize>().prop_map(PoolOp::Release),
    ]
}

proptest! {
    /// Free and in-use ids partition `0..capacity` after every step.
    #[test]
    fn test_free_and_in_use_partition_ids(
        capacity in 1_usize..=8,
        ops in prop::collection::vec(arb_pool_op(), 0..64),
    ) {
        let mut pool = QubitPool::new(capacity);
        let all: BTreeSet<QubitId> = (0..capacity as u32).map(QubitId).collect();

        for op in ops {
            match op {
                PoolOp::Allocate if pool.free_count() > 0 => {
                    let id = pool.allocate().unwrap();
                    prop_assert!(pool.is_in_use(id));
                }
                PoolOp::Allocate => {
                    prop_assert_eq!(
                        pool.allocate(),
                        Err(DeviceError::PoolExhausted { capacity })
                    );
                }
                PoolOp::Release(pick) => {
                    let in_use = pool.in_use_ids();
                    if in_use.is_empty() {
                        continue;
                    }
                    let id = in_use[pick % in_use.len()];
                    pool.release(id).unwrap();
                    prop_assert!(pool.is_free(id));
                }
            }

            let free: BTreeSet<QubitId> = pool.free_ids().collect();
            let in_use: BTreeSet<QubitId> = pool.in_use_ids().into_iter().collect();
            prop_assert!(free.is_disjoint(&in_use));
            let union: BTreeSet<QubitId> = free.union(&in_use).copied().collect();
            prop_assert_eq!(&union, &all);
            prop_assert_eq!(pool.free_count() + pool.in_use_count(), capacity);
        }
    }
}
