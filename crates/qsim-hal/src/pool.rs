//! Qubit allocation pool.
//!
//! The pool only tracks slot identities. It never touches amplitudes: the
//! reset-before-release contract is enforced one layer up, by the scoped
//! guards in [`crate::guard`].

use std::collections::BTreeSet;

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::error::{DeviceError, DeviceResult};
use crate::qubit::QubitId;

/// Tracks which qubit ids of a register are free and which are in use.
///
/// `free ∪ in_use = {0..capacity}` and the two sets are disjoint at every
/// point between calls.
#[derive(Debug, Clone)]
pub struct QubitPool {
    capacity: usize,
    free: BTreeSet<QubitId>,
    in_use: FxHashSet<QubitId>,
}

impl QubitPool {
    /// Create a pool with every id in `0..capacity` free.
    pub fn new(capacity: usize) -> Self {
        let free = (0..capacity).map(|i| QubitId(i as u32)).collect();
        Self {
            capacity,
            free,
            in_use: FxHashSet::default(),
        }
    }

    /// Take the lowest free id.
    pub fn allocate(&mut self) -> DeviceResult<QubitId> {
        let id = self.free.pop_first().ok_or(DeviceError::PoolExhausted {
            capacity: self.capacity,
        })?;
        self.in_use.insert(id);
        debug!(qubit = %id, free = self.free.len(), "allocated qubit");
        Ok(id)
    }

    /// Return an in-use id to the free set.
    pub fn release(&mut self, id: QubitId) -> DeviceResult<()> {
        if id.index() >= self.capacity {
            return Err(DeviceError::QubitOutOfRange {
                qubit: id,
                capacity: self.capacity,
            });
        }
        if !self.in_use.remove(&id) {
            return Err(DeviceError::DoubleRelease(id));
        }
        self.free.insert(id);
        debug!(qubit = %id, free = self.free.len(), "released qubit");
        Ok(())
    }

    /// Total number of ids managed by the pool.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of ids available for allocation.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Number of ids currently handed out.
    pub fn in_use_count(&self) -> usize {
        self.in_use.len()
    }

    /// Check whether `id` is free.
    pub fn is_free(&self, id: QubitId) -> bool {
        self.free.contains(&id)
    }

    /// Check whether `id` is handed out.
    pub fn is_in_use(&self, id: QubitId) -> bool {
        self.in_use.contains(&id)
    }

    /// Free ids in ascending order.
    pub fn free_ids(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.free.iter().copied()
    }

    /// In-use ids in ascending order.
    pub fn in_use_ids(&self) -> Vec<QubitId> {
        let mut ids: Vec<_> = self.in_use.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}
