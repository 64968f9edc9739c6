//! Qubit identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one tensor-factor slot of a register.
///
/// Ids are the integers `0..capacity`, minted once per register and stable
/// for its lifetime. Slot 0 is the leftmost (most significant) factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// The slot index as a `usize`.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}
