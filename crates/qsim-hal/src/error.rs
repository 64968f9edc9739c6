//! Error types for the HAL crate.

use thiserror::Error;

use crate::qubit::QubitId;

/// Errors that can occur in device operations.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum DeviceError {
    /// An operator was requested on a slot count other than 1 or 2.
    #[error("Only one- and two-qubit operators are supported, got {got} qubits")]
    UnsupportedArity {
        /// Number of slots the operator was asked to act on.
        got: usize,
    },

    /// No free qubit is left in the pool.
    #[error("Qubit pool exhausted: all {capacity} qubits are in use")]
    PoolExhausted {
        /// Capacity of the exhausted pool.
        capacity: usize,
    },

    /// A qubit was released while it was already free.
    #[error("Qubit {0} released twice")]
    DoubleRelease(QubitId),

    /// Measurement probabilities are ill-defined (NaN, negative, or not
    /// normalized). The state vector is no longer unit-norm.
    #[error("Internal consistency failure: {0}")]
    InternalConsistency(String),

    /// A qubit id does not name a slot of the register.
    #[error("Qubit {qubit} out of range for a register of {capacity} qubits")]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Register capacity.
        capacity: usize,
    },

    /// The same qubit appears twice in one operation.
    #[error("Duplicate qubit {0} in operation")]
    DuplicateQubit(QubitId),

    /// Operator matrix dimension does not match the number of slots.
    #[error("Operator has dimension {got}, expected {expected}")]
    OperatorShape {
        /// Expected dimension (2 or 4).
        expected: usize,
        /// Actual dimension of the matrix.
        got: usize,
    },

    /// Requested register capacity is not supported.
    #[error("Invalid capacity {requested}: must be between 1 and {max}")]
    InvalidCapacity {
        /// Capacity asked for.
        requested: usize,
        /// Largest supported capacity.
        max: usize,
    },

    /// A qubit handle was passed to a device that did not allocate it.
    #[error("Qubit {0} belongs to a different device")]
    ForeignQubit(QubitId),

    /// The device owning this qubit handle has been dropped.
    #[error("Qubit {0} outlived its device")]
    DetachedQubit(QubitId),
}

/// Result type for device operations.
pub type DeviceResult<T> = Result<T, DeviceError>;
