//! Device trait, qubit capability traits and configuration.
//!
//! Protocol code is written against [`QuantumDevice`] and the narrowest
//! qubit trait that covers the gates it needs:
//!
//! ```text
//!                 Qubit  (h, measure, reset)
//!          ┌────────┼───────────┐
//!   PauliQubit  RotationQubit  EntanglingQubit
//!   (x, y, z)   (rx, ry, rz)   (cnot, swap)
//! ```
//!
//! A single-qubit device implements the first three but never
//! `EntanglingQubit`, so a protocol that asks for `cnot` will not compile
//! against it.
//!
//! ## Method table
//!
//! | Method | Kind | Returns |
//! |--------|------|---------|
//! | `capabilities()` | required | `&Capabilities` |
//! | `allocate_qubit()` | required | `DeviceResult<Self::Qubit>` |
//! | `deallocate_qubit()` | required | `DeviceResult<()>` |
//! | `using_qubit()` | provided | `DeviceResult<QubitGuard>` |
//! | `using_register()` | provided | `DeviceResult<RegisterGuard>` |
//! | `with_qubit()` | provided | `DeviceResult<T>` |
//! | `with_register()` | provided | `DeviceResult<T>` |

use serde::{Deserialize, Serialize};

use crate::capability::Capabilities;
use crate::error::DeviceResult;
use crate::guard::{QubitGuard, RegisterGuard};
use crate::qubit::QubitId;

/// Default register capacity when none is configured.
pub const DEFAULT_CAPACITY: usize = 3;

/// Configuration for a device instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Name of the device.
    pub name: String,
    /// Number of qubits in the register.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Seed for measurement sampling. `None` draws from OS entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl DeviceConfig {
    /// Create a configuration with the default capacity and no seed.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capacity: DEFAULT_CAPACITY,
            seed: None,
        }
    }

    /// Set the register capacity.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Seed the measurement RNG for reproducible runs.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::new("simulator")
    }
}

/// Operations every qubit handle supports.
///
/// Handles are capability tokens: they carry a slot id and a non-owning
/// reference to the device, never amplitude data. Every operation returns a
/// [`DeviceResult`] because the device may already be gone.
pub trait Qubit {
    /// The slot this handle refers to.
    fn id(&self) -> QubitId;

    /// Apply the Hadamard gate.
    fn h(&self) -> DeviceResult<()>;

    /// Projective measurement in the computational basis. Collapses the state.
    fn measure(&self) -> DeviceResult<bool>;

    /// Drive the qubit to |0⟩ using only measurement and X.
    fn reset(&self) -> DeviceResult<()>;
}

/// Pauli gates.
pub trait PauliQubit: Qubit {
    /// Pauli-X (bit flip).
    fn x(&self) -> DeviceResult<()>;

    /// Pauli-Y.
    fn y(&self) -> DeviceResult<()>;

    /// Pauli-Z (phase flip).
    fn z(&self) -> DeviceResult<()>;
}

/// Rotations about the Bloch-sphere axes, `R_σ(θ) = exp(-iθσ/2)`.
pub trait RotationQubit: Qubit {
    /// Rotation about X by `angle` radians.
    fn rx(&self, angle: f64) -> DeviceResult<()>;

    /// Rotation about Y by `angle` radians.
    fn ry(&self, angle: f64) -> DeviceResult<()>;

    /// Rotation about Z by `angle` radians.
    fn rz(&self, angle: f64) -> DeviceResult<()>;
}

/// Two-qubit gates. Both handles must come from the same device.
pub trait EntanglingQubit: Qubit {
    /// Controlled-NOT with `self` as control.
    fn cnot(&self, target: &Self) -> DeviceResult<()>;

    /// Exchange the states of `self` and `other`.
    fn swap(&self, other: &Self) -> DeviceResult<()>;
}

/// Trait for quantum devices.
///
/// Implementors provide raw allocation; the scoped helpers are derived from
/// those two primitives and guarantee reset-then-release on every exit path.
///
/// # Contract
///
/// - `allocate_qubit()` always hands out a qubit in |0⟩.
/// - `deallocate_qubit()` drives the qubit to |0⟩ by measurement before it
///   goes back to the pool. A handle minted by another device is rejected
///   with [`ForeignQubit`](crate::DeviceError::ForeignQubit) and left
///   untouched.
pub trait QuantumDevice {
    /// Handle type this device mints.
    type Qubit: Qubit;

    /// Get the capabilities of this device.
    fn capabilities(&self) -> &Capabilities;

    /// Take a free qubit from the pool.
    fn allocate_qubit(&self) -> DeviceResult<Self::Qubit>;

    /// Reset a qubit and return it to the pool.
    fn deallocate_qubit(&self, qubit: Self::Qubit) -> DeviceResult<()>;

    /// Acquire one qubit for the lifetime of the returned guard.
    fn using_qubit(&self) -> DeviceResult<QubitGuard<'_, Self>>
    where
        Self: Sized,
    {
        QubitGuard::acquire(self)
    }

    /// Acquire `n_qubits` qubits for the lifetime of the returned guard.
    fn using_register(&self, n_qubits: usize) -> DeviceResult<RegisterGuard<'_, Self>>
    where
        Self: Sized,
    {
        RegisterGuard::acquire(self, n_qubits)
    }

    /// Run `f` with a scoped qubit.
    ///
    /// If `f` fails its error is returned even when the release also fails.
    fn with_qubit<T, F>(&self, f: F) -> DeviceResult<T>
    where
        Self: Sized,
        F: FnOnce(&Self::Qubit) -> DeviceResult<T>,
    {
        let guard = self.using_qubit()?;
        let outcome = f(guard.qubit());
        let released = guard.release();
        let value = outcome?;
        released?;
        Ok(value)
    }

    /// Run `f` with `n_qubits` scoped qubits.
    fn with_register<T, F>(&self, n_qubits: usize, f: F) -> DeviceResult<T>
    where
        Self: Sized,
        F: FnOnce(&[Self::Qubit]) -> DeviceResult<T>,
    {
        let guard = self.using_register(n_qubits)?;
        let outcome = f(guard.qubits());
        let released = guard.release();
        let value = outcome?;
        released?;
        Ok(value)
    }
}

/// Trait for creating devices from configuration.
pub trait DeviceFactory: QuantumDevice + Sized {
    /// Create a device from configuration.
    fn from_config(config: DeviceConfig) -> DeviceResult<Self>;
}
