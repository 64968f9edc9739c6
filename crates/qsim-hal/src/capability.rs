//! Device capability introspection.
//!
//! A device advertises the qubit count it offers and the gate names its
//! handles implement. The advertised set must match the qubit traits the
//! device's handle type actually implements: a device listing `cx` has a
//! handle type implementing [`EntanglingQubit`](crate::device::EntanglingQubit).

use serde::{Deserialize, Serialize};

/// Capabilities of a quantum device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the device.
    pub name: String,
    /// Number of qubits the device can hand out at once.
    pub num_qubits: u32,
    /// Supported gate set (OpenQASM 3 naming).
    pub gate_set: GateSet,
    /// Whether this is a simulator (`true`) or real hardware (`false`).
    pub is_simulator: bool,
}

impl Capabilities {
    /// Capabilities of a multi-qubit statevector simulator.
    pub fn simulator(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            gate_set: GateSet::full(),
            is_simulator: true,
        }
    }

    /// Capabilities of a single-qubit simulator: no two-qubit gates.
    pub fn single_qubit(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            num_qubits: 1,
            gate_set: GateSet::single_qubit(),
            is_simulator: true,
        }
    }
}

/// Gates a device implements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSet {
    /// Single-qubit gates supported.
    pub single_qubit: Vec<String>,
    /// Two-qubit gates supported.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub two_qubit: Vec<String>,
}

impl GateSet {
    /// The minimal set every device offers: Hadamard plus measurement and reset.
    pub fn minimal() -> Self {
        Self {
            single_qubit: vec!["h".into(), "measure".into(), "reset".into()],
            two_qubit: vec![],
        }
    }

    /// Paulis and rotations on top of the minimal set.
    pub fn single_qubit() -> Self {
        let mut set = Self::minimal();
        set.single_qubit.extend(
            ["x", "y", "z", "rx", "ry", "rz"]
                .into_iter()
                .map(String::from),
        );
        set
    }

    /// Everything, including the entangling gates.
    pub fn full() -> Self {
        let mut set = Self::single_qubit();
        set.two_qubit = vec!["cx".into(), "swap".into()];
        set
    }

    /// Check if a gate is supported.
    pub fn contains(&self, gate: &str) -> bool {
        self.single_qubit.iter().any(|g| g == gate) || self.two_qubit.iter().any(|g| g == gate)
    }

    /// Whether any two-qubit gate is available.
    pub fn is_entangling(&self) -> bool {
        !self.two_qubit.is_empty()
    }
}
