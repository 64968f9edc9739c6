//! Register state: the joint state vector and the operations on it.

use std::fmt;

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use qsim_hal::{DeviceError, DeviceResult, QubitId};

use crate::expand::expand;
use crate::gate::{StandardGate, projector};

/// Largest supported register. Expanded operators are dense `4^n` matrices.
pub const MAX_CAPACITY: usize = 10;

/// Allowed drift of the total measurement probability away from 1.
pub const PROBABILITY_TOLERANCE: f64 = 1e-8;

/// A fixed-capacity register of qubits sharing one state vector.
pub struct RegisterState {
    /// The state amplitudes (2^n complex numbers).
    state: Array1<Complex64>,
    /// Number of qubits.
    capacity: usize,
    /// Measurement sampling source.
    rng: StdRng,
}

impl RegisterState {
    /// Create a register initialized to |0...0⟩.
    ///
    /// `seed` makes measurement outcomes reproducible; `None` seeds from OS
    /// entropy.
    pub fn new(capacity: usize, seed: Option<u64>) -> DeviceResult<Self> {
        if !(1..=MAX_CAPACITY).contains(&capacity) {
            return Err(DeviceError::InvalidCapacity {
                requested: capacity,
                max: MAX_CAPACITY,
            });
        }
        let mut state = Array1::zeros(1 << capacity);
        state[0] = Complex64::new(1.0, 0.0);
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Ok(Self {
            state,
            capacity,
            rng,
        })
    }

    /// Get the number of qubits.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// L2 norm of the state vector.
    pub fn norm(&self) -> f64 {
        norm_sqr(&self.state).sqrt()
    }

    /// Left-multiply the state by `operator` expanded onto `slots`.
    pub fn apply(&mut self, operator: &Array2<Complex64>, slots: &[QubitId]) -> DeviceResult<()> {
        let expanded = expand(operator, slots, self.capacity)?;
        self.state = expanded.dot(&self.state);
        Ok(())
    }

    /// Apply a standard gate to `slots`.
    pub fn apply_gate(&mut self, gate: StandardGate, slots: &[QubitId]) -> DeviceResult<()> {
        if slots.len() != gate.num_qubits() {
            return Err(DeviceError::UnsupportedArity { got: slots.len() });
        }
        trace!(%gate, ?slots, "apply gate");
        self.apply(&gate.matrix(), slots)
    }

    /// Probabilities of reading 0 and 1 on `slot`, without collapsing.
    pub fn probabilities(&self, slot: QubitId) -> DeviceResult<[f64; 2]> {
        let [(_, p0), (_, p1)] = self.branches(slot)?;
        Ok([p0, p1])
    }

    /// Projective measurement of `slot`; collapses and renormalizes the state.
    #[instrument(level = "trace", skip(self))]
    pub fn measure(&mut self, slot: QubitId) -> DeviceResult<bool> {
        let [(zero, p0), (one, p1)] = self.branches(slot)?;
        let outcome = sample_outcome(&mut self.rng, [p0, p1])?;
        let (branch, probability) = if outcome { (one, p1) } else { (zero, p0) };
        let norm = probability.sqrt();
        self.state = branch.mapv(|amp| amp / norm);
        debug!(qubit = %slot, outcome, p0, p1, "measured");
        Ok(outcome)
    }

    /// Drive `slot` to |0⟩: measure, then flip on outcome 1.
    pub fn reset(&mut self, slot: QubitId) -> DeviceResult<()> {
        if self.measure(slot)? {
            self.apply_gate(StandardGate::X, &[slot])?;
        }
        Ok(())
    }

    /// Snapshot of the current state vector.
    pub fn dump(&self) -> StateDump {
        StateDump {
            capacity: self.capacity,
            amplitudes: self.state.to_vec(),
        }
    }

    /// Un-normalized post-measurement candidates and their probabilities.
    fn branches(&self, slot: QubitId) -> DeviceResult<[(Array1<Complex64>, f64); 2]> {
        let branch = |outcome: bool| -> DeviceResult<(Array1<Complex64>, f64)> {
            let projected = expand(&projector(outcome), &[slot], self.capacity)?.dot(&self.state);
            let probability = norm_sqr(&projected);
            Ok((projected, probability))
        };
        let zero = branch(false)?;
        let one = branch(true)?;
        check_probabilities([zero.1, one.1])?;
        Ok([zero, one])
    }
}

fn norm_sqr(v: &Array1<Complex64>) -> f64 {
    v.iter().map(Complex64::norm_sqr).sum()
}

/// Reject probabilities that cannot come from a unit-norm state.
pub(crate) fn check_probabilities(probs: [f64; 2]) -> DeviceResult<()> {
    if probs.iter().any(|p| !p.is_finite() || *p < -PROBABILITY_TOLERANCE) {
        return Err(DeviceError::InternalConsistency(format!(
            "ill-defined measurement probabilities {probs:?}"
        )));
    }
    let total = probs[0] + probs[1];
    if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(DeviceError::InternalConsistency(format!(
            "measurement probabilities sum to {total}, state is not normalized"
        )));
    }
    Ok(())
}

/// Draw an outcome: 1 iff a uniform sample in `[0, 1)` is at least `Pr(0)`.
pub(crate) fn sample_outcome<R: Rng>(rng: &mut R, probs: [f64; 2]) -> DeviceResult<bool> {
    let r: f64 = rng.r#gen();
    let outcome = r >= probs[0];
    if probs[usize::from(outcome)] <= 0.0 {
        return Err(DeviceError::InternalConsistency(format!(
            "sampled outcome {} has zero probability",
            u8::from(outcome)
        )));
    }
    Ok(outcome)
}

/// A snapshot of a state vector, for diagnostics.
///
/// Displays one `|bits⟩: amplitude` line per basis state with slot 0 as the
/// leftmost bit. The format is for humans and carries no stability promise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDump {
    /// Number of qubits.
    pub capacity: usize,
    /// Amplitudes indexed by basis state.
    pub amplitudes: Vec<Complex64>,
}

impl StateDump {
    /// Probability of basis state `index`, or 0 for an out-of-range index.
    pub fn probability(&self, index: usize) -> f64 {
        self.amplitudes.get(index).map_or(0.0, Complex64::norm_sqr)
    }

    /// Bit-string label of basis state `index`.
    pub fn label(&self, index: usize) -> String {
        format!("{index:0width$b}", width = self.capacity)
    }
}

impl fmt::Display for StateDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, amp) in self.amplitudes.iter().enumerate() {
            writeln!(
                f,
                "|{}⟩: {:+.6}{:+.6}i",
                self.label(index),
                amp.re,
                amp.im
            )?;
        }
        Ok(())
    }
}
