//! Single-qubit simulator.
//!
//! The capacity-1 case of [`Simulator`](crate::Simulator): the state is two
//! amplitudes, gates are applied as plain 2×2 products and measurement reads
//! `|⟨0|ψ⟩|²` directly. It has no two-qubit gates, so its handles do not
//! implement `EntanglingQubit`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use ndarray::Array1;
use num_complex::Complex64;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, instrument};

use qsim_hal::{
    Capabilities, DeviceConfig, DeviceError, DeviceFactory, DeviceResult, PauliQubit,
    QuantumDevice, Qubit, QubitId, QubitPool, RotationQubit,
};

use crate::gate::StandardGate;
use crate::register::{StateDump, check_probabilities, sample_outcome};

struct SingleQubitCore {
    state: Array1<Complex64>,
    pool: QubitPool,
    rng: StdRng,
}

impl SingleQubitCore {
    fn apply(&mut self, gate: StandardGate) {
        self.state = gate.matrix().dot(&self.state);
    }

    fn measure(&mut self) -> DeviceResult<bool> {
        let p0 = self.state[0].norm_sqr();
        let p1 = self.state[1].norm_sqr();
        check_probabilities([p0, p1])?;
        let outcome = sample_outcome(&mut self.rng, [p0, p1])?;
        let (kept, dropped, probability) = if outcome { (1, 0, p1) } else { (0, 1, p0) };
        self.state[kept] /= probability.sqrt();
        self.state[dropped] = Complex64::new(0.0, 0.0);
        debug!(outcome, p0, p1, "measured single qubit");
        Ok(outcome)
    }
}

/// A device holding exactly one qubit.
pub struct SingleQubitSimulator {
    capabilities: Capabilities,
    core: Rc<RefCell<SingleQubitCore>>,
}

impl SingleQubitSimulator {
    /// Create a single-qubit device with an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::build("single_qubit_simulator", None)
    }

    /// Create a single-qubit device with reproducible measurements.
    pub fn with_seed(seed: u64) -> Self {
        Self::build("single_qubit_simulator", Some(seed))
    }

    fn build(name: impl Into<String>, seed: Option<u64>) -> Self {
        let mut state = Array1::zeros(2);
        state[0] = Complex64::new(1.0, 0.0);
        Self {
            capabilities: Capabilities::single_qubit(name),
            core: Rc::new(RefCell::new(SingleQubitCore {
                state,
                pool: QubitPool::new(1),
                rng: seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64),
            })),
        }
    }

    /// Whether the qubit is available for allocation.
    pub fn is_free(&self) -> bool {
        self.core.borrow().pool.free_count() == 1
    }

    /// Snapshot the qubit's state.
    pub fn dump(&self) -> StateDump {
        let dump = StateDump {
            capacity: 1,
            amplitudes: self.core.borrow().state.to_vec(),
        };
        debug!("qubit state:\n{dump}");
        dump
    }
}

impl Default for SingleQubitSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl QuantumDevice for SingleQubitSimulator {
    type Qubit = SingleQubit;

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    #[instrument(skip(self))]
    fn allocate_qubit(&self) -> DeviceResult<SingleQubit> {
        let id = self.core.borrow_mut().pool.allocate()?;
        Ok(SingleQubit {
            id,
            owner: Rc::downgrade(&self.core),
        })
    }

    #[instrument(skip(self))]
    fn deallocate_qubit(&self, qubit: SingleQubit) -> DeviceResult<()> {
        if Weak::as_ptr(&qubit.owner) != Rc::as_ptr(&self.core) {
            return Err(DeviceError::ForeignQubit(qubit.id));
        }
        let mut core = self.core.borrow_mut();
        if core.measure()? {
            core.apply(StandardGate::X);
        }
        core.pool.release(qubit.id)
    }
}

impl DeviceFactory for SingleQubitSimulator {
    fn from_config(config: DeviceConfig) -> DeviceResult<Self> {
        if config.capacity != 1 {
            return Err(DeviceError::InvalidCapacity {
                requested: config.capacity,
                max: 1,
            });
        }
        Ok(Self::build(config.name, config.seed))
    }
}

/// The qubit handle of a [`SingleQubitSimulator`].
#[derive(Debug)]
pub struct SingleQubit {
    id: QubitId,
    owner: Weak<RefCell<SingleQubitCore>>,
}

impl SingleQubit {
    fn with_core<T>(
        &self,
        f: impl FnOnce(&mut SingleQubitCore) -> DeviceResult<T>,
    ) -> DeviceResult<T> {
        let shared = self
            .owner
            .upgrade()
            .ok_or(DeviceError::DetachedQubit(self.id))?;
        let mut core = shared.borrow_mut();
        f(&mut *core)
    }

    fn apply(&self, gate: StandardGate) -> DeviceResult<()> {
        self.with_core(|core| {
            core.apply(gate);
            Ok(())
        })
    }
}

impl Qubit for SingleQubit {
    fn id(&self) -> QubitId {
        self.id
    }

    fn h(&self) -> DeviceResult<()> {
        self.apply(StandardGate::H)
    }

    fn measure(&self) -> DeviceResult<bool> {
        self.with_core(SingleQubitCore::measure)
    }

    fn reset(&self) -> DeviceResult<()> {
        self.with_core(|core| {
            if core.measure()? {
                core.apply(StandardGate::X);
            }
            Ok(())
        })
    }
}

impl PauliQubit for SingleQubit {
    fn x(&self) -> DeviceResult<()> {
        self.apply(StandardGate::X)
    }

    fn y(&self) -> DeviceResult<()> {
        self.apply(StandardGate::Y)
    }

    fn z(&self) -> DeviceResult<()> {
        self.apply(StandardGate::Z)
    }
}

impl RotationQubit for SingleQubit {
    fn rx(&self, angle: f64) -> DeviceResult<()> {
        self.apply(StandardGate::Rx(angle))
    }

    fn ry(&self, angle: f64) -> DeviceResult<()> {
        self.apply(StandardGate::Ry(angle))
    }

    fn rz(&self, angle: f64) -> DeviceResult<()> {
        self.apply(StandardGate::Rz(angle))
    }
}
