//! Multi-qubit statevector simulator.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, instrument};

use qsim_hal::{
    Capabilities, DeviceConfig, DeviceError, DeviceFactory, DeviceResult, EntanglingQubit,
    PauliQubit, QuantumDevice, Qubit, QubitId, QubitPool, RotationQubit,
};

use crate::gate::StandardGate;
use crate::register::{RegisterState, StateDump};

/// State shared between a simulator and the qubits it hands out.
struct SimulatorCore {
    register: RegisterState,
    pool: QubitPool,
}

/// Multi-qubit simulator device.
///
/// Owns one register of `capacity` qubits. All handles it mints hold a weak
/// reference back to that register, so the simulator is the only owner of
/// amplitude data. The device is single-threaded (`!Send`).
pub struct Simulator {
    /// Advertised capabilities.
    capabilities: Capabilities,
    /// Register and pool.
    core: Rc<RefCell<SimulatorCore>>,
}

impl Simulator {
    /// Create a simulator with `capacity` qubits and an entropy-seeded RNG.
    pub fn new(capacity: usize) -> DeviceResult<Self> {
        Self::from_config(DeviceConfig::new("simulator").with_capacity(capacity))
    }

    /// Create a simulator whose measurements are reproducible.
    pub fn with_seed(capacity: usize, seed: u64) -> DeviceResult<Self> {
        Self::from_config(
            DeviceConfig::new("simulator")
                .with_capacity(capacity)
                .with_seed(seed),
        )
    }

    /// Number of qubits in the register.
    pub fn capacity(&self) -> usize {
        self.core.borrow().register.capacity()
    }

    /// Number of qubits available for allocation.
    pub fn free_qubits(&self) -> usize {
        self.core.borrow().pool.free_count()
    }

    /// Ids currently handed out, ascending.
    pub fn in_use_qubits(&self) -> Vec<QubitId> {
        self.core.borrow().pool.in_use_ids()
    }

    /// Snapshot the register state. Also logged at `debug` level.
    pub fn dump(&self) -> StateDump {
        let dump = self.core.borrow().register.dump();
        debug!("register state:\n{dump}");
        dump
    }
}

impl QuantumDevice for Simulator {
    type Qubit = SimulatedQubit;

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    #[instrument(skip(self))]
    fn allocate_qubit(&self) -> DeviceResult<SimulatedQubit> {
        let id = self.core.borrow_mut().pool.allocate()?;
        Ok(SimulatedQubit {
            id,
            owner: Rc::downgrade(&self.core),
        })
    }

    #[instrument(skip(self))]
    fn deallocate_qubit(&self, qubit: SimulatedQubit) -> DeviceResult<()> {
        if Weak::as_ptr(&qubit.owner) != Rc::as_ptr(&self.core) {
            return Err(DeviceError::ForeignQubit(qubit.id));
        }
        let mut core = self.core.borrow_mut();
        core.register.reset(qubit.id)?;
        core.pool.release(qubit.id)
    }
}

impl DeviceFactory for Simulator {
    fn from_config(config: DeviceConfig) -> DeviceResult<Self> {
        let register = RegisterState::new(config.capacity, config.seed)?;
        debug!(
            name = %config.name,
            capacity = config.capacity,
            seeded = config.seed.is_some(),
            "created simulator"
        );
        Ok(Self {
            capabilities: Capabilities::simulator(config.name, config.capacity as u32),
            core: Rc::new(RefCell::new(SimulatorCore {
                pool: QubitPool::new(config.capacity),
                register,
            })),
        })
    }
}

/// A qubit handle minted by [`Simulator`].
#[derive(Debug)]
pub struct SimulatedQubit {
    id: QubitId,
    owner: Weak<RefCell<SimulatorCore>>,
}

impl SimulatedQubit {
    /// Run `f` on the owning register.
    fn with_register<T>(
        &self,
        f: impl FnOnce(&mut RegisterState) -> DeviceResult<T>,
    ) -> DeviceResult<T> {
        let shared = self
            .owner
            .upgrade()
            .ok_or(DeviceError::DetachedQubit(self.id))?;
        let mut core = shared.borrow_mut();
        f(&mut core.register)
    }

    fn apply(&self, gate: StandardGate) -> DeviceResult<()> {
        self.with_register(|reg| reg.apply_gate(gate, &[self.id]))
    }

    fn apply_pair(&self, gate: StandardGate, other: &Self) -> DeviceResult<()> {
        if !Weak::ptr_eq(&self.owner, &other.owner) {
            return Err(DeviceError::ForeignQubit(other.id));
        }
        self.with_register(|reg| reg.apply_gate(gate, &[self.id, other.id]))
    }
}

impl Qubit for SimulatedQubit {
    fn id(&self) -> QubitId {
        self.id
    }

    fn h(&self) -> DeviceResult<()> {
        self.apply(StandardGate::H)
    }

    fn measure(&self) -> DeviceResult<bool> {
        self.with_register(|reg| reg.measure(self.id))
    }

    fn reset(&self) -> DeviceResult<()> {
        self.with_register(|reg| reg.reset(self.id))
    }
}

impl PauliQubit for SimulatedQubit {
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

impl RotationQubit for SimulatedQubit {
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

impl EntanglingQubit for SimulatedQubit {
    fn cnot(&self, target: &Self) -> DeviceResult<()> {
        self.apply_pair(StandardGate::CX, target)
    }

    fn swap(&self, other: &Self) -> DeviceResult<()> {
        self.apply_pair(StandardGate::Swap, other)
    }
}
