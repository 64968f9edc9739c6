//! Local statevector simulators for the qsim device interface.
//!
//! Two devices implement [`qsim_hal::QuantumDevice`]:
//!
//! - [`Simulator`]: a fixed-capacity register of up to [`MAX_CAPACITY`]
//!   qubits sharing one joint state vector, with single- and two-qubit gates
//! - [`SingleQubitSimulator`]: exactly one qubit, no entangling gates
//!
//! Gates are dense matrices ([`StandardGate`]) promoted to the full register
//! by [`expand`]. Measurement is projective: it samples an outcome with the
//! device's RNG and collapses the state onto it.
//!
//! # Example
//!
//! ```
//! use qsim_adapter_sim::Simulator;
//! use qsim_hal::{EntanglingQubit, QuantumDevice, Qubit};
//!
//! let sim = Simulator::with_seed(2, 7).unwrap();
//! let agree = sim
//!     .with_register(2, |qs| {
//!         qs[0].h()?;
//!         qs[0].cnot(&qs[1])?;
//!         Ok(qs[0].measure()? == qs[1].measure()?)
//!     })
//!     .unwrap();
//! assert!(agree);
//! ```

pub mod expand;
pub mod gate;
pub mod register;
mod simulator;
mod single;

pub use expand::expand;
pub use gate::{StandardGate, projector};
pub use register::{MAX_CAPACITY, PROBABILITY_TOLERANCE, RegisterState, StateDump};
pub use simulator::{SimulatedQubit, Simulator};
pub use single::{SingleQubit, SingleQubitSimulator};
