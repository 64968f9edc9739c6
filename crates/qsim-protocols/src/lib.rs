//! `qsim-protocols` — protocols written against the qsim device interface.
//!
//! Everything here is generic over [`qsim_hal::QuantumDevice`] and asks only
//! for the qubit capabilities it uses, so the same code runs on any device
//! that provides them:
//!
//! | Module | Needs |
//! |--------|-------|
//! | [`qkd`] | `Qubit`, `PauliQubit` |
//! | [`bb84`] | `Qubit`, `PauliQubit` |
//! | [`chsh`] | `EntanglingQubit`, `RotationQubit` |
//! | [`teleport`] | `EntanglingQubit`, `PauliQubit` |
//!
//! # Quick start
//!
//! ```rust
//! use qsim_adapter_sim::SingleQubitSimulator;
//! use qsim_protocols::bb84::{apply_one_time_pad, simulate_bb84};
//!
//! let you = SingleQubitSimulator::with_seed(1);
//! let eve = SingleQubitSimulator::with_seed(2);
//! let shared = simulate_bb84(8, &you, &eve).unwrap();
//!
//! let message = [true, false, true, true, false, false, true, false];
//! let encrypted = apply_one_time_pad(&message, &shared.key).unwrap();
//! assert_eq!(apply_one_time_pad(&encrypted, &shared.key).unwrap(), message);
//! ```

pub mod bb84;
pub mod chsh;
pub mod error;
pub mod qkd;
pub mod teleport;

pub use bb84::{Basis, Bb84Key, Bb84Round};
pub use chsh::{ChshStrategy, ConstantStrategy, QuantumStrategy};
pub use error::{ProtocolError, ProtocolResult};
pub use teleport::teleport;
