//! qsim Hardware Abstraction Layer
//!
//! This crate defines the interface protocol code is written against, so
//! the same key-distribution or teleportation routine runs unchanged on any
//! device that offers the gates it needs.
//!
//! # Overview
//!
//! - [`QuantumDevice`]: raw `allocate_qubit` / `deallocate_qubit` plus
//!   scoped helpers derived from them
//! - [`Qubit`], [`PauliQubit`], [`RotationQubit`], [`EntanglingQubit`]:
//!   tiered qubit capabilities
//! - [`QubitGuard`] / [`RegisterGuard`]: scoped acquisition that resets every
//!   qubit to |0⟩ before it goes back to the pool
//! - [`QubitPool`]: free / in-use bookkeeping for a register's slot ids
//! - [`Capabilities`]: what a device advertises
//!
//! # Example: Writing a Protocol
//!
//! ```ignore
//! use qsim_hal::{DeviceResult, QuantumDevice, Qubit};
//!
//! /// One fair random bit. Needs nothing beyond the minimal gate set.
//! fn qrng<D: QuantumDevice>(device: &D) -> DeviceResult<bool> {
//!     device.with_qubit(|q| {
//!         q.h()?;
//!         q.measure()
//!     })
//! }
//! ```
//!
//! # Implementing a Device
//!
//! A device implements [`QuantumDevice`] and the qubit traits matching the
//! gate set it reports in [`Capabilities`]. The statevector simulators in
//! `qsim-adapter-sim` are the reference implementations.

pub mod capability;
pub mod device;
pub mod error;
pub mod guard;
pub mod pool;
pub mod qubit;

pub use capability::{Capabilities, GateSet};
pub use device::{
    DEFAULT_CAPACITY, DeviceConfig, DeviceFactory, EntanglingQubit, PauliQubit, QuantumDevice,
    Qubit, RotationQubit,
};
pub use error::{DeviceError, DeviceResult};
pub use guard::{QubitGuard, RegisterGuard};
pub use pool::QubitPool;
pub use qubit::QubitId;
