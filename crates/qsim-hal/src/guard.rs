//! Scoped qubit acquisition.
//!
//! A guard allocates on construction and, when it is released or dropped,
//! drives every qubit it holds back to |0⟩ by measurement (measure, then X
//! on outcome 1) before handing it back to the device. This runs on every
//! exit path: explicit [`release`](RegisterGuard::release), early return,
//! `?` propagation and panic unwinding.
//!
//! Errors from [`release`](RegisterGuard::release) are returned to the
//! caller. `Drop` cannot return them and logs them instead.
//!
//! A qubit whose reset fails is not returned to the pool. It stays marked in
//! use so that the pool never hands out a qubit that is not in |0⟩.

use std::ops::Deref;

use tracing::{debug, error};

use crate::device::{QuantumDevice, Qubit};
use crate::error::DeviceResult;

/// A scoped register of qubits.
pub struct RegisterGuard<'d, D: QuantumDevice> {
    device: &'d D,
    qubits: Vec<D::Qubit>,
}

impl<'d, D: QuantumDevice> RegisterGuard<'d, D> {
    /// Allocate `n_qubits` qubits.
    ///
    /// If the pool runs dry part-way, the qubits already taken are released
    /// again and the allocation error is returned.
    pub fn acquire(device: &'d D, n_qubits: usize) -> DeviceResult<Self> {
        let mut qubits = Vec::with_capacity(n_qubits);
        for _ in 0..n_qubits {
            match device.allocate_qubit() {
                Ok(qubit) => qubits.push(qubit),
                Err(err) => {
                    if let Err(release_err) = release_all(device, qubits) {
                        error!(%release_err, "failed to return partially acquired register");
                    }
                    return Err(err);
                }
            }
        }
        debug!(n_qubits, "acquired scoped register");
        Ok(Self { device, qubits })
    }

    /// The qubits held by this guard, in allocation order.
    pub fn qubits(&self) -> &[D::Qubit] {
        &self.qubits
    }

    /// Reset and release every qubit, surfacing the first failure.
    pub fn release(mut self) -> DeviceResult<()> {
        let qubits = std::mem::take(&mut self.qubits);
        release_all(self.device, qubits)
    }
}

impl<D: QuantumDevice> Deref for RegisterGuard<'_, D> {
    type Target = [D::Qubit];

    fn deref(&self) -> &Self::Target {
        &self.qubits
    }
}

impl<D: QuantumDevice> Drop for RegisterGuard<'_, D> {
    fn drop(&mut self) {
        if self.qubits.is_empty() {
            return;
        }
        let qubits = std::mem::take(&mut self.qubits);
        if let Err(err) = release_all(self.device, qubits) {
            error!(%err, "failed to release scoped qubits on drop");
        }
    }
}

/// A single scoped qubit.
pub struct QubitGuard<'d, D: QuantumDevice>(RegisterGuard<'d, D>);

impl<'d, D: QuantumDevice> QubitGuard<'d, D> {
    /// Allocate one qubit.
    pub fn acquire(device: &'d D) -> DeviceResult<Self> {
        RegisterGuard::acquire(device, 1).map(Self)
    }

    /// The qubit held by this guard.
    pub fn qubit(&self) -> &D::Qubit {
        &self.0.qubits[0]
    }

    /// Reset and release the qubit, surfacing any failure.
    pub fn release(self) -> DeviceResult<()> {
        self.0.release()
    }
}

impl<D: QuantumDevice> Deref for QubitGuard<'_, D> {
    type Target = D::Qubit;

    fn deref(&self) -> &Self::Target {
        self.qubit()
    }
}

/// Reset each qubit and hand it back. Every qubit is attempted; the first
/// error wins.
fn release_all<D: QuantumDevice>(device: &D, qubits: Vec<D::Qubit>) -> DeviceResult<()> {
    let mut first_err = None;
    for qubit in qubits {
        let id = qubit.id();
        let released = qubit
            .reset()
            .and_then(|()| device.deallocate_qubit(qubit));
        match released {
            Ok(()) => debug!(qubit = %id, "reset and released scoped qubit"),
            Err(err) => {
                error!(qubit = %id, %err, "scoped qubit not returned to pool");
                first_err.get_or_insert(err);
            }
        }
    }
    first_err.map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::capability::Capabilities;
    use crate::error::DeviceError;
    use crate::pool::QubitPool;
    use crate::qubit::QubitId;

    /// Classical stand-in: each slot is a bit, which is all the guard
    /// contract needs.
    struct BitDevice {
        caps: Capabilities,
        pool: RefCell<QubitPool>,
        bits: Rc<RefCell<Vec<bool>>>,
        fail_reset: bool,
    }

    struct BitQubit {
        id: QubitId,
        bits: Rc<RefCell<Vec<bool>>>,
        fail_reset: bool,
    }

    impl BitDevice {
        fn new(capacity: usize) -> Self {
            Self {
                caps: Capabilities::single_qubit("bits"),
                pool: RefCell::new(QubitPool::new(capacity)),
                bits: Rc::new(RefCell::new(vec![false; capacity])),
                fail_reset: false,
            }
        }
    }

    impl Qubit for BitQubit {
        fn id(&self) -> QubitId {
            self.id
        }

        fn h(&self) -> DeviceResult<()> {
            self.bits.borrow_mut()[self.id.index()] ^= true;
            Ok(())
        }

        fn measure(&self) -> DeviceResult<bool> {
            Ok(self.bits.borrow()[self.id.index()])
        }

        fn reset(&self) -> DeviceResult<()> {
            if self.fail_reset {
                return Err(DeviceError::InternalConsistency("broken".into()));
            }
            self.bits.borrow_mut()[self.id.index()] = false;
            Ok(())
        }
    }

    impl QuantumDevice for BitDevice {
        type Qubit = BitQubit;

        fn capabilities(&self) -> &Capabilities {
            &self.caps
        }

        fn allocate_qubit(&self) -> DeviceResult<BitQubit> {
            let id = self.pool.borrow_mut().allocate()?;
            Ok(BitQubit {
                id,
                bits: Rc::clone(&self.bits),
                fail_reset: self.fail_reset,
            })
        }

        fn deallocate_qubit(&self, qubit: BitQubit) -> DeviceResult<()> {
            self.pool.borrow_mut().release(qubit.id)
        }
    }

    #[test]
    fn test_guard_resets_on_release() {
        let device = BitDevice::new(2);
        let guard = device.using_qubit().unwrap();
        guard.h().unwrap();
        assert!(guard.measure().unwrap());
        guard.release().unwrap();

        assert_eq!(device.pool.borrow().free_count(), 2);
        assert!(device.bits.borrow().iter().all(|b| !b));
    }

    #[test]
    fn test_guard_resets_on_drop() {
        let device = BitDevice::new(1);
        {
            let guard = device.using_qubit().unwrap();
            guard.h().unwrap();
        }
        assert_eq!(device.pool.borrow().free_count(), 1);
        assert!(!device.bits.borrow()[0]);
    }

    #[test]
    fn test_guard_resets_on_error_path() {
        let device = BitDevice::new(1);
        let result: DeviceResult<()> = device.with_qubit(|q| {
            q.h()?;
            Err(DeviceError::InternalConsistency("caller failed".into()))
        });
        assert!(matches!(result, Err(DeviceError::InternalConsistency(_))));
        assert_eq!(device.pool.borrow().free_count(), 1);
        assert!(!device.bits.borrow()[0]);
    }

    #[test]
    fn test_guard_resets_on_panic() {
        let device = BitDevice::new(1);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let guard = device.using_qubit().unwrap();
            guard.h().unwrap();
            panic!("protocol bug");
        }));
        assert!(result.is_err());
        assert_eq!(device.pool.borrow().free_count(), 1);
        assert!(!device.bits.borrow()[0]);
    }

    #[test]
    fn test_register_guard_partial_acquisition_rolls_back() {
        let device = BitDevice::new(2);
        let result = device.using_register(3);
        assert!(matches!(
            result,
            Err(DeviceError::PoolExhausted { capacity: 2 })
        ));
        assert_eq!(device.pool.borrow().free_count(), 2);
    }

    #[test]
    fn test_with_register_returns_value() {
        let device = BitDevice::new(3);
        let ids = device
            .with_register(3, |qs| Ok(qs.iter().map(Qubit::id).collect::<Vec<_>>()))
            .unwrap();
        assert_eq!(ids, vec![QubitId(0), QubitId(1), QubitId(2)]);
        assert_eq!(device.pool.borrow().free_count(), 3);
    }

    #[test]
    fn test_failed_reset_keeps_qubit_out_of_pool() {
        let mut device = BitDevice::new(2);
        device.fail_reset = true;
        let guard = device.using_qubit().unwrap();
        assert!(matches!(
            guard.release(),
            Err(DeviceError::InternalConsistency(_))
        ));
        let pool = device.pool.borrow();
        assert_eq!(pool.free_count(), 1);
        assert!(pool.is_in_use(QubitId(0)));
    }
}
