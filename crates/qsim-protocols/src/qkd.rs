//! Random numbers and classical bits sent over a qubit.
//!
//! The three `send_classical_bit*` variants return the bit the receiver
//! read. Preparing and measuring in the same basis always returns the sent
//! bit; preparing in the computational basis and measuring in the ± basis
//! returns a fair coin.

use qsim_hal::{DeviceResult, PauliQubit, QuantumDevice, Qubit};

/// Draw one uniformly random bit from `device`.
pub fn qrng<D: QuantumDevice>(device: &D) -> DeviceResult<bool> {
    device.with_qubit(|q| {
        q.h()?;
        q.measure()
    })
}

/// Encode `bit` in the computational basis.
pub fn prepare_classical_message<Q: PauliQubit>(bit: bool, q: &Q) -> DeviceResult<()> {
    if bit {
        q.x()?;
    }
    Ok(())
}

/// Encode `bit` in the ± basis: `|+⟩` for 0, `|−⟩` for 1.
pub fn prepare_classical_message_plusminus<Q: PauliQubit>(bit: bool, q: &Q) -> DeviceResult<()> {
    prepare_classical_message(bit, q)?;
    q.h()
}

/// Read a qubit in the ± basis.
pub fn measure_plusminus<Q: Qubit>(q: &Q) -> DeviceResult<bool> {
    q.h()?;
    q.measure()
}

/// Send `bit` in the computational basis and read it back the same way.
pub fn send_classical_bit<D>(device: &D, bit: bool) -> DeviceResult<bool>
where
    D: QuantumDevice,
    D::Qubit: PauliQubit,
{
    device.with_qubit(|q| {
        prepare_classical_message(bit, q)?;
        let received = q.measure()?;
        q.reset()?;
        Ok(received)
    })
}

/// Send `bit` in the ± basis and read it back in the ± basis.
pub fn send_classical_bit_plusminus<D>(device: &D, bit: bool) -> DeviceResult<bool>
where
    D: QuantumDevice,
    D::Qubit: PauliQubit,
{
    device.with_qubit(|q| {
        prepare_classical_message_plusminus(bit, q)?;
        measure_plusminus(q)
    })
}

/// Send `bit` in the computational basis but read it in the ± basis.
pub fn send_classical_bit_wrong_basis<D>(device: &D, bit: bool) -> DeviceResult<bool>
where
    D: QuantumDevice,
    D::Qubit: PauliQubit,
{
    device.with_qubit(|q| {
        prepare_classical_message(bit, q)?;
        measure_plusminus(q)
    })
}
