//! Quantum teleportation.

use tracing::debug;

use qsim_hal::{DeviceResult, EntanglingQubit, PauliQubit};

/// Move the state of `msg` onto `there`, using `here` as the sender's half
/// of a Bell pair.
///
/// `here` and `there` must start in `|0⟩`. Afterwards `there` holds the
/// original state of `msg`, and both `msg` and `here` are back in `|0⟩`.
pub fn teleport<Q>(msg: &Q, here: &Q, there: &Q) -> DeviceResult<()>
where
    Q: EntanglingQubit + PauliQubit,
{
    here.h()?;
    here.cnot(there)?;

    msg.cnot(here)?;
    msg.h()?;

    let phase_flip = msg.measure()?;
    if phase_flip {
        there.z()?;
    }
    let bit_flip = here.measure()?;
    if bit_flip {
        there.x()?;
    }
    debug!(phase_flip, bit_flip, "teleported");

    msg.reset()?;
    here.reset()
}
