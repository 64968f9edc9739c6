//! BB84 quantum key distribution.
//!
//! Each round the sender draws a message bit and a basis, encodes the bit
//! on a qubit, and the receiver decodes it in a basis of its own choosing.
//! Rounds where the two bases agree contribute their bit to the shared key;
//! the rest are discarded. Random bits are drawn from the devices themselves.

use std::fmt;

use tracing::{debug, info};

use qsim_hal::{DeviceResult, PauliQubit, QuantumDevice, Qubit};

use crate::error::{ProtocolError, ProtocolResult};

/// Basis a bit is encoded or decoded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Basis {
    /// `|0⟩` / `|1⟩`.
    Computational,
    /// `|+⟩` / `|−⟩`.
    Hadamard,
}

impl From<bool> for Basis {
    fn from(bit: bool) -> Self {
        if bit {
            Basis::Hadamard
        } else {
            Basis::Computational
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Basis::Computational => f.write_str("Z"),
            Basis::Hadamard => f.write_str("X"),
        }
    }
}

/// Draw a random bit by measuring `|+⟩` on a scoped qubit of `device`.
pub fn sample_random_bit<D: QuantumDevice>(device: &D) -> DeviceResult<bool> {
    device.with_qubit(|q| {
        q.h()?;
        let bit = q.measure()?;
        q.reset()?;
        Ok(bit)
    })
}

/// Encode `message` on `q` (which must be `|0⟩`) in `basis`.
pub fn prepare_message_qubit<Q: PauliQubit>(message: bool, basis: Basis, q: &Q) -> DeviceResult<()> {
    if message {
        q.x()?;
    }
    if basis == Basis::Hadamard {
        q.h()?;
    }
    Ok(())
}

/// Decode `q` in `basis`, then reset it.
pub fn measure_message_qubit<Q: Qubit>(basis: Basis, q: &Q) -> DeviceResult<bool> {
    if basis == Basis::Hadamard {
        q.h()?;
    }
    let result = q.measure()?;
    q.reset()?;
    Ok(result)
}

/// What both parties saw in one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bb84Round {
    /// Bit the sender encoded.
    pub your_message: bool,
    /// Basis the sender encoded in.
    pub your_basis: Basis,
    /// Bit the receiver decoded.
    pub eve_result: bool,
    /// Basis the receiver decoded in.
    pub eve_basis: Basis,
}

impl Bb84Round {
    /// Whether the round contributes to the key.
    pub fn bases_agree(&self) -> bool {
        self.your_basis == self.eve_basis
    }
}

/// Run one round: the sender's randomness and qubit come from
/// `your_device`, the receiver's basis from `eve_device`.
pub fn send_single_bit_with_bb84<D, E>(your_device: &D, eve_device: &E) -> DeviceResult<Bb84Round>
where
    D: QuantumDevice,
    D::Qubit: PauliQubit,
    E: QuantumDevice,
{
    let your_message = sample_random_bit(your_device)?;
    let your_basis = Basis::from(sample_random_bit(your_device)?);
    let eve_basis = Basis::from(sample_random_bit(eve_device)?);

    let eve_result = your_device.with_qubit(|q| {
        prepare_message_qubit(your_message, your_basis, q)?;
        measure_message_qubit(eve_basis, q)
    })?;

    Ok(Bb84Round {
        your_message,
        your_basis,
        eve_result,
        eve_basis,
    })
}

/// A shared key and the number of rounds it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bb84Key {
    /// Key bits in the order they were agreed.
    pub key: Vec<bool>,
    /// Total rounds run, including discarded ones.
    pub rounds: usize,
}

/// Run BB84 rounds until `n_bits` key bits are agreed.
///
/// # Errors
///
/// [`ProtocolError::BasisDisagreement`] if a round with matching bases
/// decodes a different bit than was sent, which an ideal device never does.
pub fn simulate_bb84<D, E>(n_bits: usize, your_device: &D, eve_device: &E) -> ProtocolResult<Bb84Key>
where
    D: QuantumDevice,
    D::Qubit: PauliQubit,
    E: QuantumDevice,
{
    let mut key = Vec::with_capacity(n_bits);
    let mut rounds = 0;

    while key.len() < n_bits {
        rounds += 1;
        let round = send_single_bit_with_bb84(your_device, eve_device)?;
        debug!(
            round = rounds,
            your_basis = %round.your_basis,
            eve_basis = %round.eve_basis,
            kept = round.bases_agree(),
            "bb84 round"
        );
        if round.bases_agree() {
            if round.your_message != round.eve_result {
                return Err(ProtocolError::BasisDisagreement {
                    round: rounds,
                    sent: round.your_message,
                    received: round.eve_result,
                });
            }
            key.push(round.your_message);
        }
    }

    info!(rounds, n_bits, "generated bb84 key");
    Ok(Bb84Key { key, rounds })
}

/// XOR `message` with the first `message.len()` bits of `key`.
///
/// Applying the same key twice returns the original message.
pub fn apply_one_time_pad(message: &[bool], key: &[bool]) -> ProtocolResult<Vec<bool>> {
    if key.len() < message.len() {
        return Err(ProtocolError::KeyTooShort {
            message: message.len(),
            key: key.len(),
        });
    }
    Ok(message.iter().zip(key).map(|(m, k)| m ^ k).collect())
}

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Read `bits` as a big-endian binary number and format it as `0x…` hex
/// without leading zeros. An empty or all-zero slice gives `0x0`.
pub fn bits_to_hex(bits: &[bool]) -> String {
    let pad = (4 - bits.len() % 4) % 4;
    let padded: Vec<bool> = std::iter::repeat_n(false, pad)
        .chain(bits.iter().copied())
        .collect();
    let digits: String = padded
        .chunks(4)
        .map(|nibble| {
            // Four bits per chunk, so the value is always below 16.
            let value = nibble.iter().fold(0_usize, |acc, &b| (acc << 1) | usize::from(b));
            char::from(HEX_DIGITS[value])
        })
        .skip_while(|&c| c == '0')
        .collect();
    if digits.is_empty() {
        "0x0".to_string()
    } else {
        format!("0x{digits}")
    }
}
