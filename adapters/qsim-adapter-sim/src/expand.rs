//! Operator expansion.
//!
//! Promotes a one- or two-qubit operator to the full `2^n × 2^n` register
//! dimension, acting as the operator on the named slots and as identity on
//! every other slot.
//!
//! # Ordering
//!
//! Slot 0 is the leftmost, most significant tensor factor: in a register of
//! capacity `n`, slot `k` is bit `n - 1 - k` of a basis index. For a
//! two-qubit operator on `[a, b]`, slot `a` is the more significant factor
//! of the operator's 4×4 index, so `expand(CX, [a, b])` uses `a` as control
//! whichever of `a` and `b` is numerically larger.

use ndarray::Array2;
use num_complex::Complex64;

use qsim_hal::{DeviceError, DeviceResult, QubitId};

use crate::register::MAX_CAPACITY;

/// Expand `operator` on `slots` to a register of `capacity` qubits.
///
/// # Errors
///
/// - [`DeviceError::InvalidCapacity`] unless `1 <= capacity <= MAX_CAPACITY`
/// - [`DeviceError::UnsupportedArity`] unless `slots` has 1 or 2 entries
/// - [`DeviceError::OperatorShape`] if `operator` is not `2^k × 2^k` for
///   `k = slots.len()`
/// - [`DeviceError::QubitOutOfRange`] / [`DeviceError::DuplicateQubit`] for
///   bad slot ids
pub fn expand(
    operator: &Array2<Complex64>,
    slots: &[QubitId],
    capacity: usize,
) -> DeviceResult<Array2<Complex64>> {
    if !(1..=MAX_CAPACITY).contains(&capacity) {
        return Err(DeviceError::InvalidCapacity {
            requested: capacity,
            max: MAX_CAPACITY,
        });
    }

    let arity = slots.len();
    if !(1..=2).contains(&arity) {
        return Err(DeviceError::UnsupportedArity { got: arity });
    }

    let local_dim = 1 << arity;
    if operator.nrows() != local_dim || operator.ncols() != local_dim {
        return Err(DeviceError::OperatorShape {
            expected: local_dim,
            got: operator.nrows().max(operator.ncols()),
        });
    }

    for (i, &slot) in slots.iter().enumerate() {
        if slot.index() >= capacity {
            return Err(DeviceError::QubitOutOfRange {
                qubit: slot,
                capacity,
            });
        }
        if slots[..i].contains(&slot) {
            return Err(DeviceError::DuplicateQubit(slot));
        }
    }

    let shifts: Vec<usize> = slots.iter().map(|s| capacity - 1 - s.index()).collect();
    let mask = shifts.iter().fold(0_usize, |m, &sh| m | (1 << sh));
    let dim = 1_usize << capacity;

    let mut expanded = Array2::zeros((dim, dim));
    for row in 0..dim {
        // Untouched slots must agree between row and column.
        let rest = row & !mask;
        let local_row = gather(row, &shifts);
        for local_col in 0..local_dim {
            let value = operator[[local_row, local_col]];
            if value != Complex64::new(0.0, 0.0) {
                expanded[[row, rest | scatter(local_col, &shifts)]] = value;
            }
        }
    }
    Ok(expanded)
}

/// Collect the bits at `shifts` into a local index, first shift most significant.
fn gather(index: usize, shifts: &[usize]) -> usize {
    shifts
        .iter()
        .fold(0, |acc, &sh| (acc << 1) | ((index >> sh) & 1))
}

/// Inverse of [`gather`]: spread a local index over the bits at `shifts`.
fn scatter(local: usize, shifts: &[usize]) -> usize {
    let k = shifts.len();
    shifts
        .iter()
        .enumerate()
        .fold(0, |acc, (j, &sh)| acc | (((local >> (k - 1 - j)) & 1) << sh))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{StandardGate, projector};
    use ndarray::linalg::kron;
    use ndarray::{Array1, Array2};

    fn approx_eq(a: &Array2<Complex64>, b: &Array2<Complex64>) -> bool {
        a.shape() == b.shape() && a.iter().zip(b.iter()).all(|(x, y)| (x - y).norm() < 1e-12)
    }

    fn basis(capacity: usize, index: usize) -> Array1<Complex64> {
        let mut v = Array1::zeros(1 << capacity);
        v[index] = Complex64::new(1.0, 0.0);
        v
    }

    fn eye(n: usize) -> Array2<Complex64> {
        Array2::eye(1 << n)
    }

    #[test]
    fn test_single_slot_matches_kron() {
        let h = StandardGate::H.matrix();
        for slot in 0..3_usize {
            let expected = kron(&kron(&eye(slot), &h), &eye(2 - slot));
            let got = expand(&h, &[QubitId(slot as u32)], 3).unwrap();
            assert!(approx_eq(&got, &expected), "slot {slot}");
        }
    }

    #[test]
    fn test_adjacent_pair_matches_kron() {
        let cx = StandardGate::CX.matrix();
        let expected = kron(&eye(1), &cx);
        let got = expand(&cx, &[QubitId(1), QubitId(2)], 3).unwrap();
        assert!(approx_eq(&got, &expected));
    }

    #[test]
    fn test_cx_both_operand_orders() {
        let cx = StandardGate::CX.matrix();

        // Control slot 0, target slot 1: |10⟩ → |11⟩.
        let forward = expand(&cx, &[QubitId(0), QubitId(1)], 2).unwrap();
        assert_eq!(forward.dot(&basis(2, 0b10)), basis(2, 0b11));
        assert_eq!(forward.dot(&basis(2, 0b01)), basis(2, 0b01));

        // Control slot 1, target slot 0: |01⟩ → |11⟩.
        let reverse = expand(&cx, &[QubitId(1), QubitId(0)], 2).unwrap();
        assert_eq!(reverse.dot(&basis(2, 0b01)), basis(2, 0b11));
        assert_eq!(reverse.dot(&basis(2, 0b10)), basis(2, 0b10));
    }

    #[test]
    fn test_non_adjacent_slots() {
        let cx = StandardGate::CX.matrix();
        // Control slot 0, target slot 2, slot 1 untouched.
        let op = expand(&cx, &[QubitId(0), QubitId(2)], 3).unwrap();
        assert_eq!(op.dot(&basis(3, 0b100)), basis(3, 0b101));
        assert_eq!(op.dot(&basis(3, 0b110)), basis(3, 0b111));
        assert_eq!(op.dot(&basis(3, 0b011)), basis(3, 0b011));
    }

    #[test]
    fn test_swap_is_order_independent() {
        let swap = StandardGate::Swap.matrix();
        let a = expand(&swap, &[QubitId(0), QubitId(2)], 3).unwrap();
        let b = expand(&swap, &[QubitId(2), QubitId(0)], 3).unwrap();
        assert!(approx_eq(&a, &b));
        assert_eq!(a.dot(&basis(3, 0b100)), basis(3, 0b001));
    }

    #[test]
    fn test_projectors_partition_identity() {
        let p0 = expand(&projector(false), &[QubitId(1)], 3).unwrap();
        let p1 = expand(&projector(true), &[QubitId(1)], 3).unwrap();
        assert!(approx_eq(&(&p0 + &p1), &eye(3)));
        // Rank 2^(n-1) each.
        let trace = |m: &Array2<Complex64>| m.diag().sum().re;
        assert!((trace(&p0) - 4.0).abs() < 1e-12);
        assert!((trace(&p1) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_unsupported_arity() {
        let h = StandardGate::H.matrix();
        assert_eq!(
            expand(&h, &[], 3),
            Err(DeviceError::UnsupportedArity { got: 0 })
        );
        let eight: Array2<Complex64> = Array2::eye(8);
        assert_eq!(
            expand(&eight, &[QubitId(0), QubitId(1), QubitId(2)], 3),
            Err(DeviceError::UnsupportedArity { got: 3 })
        );
    }

    #[test]
    fn test_bad_slots_and_shapes() {
        let h = StandardGate::H.matrix();
        let cx = StandardGate::CX.matrix();
        assert!(matches!(
            expand(&h, &[QubitId(3)], 3),
            Err(DeviceError::QubitOutOfRange { capacity: 3, .. })
        ));
        assert_eq!(
            expand(&cx, &[QubitId(1), QubitId(1)], 3),
            Err(DeviceError::DuplicateQubit(QubitId(1)))
        );
        assert_eq!(
            expand(&h, &[QubitId(0)], 64),
            Err(DeviceError::InvalidCapacity {
                requested: 64,
                max: MAX_CAPACITY
            })
        );
        assert_eq!(
            expand(&h, &[QubitId(0)], 0),
            Err(DeviceError::InvalidCapacity {
                requested: 0,
                max: MAX_CAPACITY
            })
        );
        assert_eq!(
            expand(&h, &[QubitId(0), QubitId(1)], 3),
            Err(DeviceError::OperatorShape {
                expected: 4,
                got: 2
            })
        );
    }
}
