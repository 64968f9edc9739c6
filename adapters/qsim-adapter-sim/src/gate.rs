//! Gate matrices.
//!
//! Every gate is a small dense matrix handed to [`expand`](crate::expand::expand);
//! there is no per-gate register-sized code. Two-qubit matrices are written
//! in the basis `|ab⟩` where `a` is the first operand.

use std::fmt;

use ndarray::{Array2, array};
use num_complex::Complex64;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Gates the simulators implement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StandardGate {
    /// Hadamard.
    H,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
    /// Rotation about X by the given angle in radians.
    Rx(f64),
    /// Rotation about Y by the given angle in radians.
    Ry(f64),
    /// Rotation about Z by the given angle in radians.
    Rz(f64),
    /// Controlled-NOT; first operand is the control.
    CX,
    /// SWAP; symmetric in its operands.
    Swap,
}

impl StandardGate {
    /// OpenQASM 3 name of the gate.
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::H => "h",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::CX => "cx",
            StandardGate::Swap => "swap",
        }
    }

    /// Number of qubits the gate acts on.
    pub fn num_qubits(&self) -> usize {
        match self {
            StandardGate::CX | StandardGate::Swap => 2,
            _ => 1,
        }
    }

    /// The gate's unitary matrix.
    pub fn matrix(&self) -> Array2<Complex64> {
        match *self {
            StandardGate::H => {
                let s = Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
                array![[s, s], [s, -s]]
            }
            StandardGate::X => array![[ZERO, ONE], [ONE, ZERO]],
            StandardGate::Y => array![[ZERO, -I], [I, ZERO]],
            StandardGate::Z => array![[ONE, ZERO], [ZERO, -ONE]],
            StandardGate::Rx(theta) => {
                let c = Complex64::new((theta / 2.0).cos(), 0.0);
                let s = Complex64::new(0.0, -(theta / 2.0).sin());
                array![[c, s], [s, c]]
            }
            StandardGate::Ry(theta) => {
                let c = Complex64::new((theta / 2.0).cos(), 0.0);
                let s = Complex64::new((theta / 2.0).sin(), 0.0);
                array![[c, -s], [s, c]]
            }
            StandardGate::Rz(theta) => array![
                [Complex64::from_polar(1.0, -theta / 2.0), ZERO],
                [ZERO, Complex64::from_polar(1.0, theta / 2.0)]
            ],
            StandardGate::CX => array![
                [ONE, ZERO, ZERO, ZERO],
                [ZERO, ONE, ZERO, ZERO],
                [ZERO, ZERO, ZERO, ONE],
                [ZERO, ZERO, ONE, ZERO]
            ],
            StandardGate::Swap => array![
                [ONE, ZERO, ZERO, ZERO],
                [ZERO, ZERO, ONE, ZERO],
                [ZERO, ONE, ZERO, ZERO],
                [ZERO, ZERO, ZERO, ONE]
            ],
        }
    }
}

impl fmt::Display for StandardGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StandardGate::Rx(theta) | StandardGate::Ry(theta) | StandardGate::Rz(theta) => {
                write!(f, "{}({theta})", self.name())
            }
            _ => f.write_str(self.name()),
        }
    }
}

/// Projector onto the computational-basis state `|outcome⟩`.
pub fn projector(outcome: bool) -> Array2<Complex64> {
    if outcome {
        array![[ZERO, ZERO], [ZERO, ONE]]
    } else {
        array![[ONE, ZERO], [ZERO, ZERO]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn approx_eq(a: &Array2<Complex64>, b: &Array2<Complex64>) -> bool {
        a.shape() == b.shape() && a.iter().zip(b.iter()).all(|(x, y)| (x - y).norm() < 1e-12)
    }

    fn is_unitary(m: &Array2<Complex64>) -> bool {
        let dagger = m.t().mapv(|z| z.conj());
        approx_eq(&dagger.dot(m), &Array2::eye(m.nrows()))
    }

    #[test]
    fn test_all_gates_unitary() {
        let gates = [
            StandardGate::H,
            StandardGate::X,
            StandardGate::Y,
            StandardGate::Z,
            StandardGate::Rx(0.3),
            StandardGate::Ry(-1.7),
            StandardGate::Rz(2.5),
            StandardGate::CX,
            StandardGate::Swap,
        ];
        for gate in gates {
            let m = gate.matrix();
            assert_eq!(m.nrows(), 1 << gate.num_qubits(), "{gate}");
            assert!(is_unitary(&m), "{gate} is not unitary");
        }
    }

    #[test]
    fn test_rotation_period_is_4pi() {
        let rotations: [fn(f64) -> StandardGate; 3] =
            [StandardGate::Rx, StandardGate::Ry, StandardGate::Rz];
        for gate in rotations {
            let a = gate(0.4).matrix();
            assert!(approx_eq(&a, &gate(0.4 + 4.0 * PI).matrix()));
            // 2π only flips the global sign.
            assert!(approx_eq(&a, &gate(0.4 + 2.0 * PI).matrix().mapv(|z| -z)));
        }
    }

    #[test]
    fn test_rx_pi_is_x_up_to_phase() {
        let rx = StandardGate::Rx(PI).matrix();
        let x = StandardGate::X.matrix().mapv(|z| z * -I);
        assert!(approx_eq(&rx, &x));
    }

    #[test]
    fn test_projectors_sum_to_identity() {
        let sum = projector(false) + projector(true);
        assert!(approx_eq(&sum, &Array2::eye(2)));
        let p1 = projector(true);
        assert!(approx_eq(&p1.dot(&p1), &p1));
    }

    #[test]
    fn test_display() {
        assert_eq!(StandardGate::CX.to_string(), "cx");
        assert_eq!(StandardGate::Ry(0.5).to_string(), "ry(0.5)");
    }
}
