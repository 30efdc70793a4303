//! Single-qubit operators as 2×2 complex matrices.
//!
//! Matrices are indexed as `U[(row, col)]` with row/column 0 corresponding to
//! ∣0⟩, so that `U[(j, b)]` is the amplitude sent from ∣b⟩ to ∣j⟩.
//!
//! The eight fixed gates are built once and copied out on request; the four
//! angle-parameterized families are computed exactly from `cos`, `sin` and
//! complex exponentials with the angle given in radians.

use std::f64::consts::{ FRAC_1_SQRT_2, FRAC_PI_4 };
use nalgebra as na;
use num_complex::Complex64 as C64;
use once_cell::sync::Lazy;
use crate::error::{ SimError, SimResult };

/// A 2×2 complex operator.
pub type Mat2 = na::Matrix2<C64>;

/// Tolerance on `U U† = I` used by [`checked`].
pub const UNITARY_EPS: f64 = 1e-9;

const ZERO: C64 = C64 { re: 0.0, im: 0.0 };
const ONE: C64 = C64 { re: 1.0, im: 0.0 };
const I: C64 = C64 { re: 0.0, im: 1.0 };
const ORT2: C64 = C64 { re: FRAC_1_SQRT_2, im: 0.0 };

static PAULI_X: Lazy<Mat2> = Lazy::new(|| Mat2::new(ZERO, ONE, ONE, ZERO));
static PAULI_Y: Lazy<Mat2> = Lazy::new(|| Mat2::new(ZERO, -I, I, ZERO));
static PAULI_Z: Lazy<Mat2> = Lazy::new(|| Mat2::new(ONE, ZERO, ZERO, -ONE));
static HADAMARD: Lazy<Mat2> = Lazy::new(|| Mat2::new(ORT2, ORT2, ORT2, -ORT2));
static S_GATE: Lazy<Mat2> = Lazy::new(|| Mat2::new(ONE, ZERO, ZERO, I));
static S_INV: Lazy<Mat2> = Lazy::new(|| Mat2::new(ONE, ZERO, ZERO, -I));
static T_GATE: Lazy<Mat2>
    = Lazy::new(|| Mat2::new(ONE, ZERO, ZERO, C64::cis(FRAC_PI_4)));
static T_INV: Lazy<Mat2>
    = Lazy::new(|| Mat2::new(ONE, ZERO, ZERO, C64::cis(-FRAC_PI_4)));

/// Pauli X, `[[0, 1], [1, 0]]`.
pub fn x() -> Mat2 { *PAULI_X }

/// Pauli Y, `[[0, -i], [i, 0]]`.
pub fn y() -> Mat2 { *PAULI_Y }

/// Pauli Z, `[[1, 0], [0, -1]]`.
pub fn z() -> Mat2 { *PAULI_Z }

/// Hadamard, `[[1, 1], [1, -1]] / √2`.
pub fn h() -> Mat2 { *HADAMARD }

/// π/2 phase, `diag(1, i)`.
pub fn s() -> Mat2 { *S_GATE }

/// Inverse of [`s`], `diag(1, -i)`.
pub fn s_inv() -> Mat2 { *S_INV }

/// π/4 phase, `diag(1, e^{iπ/4})`.
pub fn t() -> Mat2 { *T_GATE }

/// Inverse of [`t`], `diag(1, e^{-iπ/4})`.
pub fn t_inv() -> Mat2 { *T_INV }

/// Rotation by `theta` about X.
pub fn rx(theta: f64) -> Mat2 {
    let (sin, cos) = (theta / 2.0).sin_cos();
    let c = C64::from(cos);
    let mis = C64::new(0.0, -sin);
    Mat2::new(c, mis, mis, c)
}

/// Rotation by `theta` about Y.
pub fn ry(theta: f64) -> Mat2 {
    let (sin, cos) = (theta / 2.0).sin_cos();
    Mat2::new(cos.into(), (-sin).into(), sin.into(), cos.into())
}

/// Rotation by `theta` about Z, `diag(e^{-iθ/2}, e^{iθ/2})`.
pub fn rz(theta: f64) -> Mat2 {
    Mat2::new(C64::cis(-theta / 2.0), ZERO, ZERO, C64::cis(theta / 2.0))
}

/// Relative phase `phi` on ∣1⟩, `diag(1, e^{iφ})`.
pub fn phase(phi: f64) -> Mat2 {
    Mat2::new(ONE, ZERO, ZERO, C64::cis(phi))
}

/// Largest entry-wise deviation of `U U†` from the identity.
///
/// Non-finite entries give an infinite deviation.
pub fn unitarity_deviation(u: &Mat2) -> f64 {
    (u * u.adjoint() - Mat2::identity())
        .iter()
        .map(|a| a.norm())
        .fold(0.0, |m, d| if d.is_nan() { f64::INFINITY } else { m.max(d) })
}

/// Return `true` if `U U† = I` to within `eps`.
pub fn is_unitary(u: &Mat2, eps: f64) -> bool {
    unitarity_deviation(u) < eps
}

/// Pass `u` through if it is unitary to within [`UNITARY_EPS`], otherwise
/// fail with [`SimError::NonUnitaryGate`] labeled by `gate`.
pub fn checked(gate: &'static str, u: Mat2) -> SimResult<Mat2> {
    let deviation = unitarity_deviation(&u);
    if deviation < UNITARY_EPS {
        Ok(u)
    } else {
        Err(SimError::NonUnitaryGate { gate, deviation })
    }
}
