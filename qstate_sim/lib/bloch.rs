//! Bloch-sphere description of a single qubit.

use std::fmt;
use num_complex::Complex64 as C64;
use crate::{ density::Reduced, unitary::Mat2 };

/// Bloch radii below this are treated as the maximally mixed state.
pub const MIXED_EPS: f64 = 1e-6;

/// Bloch vector, purity, and von Neumann entropy of one qubit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BlochSummary {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// `Tr(ρ²) = (1 + r²) / 2`, in `[0.5, 1]`.
    pub purity: f64,
    /// `-Tr(ρ log₂ ρ)`, in `[0, 1]`.
    pub entropy: f64,
}

impl BlochSummary {
    /// The maximally mixed state: zero vector, purity 1/2, entropy 1.
    pub fn mixed() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0, purity: 0.5, entropy: 1.0 }
    }

    /// Derive the summary from a 2×2 density matrix with unit trace.
    pub fn from_reduced(red: &Mat2) -> Self {
        let x = 2.0 * red[(0, 1)].re;
        let y = -2.0 * red[(0, 1)].im;
        let z = red[(0, 0)].re - red[(1, 1)].re;
        let r = (x * x + y * y + z * z).sqrt();
        if r < MIXED_EPS { return Self::mixed(); }
        // rounding can push r slightly past 1
        let purity = ((1.0 + r * r) / 2.0).clamp(0.5, 1.0);
        let entropy = -(xlog2x((1.0 + r) / 2.0) + xlog2x((1.0 - r) / 2.0));
        Self { x, y, z, purity, entropy: entropy.clamp(0.0, 1.0) }
    }

    /// Length of the Bloch vector.
    pub fn radius(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Return `true` if the qubit was reported as maximally mixed.
    pub fn is_mixed(&self) -> bool { self.radius() < MIXED_EPS }

    /// Polar and azimuthal angles `(θ, φ)` of the Bloch vector, in radians.
    ///
    /// Both are zero for the maximally mixed state.
    pub fn angles(&self) -> (f64, f64) {
        let r = self.radius();
        if r < MIXED_EPS { return (0.0, 0.0); }
        let theta = (self.z / r).clamp(-1.0, 1.0).acos();
        let phi = self.y.atan2(self.x);
        (theta, phi)
    }
}

impl From<&Reduced> for BlochSummary {
    fn from(red: &Reduced) -> Self { Self::from_reduced(&red.rho) }
}

impl fmt::Display for BlochSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x = {:.3}, y = {:.3}, z = {:.3}, purity = {:.3}, entropy = {:.3}",
            self.x, self.y, self.z, self.purity, self.entropy,
        )
    }
}

/// Shorthand for [`BlochSummary::from_reduced`].
pub fn bloch_of(red: &Mat2) -> BlochSummary { BlochSummary::from_reduced(red) }

// 0 log 0 = 0; also absorbs slightly negative eigenvalues from rounding
fn xlog2x(p: f64) -> f64 {
    if p <= 0.0 { 0.0 } else { p * p.log2() }
}

/// Density matrix of the pure state `α∣0⟩ + β∣1⟩`.
pub fn pure_density(alpha: C64, beta: C64) -> Mat2 {
    Mat2::new(
        alpha * alpha.conj(), alpha * beta.conj(),
        beta * alpha.conj(), beta * beta.conj(),
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{ FRAC_1_SQRT_2, FRAC_PI_2 };
    use approx::assert_abs_diff_eq;
    use rand::{ rngs::StdRng, Rng, SeedableRng };
    use crate::{ density::DensityMatrix, gate::Gate, measure::FixedSamples, state::StateVector };

    const EPS: f64 = 1e-9;

    #[test]
    fn basis_states_are_poles() {
        let b = bloch_of(&pure_density(C64::from(1.0), C64::from(0.0)));
        assert_abs_diff_eq!(b.z, 1.0, epsilon = EPS);
        assert_abs_diff_eq!(b.purity, 1.0, epsilon = EPS);
        assert_abs_diff_eq!(b.entropy, 0.0, epsilon = EPS);
        assert_abs_diff_eq!(b.angles().0, 0.0, epsilon = EPS);

        let b = bloch_of(&pure_density(C64::from(0.0), C64::from(1.0)));
        assert_abs_diff_eq!(b.z, -1.0, epsilon = EPS);
        assert_abs_diff_eq!(b.entropy, 0.0, epsilon = EPS);
    }

    #[test]
    fn superpositions_lie_on_the_equator() {
        let h = C64::from(FRAC_1_SQRT_2);
        let b = bloch_of(&pure_density(h, h));
        assert_abs_diff_eq!(b.x, 1.0, epsilon = EPS);
        assert_abs_diff_eq!(b.y, 0.0, epsilon = EPS);
        assert_abs_diff_eq!(b.z, 0.0, epsilon = EPS);

        // (∣0⟩ + i∣1⟩)/√2 points along +y
        let b = bloch_of(&pure_density(h, C64::new(0.0, FRAC_1_SQRT_2)));
        assert_abs_diff_eq!(b.y, 1.0, epsilon = EPS);
        assert_abs_diff_eq!(b.angles().0, FRAC_PI_2, epsilon = EPS);
        assert_abs_diff_eq!(b.angles().1, FRAC_PI_2, epsilon = EPS);
    }

    #[test]
    fn overlong_bloch_vectors_stay_physical() {
        // a pure state perturbed past the sphere by rounding
        let red = Mat2::new(
            C64::from(1.0 + 1e-12), C64::from(1e-9),
            C64::from(1e-9), C64::from(-1e-12),
        );
        let b = BlochSummary::from_reduced(&red);
        assert!(b.radius() > 1.0);
        assert!(b.purity <= 1.0);
        assert_abs_diff_eq!(b.purity, 1.0, epsilon = EPS);
        assert!((0.0..=1.0).contains(&b.entropy));
    }

    #[test]
    fn bell_qubits_are_maximally_mixed() {
        let mut rng = FixedSamples::default();
        let bell
            = StateVector::zero(2).unwrap()
            .apply_gate(Gate::H(0), &mut rng).unwrap().0
            .apply_gate(Gate::CX(0, 1), &mut rng).unwrap().0;
        for red in DensityMatrix::from_state(&bell).reduce_all().unwrap() {
            let b = red.bloch();
            assert!(b.is_mixed());
            assert_eq!(b, BlochSummary::mixed());
            assert_eq!(
                b.to_string(),
                "x = 0.000, y = 0.000, z = 0.000, purity = 0.500, entropy = 1.000",
            );
        }
    }

    #[test]
    fn partially_mixed_entropy() {
        // diag(3/4, 1/4): r = 1/2
        let red = Mat2::new(
            C64::from(0.75), C64::from(0.0),
            C64::from(0.0), C64::from(0.25),
        );
        let b = bloch_of(&red);
        let expected = -(0.75 * 0.75_f64.log2() + 0.25 * 0.25_f64.log2());
        assert_abs_diff_eq!(b.z, 0.5, epsilon = EPS);
        assert_abs_diff_eq!(b.purity, 0.625, epsilon = EPS);
        assert_abs_diff_eq!(b.entropy, expected, epsilon = EPS);
    }

    #[test]
    fn random_states_stay_in_the_ball() {
        let mut rng = StdRng::seed_from_u64(271828);
        for _ in 0..200 {
            let n: usize = rng.gen_range(1..=4);
            let psi
                = (0..30)
                .map(|_| Gate::sample(n, &mut rng))
                .filter(|g| !g.is_measure())
                .fold(StateVector::zero(n).unwrap(), |psi, g| {
                    psi.apply_gate(g, &mut FixedSamples::default()).unwrap().0
                });
            for red in DensityMatrix::from_state(&psi).reduce_all().unwrap() {
                let b = red.bloch();
                assert!(b.radius() <= 1.0 + EPS);
                assert!((0.5 - EPS..=1.0 + EPS).contains(&b.purity));
                assert!((0.0..=1.0).contains(&b.entropy));
            }
        }
    }
}
