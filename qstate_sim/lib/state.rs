//! Pure states of an `n`-qubit register as complex amplitude vectors.
//!
//! The amplitude at index `i` belongs to the basis state whose ket label is the
//! `n`-bit binary representation of `i`, with qubit 0 the *most* significant
//! bit. Every gate application returns a new [`StateVector`]; the input is
//! never modified, so a rejected gate leaves the caller's state untouched.

use std::fmt;
use nalgebra as na;
use num_complex::Complex64 as C64;
use crate::{
    MAX_QUBITS,
    error::{ SimError, SimResult },
    gate::{ check_qubit, Gate },
    measure::{ Measurement, RandomSource },
    unitary::{ self, Mat2 },
};

/// Amplitudes with magnitude below this are omitted by the `Display` impl.
pub const DISPLAY_EPS: f64 = 1e-9;

/// An `n`-qubit pure state.
#[derive(Clone, Debug, PartialEq)]
pub struct StateVector {
    n: usize,
    psi: na::DVector<C64>,
}

impl StateVector {
    /// Create the basis state ∣`basis`⟩ of an `n`-qubit register.
    pub fn new(n: usize, basis: usize) -> SimResult<Self> {
        check_count(n)?;
        let dim = 1_usize << n;
        if basis >= dim {
            return Err(SimError::InvalidBasisState { index: basis, n });
        }
        let mut psi: na::DVector<C64> = na::DVector::zeros(dim);
        psi[basis] = C64::from(1.0);
        Ok(Self { n, psi })
    }

    /// Create ∣0...0⟩.
    pub fn zero(n: usize) -> SimResult<Self> { Self::new(n, 0) }

    /// Create the basis state named by a ket label such as `"010"`.
    pub fn from_label(label: &str) -> SimResult<Self> {
        let n = label.chars().count();
        check_count(n)?;
        Self::new(n, parse_basis(label, n)?)
    }

    /// Wrap a raw list of amplitudes. No normalization is performed.
    pub fn from_amplitudes<I>(n: usize, amps: I) -> SimResult<Self>
    where I: IntoIterator<Item = C64>
    {
        check_count(n)?;
        let amps: Vec<C64> = amps.into_iter().collect();
        let dim = 1_usize << n;
        if amps.len() != dim {
            return Err(SimError::DimensionMismatch { expected: dim, got: amps.len() });
        }
        Ok(Self { n, psi: na::DVector::from_vec(amps) })
    }

    /// Number of qubits.
    pub fn n(&self) -> usize { self.n }

    /// Number of amplitudes, `2^n`.
    pub fn dim(&self) -> usize { self.psi.len() }

    /// Borrow the amplitudes.
    pub fn amps(&self) -> &na::DVector<C64> { &self.psi }

    /// Amplitude of basis state `i`.
    pub fn amp(&self, i: usize) -> C64 { self.psi[i] }

    /// Consume `self`, returning the amplitude vector.
    pub fn into_vector(self) -> na::DVector<C64> { self.psi }

    /// `Σ |ψ_i|²`.
    pub fn norm_sqr(&self) -> f64 {
        self.psi.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Born-rule probabilities of every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.psi.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Probability that qubit `k` is found in ∣0⟩.
    ///
    /// *Panics if `k` is out of range.*
    pub fn prob_zero(&self, k: usize) -> f64 {
        let m = mask(self.n, k);
        self.psi.iter().enumerate()
            .filter(|(i, _)| i & m == 0)
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }

    /// Ket label of basis state `i`, qubit 0 first.
    pub fn basis_label(&self, i: usize) -> String { label(i, self.n) }

    /// Apply an arbitrary single-qubit operator to qubit `k`, first checking
    /// that it is unitary.
    pub fn apply_matrix(&self, k: usize, u: Mat2) -> SimResult<Self> {
        let u = unitary::checked("custom", u)?;
        self.apply_single(k, &u)
    }

    /// Apply a 2×2 operator to qubit `k` without building the full
    /// `2^n × 2^n` matrix.
    pub fn apply_single(&self, k: usize, u: &Mat2) -> SimResult<Self> {
        check_qubit(k, self.n)?;
        let m = mask(self.n, k);
        let mut out: na::DVector<C64> = na::DVector::zeros(self.dim());
        for (i, a) in self.psi.iter().enumerate() {
            let b = usize::from(i & m != 0);
            out[i & !m] += u[(0, b)] * *a;
            out[i | m] += u[(1, b)] * *a;
        }
        Ok(Self { n: self.n, psi: out })
    }

    /// Controlled-NOT with control `c` and target `t`.
    pub fn apply_cx(&self, c: usize, t: usize) -> SimResult<Self> {
        Gate::CX(c, t).validate(self.n)?;
        let mc = mask(self.n, c);
        let mt = mask(self.n, t);
        Ok(self.permute(|i| if i & mc != 0 { i ^ mt } else { i }))
    }

    /// Controlled-Z on qubits `c` and `t`.
    pub fn apply_cz(&self, c: usize, t: usize) -> SimResult<Self> {
        Gate::CZ(c, t).validate(self.n)?;
        let both = mask(self.n, c) | mask(self.n, t);
        let psi
            = self.psi.iter().enumerate()
            .map(|(i, a)| if i & both == both { -*a } else { *a });
        Ok(Self { n: self.n, psi: na::DVector::from_iterator(self.dim(), psi) })
    }

    /// Exchange qubits `a` and `b`.
    pub fn apply_swap(&self, a: usize, b: usize) -> SimResult<Self> {
        Gate::Swap(a, b).validate(self.n)?;
        Ok(self.swap_bits(a, b))
    }

    /// Toffoli with controls `c0`, `c1` and target `t`.
    pub fn apply_ccx(&self, c0: usize, c1: usize, t: usize) -> SimResult<Self> {
        Gate::CCX(c0, c1, t).validate(self.n)?;
        let mc = mask(self.n, c0) | mask(self.n, c1);
        let mt = mask(self.n, t);
        Ok(self.permute(|i| if i & mc == mc { i ^ mt } else { i }))
    }

    /// Perform the action of a gate.
    ///
    /// Measurements consume one sample from `rng` and report the outcome;
    /// unitaries leave `rng` alone. Invalid gates are rejected before any
    /// amplitude is touched.
    pub fn apply_gate<R>(&self, gate: Gate, rng: &mut R)
        -> SimResult<(Self, Option<Measurement>)>
    where R: RandomSource + ?Sized
    {
        gate.validate(self.n)?;
        if let Some(u) = gate.matrix() {
            let u = unitary::checked(gate.name(), u)?;
            let k = gate.qubits()[0];
            return Ok((self.apply_single(k, &u)?, None));
        }
        match gate {
            Gate::CX(c, t) => Ok((self.apply_cx(c, t)?, None)),
            Gate::CZ(c, t) => Ok((self.apply_cz(c, t)?, None)),
            Gate::Swap(a, b) => Ok((self.apply_swap(a, b)?, None)),
            Gate::CCX(c0, c1, t) => Ok((self.apply_ccx(c0, c1, t)?, None)),
            Gate::Measure(k) => {
                let (meas, post) = self.measure(k, rng)?;
                Ok((post, Some(meas)))
            },
            _ => unreachable!(),
        }
    }

    // move each amplitude at index i to index f(i); f must be a bijection
    fn permute<F>(&self, f: F) -> Self
    where F: Fn(usize) -> usize
    {
        let mut out: na::DVector<C64> = na::DVector::zeros(self.dim());
        for (i, a) in self.psi.iter().enumerate() {
            out[f(i)] = *a;
        }
        Self { n: self.n, psi: out }
    }

    fn swap_bits(&self, a: usize, b: usize) -> Self {
        if a == b { return self.clone(); }
        let ma = mask(self.n, a);
        let mb = mask(self.n, b);
        self.permute(|i| {
            if (i & ma == 0) == (i & mb == 0) { i } else { i ^ ma ^ mb }
        })
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<(usize, &C64)>
            = self.psi.iter().enumerate()
            .filter(|(_, a)| a.norm() > DISPLAY_EPS)
            .collect();
        let nterms = terms.len();
        for (k, (i, a)) in terms.into_iter().enumerate() {
            write!(f, "∣{}⟩: {}", self.basis_label(i), fmt_complex(*a, 'j'))?;
            if k < nterms - 1 { writeln!(f)?; }
        }
        Ok(())
    }
}

/// Bit mask selecting qubit `k` in a basis index of an `n`-qubit register.
pub(crate) fn mask(n: usize, k: usize) -> usize { 1 << (n - 1 - k) }

/// Value (0 or 1) of qubit `k` in basis index `i`.
pub fn bit(i: usize, n: usize, k: usize) -> usize {
    usize::from(i & mask(n, k) != 0)
}

/// `n`-character ket label of basis index `i`, qubit 0 first.
pub fn label(i: usize, n: usize) -> String {
    (0..n).map(|k| if bit(i, n, k) == 1 { '1' } else { '0' }).collect()
}

/// Parse an `n`-character binary label (qubit 0 first) into a basis index.
pub fn parse_basis(label: &str, n: usize) -> SimResult<usize> {
    let bad = || SimError::InvalidBasisLabel { label: label.to_string(), n };
    if label.chars().count() != n || !label.chars().all(|c| c == '0' || c == '1')
    {
        return Err(bad());
    }
    usize::from_str_radix(label, 2).map_err(|_| bad())
}

pub(crate) fn check_count(n: usize) -> SimResult<()> {
    if (1..=MAX_QUBITS).contains(&n) {
        Ok(())
    } else {
        Err(SimError::InvalidQubitCount { n, max: MAX_QUBITS })
    }
}

// `re±im<unit>` to three decimals
pub(crate) fn fmt_complex(a: C64, unit: char) -> String {
    let sign = if a.im.is_sign_negative() && a.im.abs() >= 5e-4 { '-' } else { '+' };
    format!("{:.3}{}{:.3}{}", a.re, sign, a.im.abs(), unit)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::FRAC_1_SQRT_2;
    use approx::assert_abs_diff_eq;
    use rand::{ rngs::StdRng, SeedableRng };
    use crate::measure::FixedSamples;

    const EPS: f64 = 1e-9;

    fn unit(n: usize, basis: usize) -> StateVector {
        StateVector::new(n, basis).unwrap()
    }

    fn assert_close(a: &StateVector, b: &StateVector) {
        assert_eq!(a.n(), b.n());
        let diff = (a.amps() - b.amps()).norm();
        assert!(diff < EPS, "states differ by {}:\n{}\n---\n{}", diff, a, b);
    }

    fn apply(state: &StateVector, gate: Gate) -> StateVector {
        state.apply_gate(gate, &mut FixedSamples::new(vec![0.5])).unwrap().0
    }

    #[test]
    fn init_and_labels() {
        let psi = unit(3, 0b011);
        assert_eq!(psi.dim(), 8);
        assert_eq!(psi.amp(3), C64::from(1.0));
        assert_eq!(psi.basis_label(3), "011");
        assert_eq!(parse_basis("110", 3), Ok(6));
        assert_eq!(StateVector::from_label("10").unwrap(), unit(2, 2));
        assert!(parse_basis("12", 2).is_err());
        assert!(parse_basis("0", 2).is_err());
        assert_eq!(
            StateVector::new(6, 0),
            Err(SimError::InvalidQubitCount { n: 6, max: 5 }),
        );
        assert_eq!(
            StateVector::new(0, 0),
            Err(SimError::InvalidQubitCount { n: 0, max: 5 }),
        );
        assert_eq!(
            StateVector::new(2, 4),
            Err(SimError::InvalidBasisState { index: 4, n: 2 }),
        );
    }

    #[test]
    fn qubit_zero_is_most_significant() {
        let psi = apply(&unit(3, 0), Gate::X(0));
        assert_close(&psi, &unit(3, 0b100));
        let psi = apply(&unit(3, 0), Gate::X(2));
        assert_close(&psi, &unit(3, 0b001));
    }

    #[test]
    fn cnot_truth_table() {
        assert_close(&apply(&unit(2, 0b10), Gate::CX(0, 1)), &unit(2, 0b11));
        assert_close(&apply(&unit(2, 0b11), Gate::CX(0, 1)), &unit(2, 0b10));
        assert_close(&apply(&unit(2, 0b00), Gate::CX(0, 1)), &unit(2, 0b00));
        assert_close(&apply(&unit(2, 0b01), Gate::CX(0, 1)), &unit(2, 0b01));
        assert_close(&apply(&unit(2, 0b01), Gate::CX(1, 0)), &unit(2, 0b11));
    }

    #[test]
    fn ccnot_truth_table() {
        assert_close(&apply(&unit(3, 0b110), Gate::CCX(0, 1, 2)), &unit(3, 0b111));
        assert_close(&apply(&unit(3, 0b100), Gate::CCX(0, 1, 2)), &unit(3, 0b100));
        assert_close(&apply(&unit(3, 0b011), Gate::CCX(2, 1, 0)), &unit(3, 0b111));
    }

    #[test]
    fn bell_state_amplitudes() {
        let psi = apply(&apply(&unit(2, 0), Gate::H(0)), Gate::CX(0, 1));
        assert_abs_diff_eq!(psi.amp(0).re, FRAC_1_SQRT_2, epsilon = EPS);
        assert_abs_diff_eq!(psi.amp(3).re, FRAC_1_SQRT_2, epsilon = EPS);
        assert_abs_diff_eq!(psi.amp(1).norm(), 0.0, epsilon = EPS);
        assert_abs_diff_eq!(psi.amp(2).norm(), 0.0, epsilon = EPS);
        assert_eq!(psi.to_string(), "∣00⟩: 0.707+0.000j\n∣11⟩: 0.707+0.000j");
    }

    #[test]
    fn cz_and_swap() {
        let plus = apply(&apply(&unit(2, 0), Gate::H(0)), Gate::H(1));
        let psi = apply(&plus, Gate::CZ(0, 1));
        assert_abs_diff_eq!(psi.amp(3).re, -0.5, epsilon = EPS);
        assert_abs_diff_eq!(psi.amp(1).re, 0.5, epsilon = EPS);

        assert_close(&apply(&unit(3, 0b100), Gate::Swap(0, 2)), &unit(3, 0b001));
        assert_close(&apply(&unit(3, 0b101), Gate::Swap(0, 2)), &unit(3, 0b101));
        assert_close(&unit(3, 0b110).swap_bits(1, 1), &unit(3, 0b110));
    }

    #[test]
    fn self_inverse_gates() {
        let mut rng = StdRng::seed_from_u64(10546);
        let mut psi = unit(3, 0);
        for _ in 0..12 { psi = apply(&psi, Gate::sample(3, &mut rng)); }
        let gates = [
            Gate::X(1), Gate::Z(0), Gate::H(2), Gate::CX(0, 2), Gate::CZ(1, 0),
            Gate::CCX(2, 0, 1), Gate::Swap(1, 2),
        ];
        for g in gates {
            assert_close(&apply(&apply(&psi, g), g), &psi);
        }
    }

    #[test]
    fn random_circuits_preserve_norm() {
        let mut rng = StdRng::seed_from_u64(271828);
        for n in 1..=5 {
            for _ in 0..20 {
                let mut psi = unit(n, 0);
                for _ in 0..30 { psi = apply(&psi, Gate::sample(n, &mut rng)); }
                assert_abs_diff_eq!(psi.norm_sqr(), 1.0, epsilon = EPS);
            }
        }
    }

    #[test]
    fn invalid_gates_are_rejected() {
        let psi = unit(2, 1);
        let mut rng = FixedSamples::new(vec![0.5]);
        assert_eq!(
            psi.apply_gate(Gate::X(2), &mut rng),
            Err(SimError::InvalidQubitIndex { index: 2, n: 2 }),
        );
        assert_eq!(
            psi.apply_cx(1, 1),
            Err(SimError::DuplicateOperand { gate: "CNOT" }),
        );
        assert!(matches!(
            psi.apply_gate(Gate::CCX(0, 1, 1), &mut rng),
            Err(SimError::InsufficientQubits { .. }),
        ));
        assert_eq!(psi, unit(2, 1));
    }

    #[test]
    fn custom_matrices_must_be_unitary() {
        let psi = unit(1, 0);
        let half = C64::from(0.5);
        let bad = Mat2::new(half, half, half, half);
        assert!(matches!(
            psi.apply_matrix(0, bad),
            Err(SimError::NonUnitaryGate { gate: "custom", .. }),
        ));
        let flipped = psi.apply_matrix(0, unitary::x()).unwrap();
        assert_close(&flipped, &unit(1, 1));
    }

    #[test]
    fn born_rule_marginals() {
        let psi = apply(&unit(2, 0), Gate::Ry(1, std::f64::consts::FRAC_PI_3));
        // cos²(π/6) = 3/4
        assert_abs_diff_eq!(psi.prob_zero(1), 0.75, epsilon = EPS);
        assert_abs_diff_eq!(psi.prob_zero(0), 1.0, epsilon = EPS);
        let total: f64 = psi.probabilities().iter().sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = EPS);
    }

    #[test]
    fn from_amplitudes_checks_length() {
        assert_eq!(
            StateVector::from_amplitudes(2, vec![C64::from(1.0); 3]),
            Err(SimError::DimensionMismatch { expected: 4, got: 3 }),
        );
        let psi = StateVector::from_amplitudes(1, vec![C64::from(2.0), C64::from(0.0)])
            .unwrap();
        assert_abs_diff_eq!(psi.norm_sqr(), 4.0);
    }
}
