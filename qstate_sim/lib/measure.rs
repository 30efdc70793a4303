//! Projective single-qubit measurements in the Z-basis.
//!
//! The only source of non-determinism in a simulation is the uniform sample
//! drawn for each measurement, which comes from a [`RandomSource`]. Any
//! [`rand::Rng`] is a `RandomSource`; [`FixedSamples`] replays a scripted list
//! for reproducible tests.

use std::fmt;
use num_complex::Complex64 as C64;
use rand::Rng;
use tracing::debug;
use crate::{
    error::{ SimError, SimResult },
    gate::check_qubit,
    state::{ mask, StateVector },
};

/// Collapsed states with norm² below this cannot be renormalized.
pub const DEGENERATE_EPS: f64 = 1e-12;

/// Supplier of uniform samples in `[0, 1)`.
pub trait RandomSource {
    fn next_uniform(&mut self) -> f64;
}

impl<R> RandomSource for R
where R: Rng + ?Sized
{
    fn next_uniform(&mut self) -> f64 { self.gen::<f64>() }
}

/// A [`RandomSource`] that cycles through a fixed list of samples.
///
/// An empty list always yields `0.0`.
#[derive(Clone, Debug, Default)]
pub struct FixedSamples {
    samples: Vec<f64>,
    pos: usize,
}

impl FixedSamples {
    pub fn new(samples: Vec<f64>) -> Self { Self { samples, pos: 0 } }

    /// Number of samples handed out so far.
    pub fn drawn(&self) -> usize { self.pos }
}

impl RandomSource for FixedSamples {
    fn next_uniform(&mut self) -> f64 {
        if self.samples.is_empty() { return 0.0; }
        let r = self.samples[self.pos % self.samples.len()];
        self.pos += 1;
        r
    }
}

/// The result of a measurement.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A deterministic outcome resulting in ∣0⟩
    Det0,
    /// A deterministic outcome resulting in ∣1⟩
    Det1,
    /// A random outcome resulting in ∣0⟩
    Rand0,
    /// A random outcome resulting in ∣1⟩
    Rand1,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bit())
    }
}

impl Outcome {
    /// The observed bit.
    pub fn bit(self) -> u8 {
        match self {
            Self::Det0 | Self::Rand0 => 0,
            Self::Det1 | Self::Rand1 => 1,
        }
    }

    /// Return `true` if the qubit was found in ∣1⟩.
    pub fn is_one(self) -> bool { self.bit() == 1 }

    /// Return `true` if the outcome had probability 1.
    pub fn is_deterministic(self) -> bool {
        matches!(self, Self::Det0 | Self::Det1)
    }

    fn classify(bit: u8, prob: f64) -> Self {
        let det = prob >= 1.0 - DEGENERATE_EPS;
        match (bit, det) {
            (0, true ) => Self::Det0,
            (0, false) => Self::Rand0,
            (_, true ) => Self::Det1,
            (_, false) => Self::Rand1,
        }
    }
}

/// A single measurement event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Measurement {
    /// Measured qubit.
    pub qubit: usize,
    /// Observed outcome.
    pub outcome: Outcome,
    /// Probability of ∣0⟩ immediately before the measurement.
    pub p0: f64,
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Measurement outcome for qubit {}: {}", self.qubit, self.outcome)
    }
}

impl StateVector {
    /// Measure qubit `k`, returning the outcome along with the collapsed and
    /// renormalized post-measurement state.
    ///
    /// Draws exactly one sample `r` from `rng`; the outcome is 0 if `r < p0`
    /// and 1 otherwise. Fails with [`SimError::DegenerateMeasurement`] if the
    /// collapsed state has vanishing norm.
    pub fn measure<R>(&self, k: usize, rng: &mut R)
        -> SimResult<(Measurement, StateVector)>
    where R: RandomSource + ?Sized
    {
        check_qubit(k, self.n())?;
        let p0 = self.prob_zero(k);
        let r = rng.next_uniform();
        let bit: u8 = if r < p0 { 0 } else { 1 };

        let m = mask(self.n(), k);
        let keep = |i: usize| (i & m != 0) == (bit == 1);
        let collapsed: Vec<C64>
            = self.amps().iter().enumerate()
            .map(|(i, a)| if keep(i) { *a } else { C64::from(0.0) })
            .collect();
        let norm_sqr: f64 = collapsed.iter().map(|a| a.norm_sqr()).sum();
        if !(norm_sqr >= DEGENERATE_EPS) {
            return Err(SimError::DegenerateMeasurement { qubit: k, norm_sqr });
        }
        let norm = norm_sqr.sqrt();
        let post
            = StateVector::from_amplitudes(
                self.n(), collapsed.into_iter().map(|a| a / norm))?;

        let prob = if bit == 0 { p0 } else { 1.0 - p0 };
        let outcome = Outcome::classify(bit, prob);
        debug!(qubit = k, p0, r, outcome = %outcome, "measured");
        Ok((Measurement { qubit: k, outcome, p0 }, post))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{ rngs::StdRng, SeedableRng };
    use crate::gate::Gate;

    const EPS: f64 = 1e-9;

    fn plus_one() -> StateVector {
        // H on qubit 0 of ∣01⟩: (∣01⟩ + ∣11⟩)/√2
        StateVector::new(2, 0b01).unwrap()
            .apply_single(0, &crate::unitary::h()).unwrap()
    }

    #[test]
    fn definite_states_ignore_the_sample() {
        let one = StateVector::new(1, 1).unwrap();
        let zero = StateVector::new(1, 0).unwrap();
        for r in [0.0, 0.25, 0.5, 0.999_999] {
            let mut rng = FixedSamples::new(vec![r]);
            let (meas, post) = one.measure(0, &mut rng).unwrap();
            assert_eq!(meas.outcome, Outcome::Det1);
            assert_eq!(post, one);
            let (meas, post) = zero.measure(0, &mut rng).unwrap();
            assert_eq!(meas.outcome, Outcome::Det0);
            assert_eq!(post, zero);
        }
    }

    #[test]
    fn sample_picks_outcome_and_collapses() {
        let psi = plus_one();
        let (meas, post) = psi.measure(0, &mut FixedSamples::new(vec![0.3])).unwrap();
        assert_eq!(meas.outcome, Outcome::Rand0);
        assert_abs_diff_eq!(meas.p0, 0.5, epsilon = EPS);
        assert_abs_diff_eq!(post.amp(0b01).re, 1.0, epsilon = EPS);
        assert_abs_diff_eq!(post.norm_sqr(), 1.0, epsilon = EPS);

        let (meas, post) = psi.measure(0, &mut FixedSamples::new(vec![0.7])).unwrap();
        assert_eq!(meas.outcome, Outcome::Rand1);
        assert_abs_diff_eq!(post.amp(0b11).re, 1.0, epsilon = EPS);
        assert_eq!(meas.to_string(), "Measurement outcome for qubit 0: 1");
    }

    #[test]
    fn bell_measurements_agree() {
        let mut rng = StdRng::seed_from_u64(10546);
        for _ in 0..50 {
            let bell
                = StateVector::zero(2).unwrap()
                .apply_gate(Gate::H(0), &mut rng).unwrap().0
                .apply_cx(0, 1).unwrap();
            let (m0, post) = bell.measure(0, &mut rng).unwrap();
            let (m1, _) = post.measure(1, &mut rng).unwrap();
            assert!(!m0.outcome.is_deterministic());
            assert!(m1.outcome.is_deterministic());
            assert_eq!(m0.outcome.bit(), m1.outcome.bit());
        }
    }

    #[test]
    fn exactly_one_sample_per_measurement() {
        let mut rng = FixedSamples::new(vec![0.1, 0.9]);
        let psi = plus_one();
        psi.measure(0, &mut rng).unwrap();
        assert_eq!(rng.drawn(), 1);
        psi.measure(1, &mut rng).unwrap();
        assert_eq!(rng.drawn(), 2);
    }

    #[test]
    fn vanishing_branch_is_degenerate() {
        // p0 = 1 - 1e-14, and r lands above it
        let tiny: f64 = 1e-7;
        let psi = StateVector::from_amplitudes(
            1, vec![C64::from((1.0 - tiny * tiny).sqrt()), C64::from(tiny)])
            .unwrap();
        let res = psi.measure(0, &mut FixedSamples::new(vec![0.999_999_999_999_999]));
        assert!(matches!(res, Err(SimError::DegenerateMeasurement { qubit: 0, .. })));
    }

    #[test]
    fn nan_branch_is_degenerate() {
        let nan = C64::new(f64::NAN, 0.0);
        let zero = C64::from(0.0);
        let psi = StateVector::from_amplitudes(2, vec![nan, zero, nan, zero]).unwrap();
        let res = psi.measure(0, &mut FixedSamples::new(vec![0.5]));
        assert!(matches!(res, Err(SimError::DegenerateMeasurement { qubit: 0, .. })));
    }

    #[test]
    fn out_of_range_qubit() {
        let psi = StateVector::zero(2).unwrap();
        assert_eq!(
            psi.measure(2, &mut FixedSamples::default()),
            Err(SimError::InvalidQubitIndex { index: 2, n: 2 }),
        );
    }
}
