//! The simulation driver: a register size, an initial basis state, and an
//! ordered gate sequence that is replayed from scratch on every run.

use std::fmt;
use rand::{ rngs::StdRng, SeedableRng };
use rustc_hash::FxHashMap;
use tracing::{ debug, info };
use crate::{
    bloch::BlochSummary,
    density::{ DensityMatrix, Reduced },
    error::{ SimError, SimResult },
    gate::Gate,
    measure::{ Outcome, RandomSource },
    state::{ check_count, label, parse_basis, StateVector },
};

/// A gate sequence over an `n`-qubit register, starting from a fixed basis
/// state.
///
/// Every gate is validated against `n` as it is pushed, so a `Circuit` only
/// ever holds gates that can be applied.
#[derive(Clone, Debug, PartialEq)]
pub struct Circuit {
    n: usize,
    basis: usize,
    gates: Vec<Gate>,
}

impl Circuit {
    /// Create an empty circuit on `n` qubits starting from ∣0...0⟩.
    pub fn new(n: usize) -> SimResult<Self> {
        check_count(n)?;
        Ok(Self { n, basis: 0, gates: Vec::new() })
    }

    /// Create an empty circuit on `n` qubits starting from ∣`basis`⟩.
    pub fn with_basis(n: usize, basis: usize) -> SimResult<Self> {
        let mut circuit = Self::new(n)?;
        circuit.set_basis(basis)?;
        Ok(circuit)
    }

    /// Number of qubits.
    pub fn n(&self) -> usize { self.n }

    /// Index of the initial basis state.
    pub fn basis(&self) -> usize { self.basis }

    /// Ket label of the initial basis state.
    pub fn basis_label(&self) -> String { label(self.basis, self.n) }

    /// The gate sequence, in application order.
    pub fn gates(&self) -> &[Gate] { &self.gates }

    pub fn len(&self) -> usize { self.gates.len() }

    pub fn is_empty(&self) -> bool { self.gates.is_empty() }

    /// Set the initial basis state by index.
    pub fn set_basis(&mut self, basis: usize) -> SimResult<()> {
        if basis >= 1 << self.n {
            return Err(SimError::InvalidBasisState { index: basis, n: self.n });
        }
        self.basis = basis;
        Ok(())
    }

    /// Set the initial basis state by ket label, e.g. `"101"`.
    pub fn set_basis_label(&mut self, label: &str) -> SimResult<()> {
        self.basis = parse_basis(label, self.n)?;
        Ok(())
    }

    /// Resize the register. This clears the gate sequence and resets the
    /// initial state to ∣0...0⟩.
    pub fn set_num_qubits(&mut self, n: usize) -> SimResult<()> {
        check_count(n)?;
        self.n = n;
        self.basis = 0;
        self.gates.clear();
        Ok(())
    }

    /// Append a gate, rejecting it if it is invalid for this register.
    pub fn push(&mut self, gate: Gate) -> SimResult<()> {
        gate.validate(self.n)?;
        self.gates.push(gate);
        Ok(())
    }

    /// Append several gates, stopping at the first invalid one.
    pub fn extend<I>(&mut self, gates: I) -> SimResult<()>
    where I: IntoIterator<Item = Gate>
    {
        gates.into_iter().try_for_each(|g| self.push(g))
    }

    /// Remove and return the last gate.
    pub fn pop(&mut self) -> Option<Gate> { self.gates.pop() }

    /// Remove and return the gate at position `i`.
    pub fn remove(&mut self, i: usize) -> SimResult<Gate> {
        self.check_step(i)?;
        Ok(self.gates.remove(i))
    }

    /// Swap the gate at position `i` with its predecessor. Moving the first
    /// gate up does nothing.
    pub fn move_up(&mut self, i: usize) -> SimResult<()> {
        self.check_step(i)?;
        if i > 0 { self.gates.swap(i - 1, i); }
        Ok(())
    }

    /// Swap the gate at position `i` with its successor. Moving the last gate
    /// down does nothing.
    pub fn move_down(&mut self, i: usize) -> SimResult<()> {
        self.check_step(i)?;
        if i + 1 < self.gates.len() { self.gates.swap(i, i + 1); }
        Ok(())
    }

    /// Remove all gates.
    pub fn clear(&mut self) { self.gates.clear(); }

    fn check_step(&self, i: usize) -> SimResult<()> {
        if i < self.gates.len() {
            Ok(())
        } else {
            Err(SimError::StepOutOfRange { index: i, len: self.gates.len() })
        }
    }

    /// The state the circuit starts from.
    pub fn initial_state(&self) -> SimResult<StateVector> {
        StateVector::new(self.n, self.basis)
    }

    /// Apply every gate in order, returning the final state and a record of
    /// each measurement.
    pub fn replay<R>(&self, rng: &mut R)
        -> SimResult<(StateVector, Vec<MeasurementRecord>)>
    where R: RandomSource + ?Sized
    {
        let mut records: Vec<MeasurementRecord> = Vec::new();
        let mut state = self.initial_state()?;
        for (step, gate) in self.gates.iter().enumerate() {
            let (next, meas) = state.apply_gate(*gate, rng)?;
            debug!(step, gate = %gate, "applied gate");
            if let Some(m) = meas {
                records.push(MeasurementRecord {
                    step,
                    qubit: m.qubit,
                    outcome: m.outcome,
                    p0: m.p0,
                });
            }
            state = next;
        }
        Ok((state, records))
    }

    /// Run the circuit and derive the density matrix, reduced density
    /// matrices and Bloch summaries of the final state.
    pub fn run<R>(&self, rng: &mut R) -> SimResult<RunResult>
    where R: RandomSource + ?Sized
    {
        info!(
            n = self.n,
            basis = %self.basis_label(),
            gates = self.gates.len(),
            "running circuit"
        );
        let (state, measurements) = self.replay(rng)?;
        let density = DensityMatrix::from_state(&state);
        let reduced = density.reduce_all()?;
        let bloch: Vec<BlochSummary> = reduced.iter().map(Reduced::bloch).collect();
        info!(measurements = measurements.len(), "run complete");
        Ok(RunResult { state, density, reduced, bloch, measurements })
    }

    /// Run the circuit with a [`StdRng`] seeded from `seed`, or from system
    /// entropy if `None`.
    pub fn run_seeded(&self, seed: Option<u64>) -> SimResult<RunResult> {
        let mut rng
            = seed.map(StdRng::seed_from_u64)
            .unwrap_or_else(StdRng::from_entropy);
        self.run(&mut rng)
    }

    /// Replay the circuit, then measure every qubit in order and return the
    /// observed bitstring with qubit 0 leftmost.
    pub fn sample<R>(&self, rng: &mut R) -> SimResult<String>
    where R: RandomSource + ?Sized
    {
        let (mut state, _) = self.replay(rng)?;
        let mut bits = String::with_capacity(self.n);
        for k in 0..self.n {
            let (meas, post) = state.measure(k, rng)?;
            bits.push(if meas.outcome.is_one() { '1' } else { '0' });
            state = post;
        }
        Ok(bits)
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} qubits from ∣{}⟩", self.n, self.basis_label())?;
        for (step, gate) in self.gates.iter().enumerate() {
            write!(f, "\n{:>3}: {}", step, gate)?;
        }
        Ok(())
    }
}

/// A measurement performed during a run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeasurementRecord {
    /// Position of the `MEASURE` gate in the sequence.
    pub step: usize,
    pub qubit: usize,
    pub outcome: Outcome,
    /// Probability of ∣0⟩ immediately before the measurement.
    pub p0: f64,
}

impl fmt::Display for MeasurementRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Measurement outcome for qubit {}: {}", self.qubit, self.outcome)
    }
}

/// Everything derived from a single run.
#[derive(Clone, Debug)]
pub struct RunResult {
    /// Final state vector.
    pub state: StateVector,
    /// `∣ψ⟩⟨ψ∣` of the final state.
    pub density: DensityMatrix,
    /// One reduced density matrix per qubit.
    pub reduced: Vec<Reduced>,
    /// One Bloch summary per qubit.
    pub bloch: Vec<BlochSummary>,
    /// Measurement log, in sequence order.
    pub measurements: Vec<MeasurementRecord>,
}

/// Count occurrences of each bitstring.
pub fn tally<I>(outcomes: I) -> FxHashMap<String, usize>
where I: IntoIterator<Item = String>
{
    let mut counts: FxHashMap<String, usize> = FxHashMap::default();
    outcomes.into_iter()
        .for_each(|bits| { *counts.entry(bits).or_insert(0) += 1; });
    counts
}
