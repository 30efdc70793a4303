//! Failure modes for building and running circuits.
//!
//! All validation is local: a gate is checked against the register size when
//! it is pushed onto a [`Circuit`][crate::circuit::Circuit] and again when it
//! is applied, and a rejected gate never touches the state vector.

use thiserror::Error;

pub type SimResult<T> = Result<T, SimError>;

#[derive(Error, Clone, Debug, PartialEq)]
pub enum SimError {
    /// Register size outside `1..=MAX_QUBITS`.
    #[error("qubit count must be between 1 and {max}; got {n}")]
    InvalidQubitCount { n: usize, max: usize },

    /// A gate operand outside `0..n`.
    #[error("qubit index {index} out of range for a {n}-qubit register")]
    InvalidQubitIndex { index: i64, n: usize },

    /// Initial basis index outside `0..2^n`.
    #[error("basis index {index} out of range for a {n}-qubit register")]
    InvalidBasisState { index: usize, n: usize },

    /// Initial basis label that is not an `n`-character binary string.
    #[error("invalid basis label {label:?} for a {n}-qubit register")]
    InvalidBasisLabel { label: String, n: usize },

    /// Amplitude list whose length is not `2^n`.
    #[error("expected {expected} amplitudes; got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Two operands of a multi-qubit gate refer to the same qubit.
    #[error("{gate}: operands must be pairwise distinct")]
    DuplicateOperand { gate: &'static str },

    /// The gate acts on more qubits than the register holds.
    #[error("{gate} needs at least {required} qubits; register has {n}")]
    InsufficientQubits { gate: &'static str, required: usize, n: usize },

    /// Collapsed state has (numerically) zero norm.
    #[error("measurement of qubit {qubit} left a state with norm² {norm_sqr:e}")]
    DegenerateMeasurement { qubit: usize, norm_sqr: f64 },

    /// Partial trace over the other qubits summed to (numerically) zero.
    #[error("reduced density matrix of qubit {qubit} has trace {trace:e}")]
    DegenerateTrace { qubit: usize, trace: f64 },

    /// A 2×2 operator failed the `U U† = I` check.
    #[error("{gate} is not unitary (max deviation {deviation:e})")]
    NonUnitaryGate { gate: &'static str, deviation: f64 },

    /// Wrong number of operands when decoding a gate.
    #[error("{gate} takes {expected} operand(s); got {got}")]
    WrongOperandCount { gate: &'static str, expected: usize, got: usize },

    /// Rotation or phase angle that is infinite or NaN.
    #[error("{gate}: angle must be finite; got {angle}")]
    NonFiniteAngle { gate: &'static str, angle: f64 },

    /// Rotation or phase gate decoded without an angle.
    #[error("{gate} requires an angle")]
    MissingAngle { gate: &'static str },

    /// Unrecognized gate name when decoding.
    #[error("unknown gate type {0:?}")]
    UnknownGate(String),

    /// Editing the gate sequence at a position that does not exist.
    #[error("no gate at position {index} (sequence has {len})")]
    StepOutOfRange { index: usize, len: usize },
}
