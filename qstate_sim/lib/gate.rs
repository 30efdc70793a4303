//! Gate descriptors for a register of `n` qubits.
//!
//! Each variant carries exactly the operands its kind needs. Qubit indices are
//! validated against a register size with [`Gate::validate`]; descriptors are
//! otherwise plain immutable values.

use std::fmt;
use rand::Rng;
use crate::{
    error::{ SimError, SimResult },
    unitary::{ self, Mat2 },
};

/// Description of a single gate (or measurement) in a sequence.
///
/// Angles are in radians.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Gate {
    /// π rotation about X
    X(usize),
    /// π rotation about Y
    Y(usize),
    /// π rotation about Z
    Z(usize),
    /// Hadamard
    H(usize),
    /// π/2 rotation about Z
    S(usize),
    /// -π/2 rotation about Z
    SInv(usize),
    /// π/4 rotation about Z
    T(usize),
    /// -π/4 rotation about Z
    TInv(usize),
    /// Arbitrary rotation about X
    Rx(usize, f64),
    /// Arbitrary rotation about Y
    Ry(usize, f64),
    /// Arbitrary rotation about Z
    Rz(usize, f64),
    /// Relative phase on ∣1⟩
    Phase(usize, f64),
    /// Z-controlled π rotation about X.
    ///
    /// The first qubit index is the control.
    CX(usize, usize),
    /// Z-controlled π rotation about Z.
    ///
    /// The first qubit index is the control.
    CZ(usize, usize),
    /// Swap
    Swap(usize, usize),
    /// Doubly Z-controlled π rotation about X (Toffoli).
    ///
    /// The first two qubit indices are the controls.
    CCX(usize, usize, usize),
    /// Projective measurement in the Z-basis.
    Measure(usize),
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name())?;
        let qubits = self.qubits();
        for (k, q) in qubits.iter().enumerate() {
            write!(f, "{}", q)?;
            if k < qubits.len() - 1 { write!(f, ",")?; }
        }
        write!(f, ")")?;
        if let Some(angle) = self.angle() {
            write!(f, ", {:.2}°", angle.to_degrees())?;
        }
        Ok(())
    }
}

impl Gate {
    /// Type name used in serialized circuits.
    pub fn name(&self) -> &'static str {
        match self {
            Self::X(..) => "X",
            Self::Y(..) => "Y",
            Self::Z(..) => "Z",
            Self::H(..) => "H",
            Self::S(..) => "S",
            Self::SInv(..) => "Sdg",
            Self::T(..) => "T",
            Self::TInv(..) => "Tdg",
            Self::Rx(..) => "Rx",
            Self::Ry(..) => "Ry",
            Self::Rz(..) => "Rz",
            Self::Phase(..) => "Phase",
            Self::CX(..) => "CNOT",
            Self::CZ(..) => "CZ",
            Self::Swap(..) => "SWAP",
            Self::CCX(..) => "CCNOT",
            Self::Measure(..) => "MEASURE",
        }
    }

    /// Qubit operands, in order.
    pub fn qubits(&self) -> Vec<usize> {
        match *self {
            Self::X(k)
            | Self::Y(k)
            | Self::Z(k)
            | Self::H(k)
            | Self::S(k)
            | Self::SInv(k)
            | Self::T(k)
            | Self::TInv(k)
            | Self::Rx(k, _)
            | Self::Ry(k, _)
            | Self::Rz(k, _)
            | Self::Phase(k, _)
            | Self::Measure(k)
            => vec![k],
            Self::CX(a, b)
            | Self::CZ(a, b)
            | Self::Swap(a, b)
            => vec![a, b],
            Self::CCX(a, b, c) => vec![a, b, c],
        }
    }

    /// Rotation or phase angle, if the gate has one.
    pub fn angle(&self) -> Option<f64> {
        match *self {
            Self::Rx(_, th)
            | Self::Ry(_, th)
            | Self::Rz(_, th)
            | Self::Phase(_, th)
            => Some(th),
            _ => None,
        }
    }

    /// Return `true` if `self` is `Measure`.
    pub fn is_measure(&self) -> bool { matches!(self, Self::Measure(..)) }

    /// Return `true` if `self` is `CX`.
    pub fn is_cx(&self) -> bool { matches!(self, Self::CX(..)) }

    /// Return `true` if `self` is `Swap`.
    pub fn is_swap(&self) -> bool { matches!(self, Self::Swap(..)) }

    /// Return `true` if `self` is `CCX`.
    pub fn is_ccx(&self) -> bool { matches!(self, Self::CCX(..)) }

    /// Return `true` if `self` is a unitary acting on a single qubit.
    pub fn is_single(&self) -> bool { self.matrix().is_some() }

    /// The 2×2 matrix of a single-qubit unitary; `None` for multi-qubit gates
    /// and measurements.
    pub fn matrix(&self) -> Option<Mat2> {
        match *self {
            Self::X(_) => Some(unitary::x()),
            Self::Y(_) => Some(unitary::y()),
            Self::Z(_) => Some(unitary::z()),
            Self::H(_) => Some(unitary::h()),
            Self::S(_) => Some(unitary::s()),
            Self::SInv(_) => Some(unitary::s_inv()),
            Self::T(_) => Some(unitary::t()),
            Self::TInv(_) => Some(unitary::t_inv()),
            Self::Rx(_, th) => Some(unitary::rx(th)),
            Self::Ry(_, th) => Some(unitary::ry(th)),
            Self::Rz(_, th) => Some(unitary::rz(th)),
            Self::Phase(_, ph) => Some(unitary::phase(ph)),
            _ => None,
        }
    }

    /// Check that every operand lies in `0..n`, that the operands of
    /// multi-qubit gates are pairwise distinct, and that any angle is finite.
    pub fn validate(&self, n: usize) -> SimResult<()> {
        if self.is_ccx() && n < 3 {
            return Err(SimError::InsufficientQubits {
                gate: self.name(), required: 3, n });
        }
        if let Some(angle) = self.angle().filter(|th| !th.is_finite()) {
            return Err(SimError::NonFiniteAngle { gate: self.name(), angle });
        }
        let qubits = self.qubits();
        for &k in qubits.iter() {
            check_qubit(k, n)?;
        }
        let distinct
            = qubits.iter().enumerate()
            .all(|(i, a)| qubits.iter().skip(i + 1).all(|b| a != b));
        if distinct {
            Ok(())
        } else {
            Err(SimError::DuplicateOperand { gate: self.name() })
        }
    }

    /// Decode a gate from its type name, operand list and optional angle, and
    /// validate it against an `n`-qubit register.
    ///
    /// Negative operands are reported as [`SimError::InvalidQubitIndex`].
    pub fn from_parts(name: &str, params: &[i64], angle: Option<f64>, n: usize)
        -> SimResult<Self>
    {
        let template
            = match name {
                "X" => Self::X(0),
                "Y" => Self::Y(0),
                "Z" => Self::Z(0),
                "H" => Self::H(0),
                "S" => Self::S(0),
                "Sdg" => Self::SInv(0),
                "T" => Self::T(0),
                "Tdg" => Self::TInv(0),
                "Rx" => Self::Rx(0, 0.0),
                "Ry" => Self::Ry(0, 0.0),
                "Rz" => Self::Rz(0, 0.0),
                "Phase" => Self::Phase(0, 0.0),
                "CNOT" => Self::CX(0, 0),
                "CZ" => Self::CZ(0, 0),
                "SWAP" => Self::Swap(0, 0),
                "CCNOT" => Self::CCX(0, 0, 0),
                "MEASURE" => Self::Measure(0),
                other => { return Err(SimError::UnknownGate(other.to_string())); },
            };
        let gate = template.name();
        let arity = template.qubits().len();
        if params.len() != arity {
            return Err(SimError::WrongOperandCount {
                gate, expected: arity, got: params.len() });
        }
        let q: Vec<usize>
            = params.iter()
            .map(|&p| {
                usize::try_from(p)
                    .map_err(|_| SimError::InvalidQubitIndex { index: p, n })
            })
            .collect::<SimResult<_>>()?;
        let th
            = if template.angle().is_some() {
                angle.ok_or(SimError::MissingAngle { gate })?
            } else {
                0.0
            };
        let g = template.with_operands(&q, th);
        g.validate(n)?;
        Ok(g)
    }

    // same kind as `self`, with operands and angle replaced; `q` must hold
    // at least as many entries as the kind takes
    fn with_operands(self, q: &[usize], th: f64) -> Self {
        match self {
            Self::X(_) => Self::X(q[0]),
            Self::Y(_) => Self::Y(q[0]),
            Self::Z(_) => Self::Z(q[0]),
            Self::H(_) => Self::H(q[0]),
            Self::S(_) => Self::S(q[0]),
            Self::SInv(_) => Self::SInv(q[0]),
            Self::T(_) => Self::T(q[0]),
            Self::TInv(_) => Self::TInv(q[0]),
            Self::Rx(..) => Self::Rx(q[0], th),
            Self::Ry(..) => Self::Ry(q[0], th),
            Self::Rz(..) => Self::Rz(q[0], th),
            Self::Phase(..) => Self::Phase(q[0], th),
            Self::CX(..) => Self::CX(q[0], q[1]),
            Self::CZ(..) => Self::CZ(q[0], q[1]),
            Self::Swap(..) => Self::Swap(q[0], q[1]),
            Self::CCX(..) => Self::CCX(q[0], q[1], q[2]),
            Self::Measure(_) => Self::Measure(q[0]),
        }
    }

    /// Sample a random single-qubit gate (`H`, `X`, `Y`, `Z`, `S`, `S†`, `T`,
    /// `T†`, or a rotation with uniformly random angle) for a given qubit
    /// index.
    pub fn sample_single<R>(idx: usize, rng: &mut R) -> Self
    where R: Rng + ?Sized
    {
        use std::f64::consts::TAU;
        match rng.gen_range(0..12_usize) {
            0 => Self::H(idx),
            1 => Self::X(idx),
            2 => Self::Y(idx),
            3 => Self::Z(idx),
            4 => Self::S(idx),
            5 => Self::SInv(idx),
            6 => Self::T(idx),
            7 => Self::TInv(idx),
            8 => Self::Rx(idx, TAU * rng.gen::<f64>()),
            9 => Self::Ry(idx, TAU * rng.gen::<f64>()),
            10 => Self::Rz(idx, TAU * rng.gen::<f64>()),
            11 => Self::Phase(idx, TAU * rng.gen::<f64>()),
            _ => unreachable!(),
        }
    }

    /// Sample a random valid unitary gate for an `n`-qubit register.
    ///
    /// Multi-qubit gates are only drawn when the register is large enough.
    pub fn sample<R>(n: usize, rng: &mut R) -> Self
    where R: Rng + ?Sized
    {
        let kinds = if n >= 3 { 5 } else if n == 2 { 4 } else { 1 };
        match rng.gen_range(0..kinds) {
            0 => {
                let k = rng.gen_range(0..n);
                Self::sample_single(k, rng)
            },
            1 => { let q = distinct(n, 2, rng); Self::CX(q[0], q[1]) },
            2 => { let q = distinct(n, 2, rng); Self::CZ(q[0], q[1]) },
            3 => { let q = distinct(n, 2, rng); Self::Swap(q[0], q[1]) },
            _ => { let q = distinct(n, 3, rng); Self::CCX(q[0], q[1], q[2]) },
        }
    }
}

// draw `m` distinct qubit indices from `0..n`
fn distinct<R>(n: usize, m: usize, rng: &mut R) -> Vec<usize>
where R: Rng + ?Sized
{
    let mut picked: Vec<usize> = Vec::with_capacity(m);
    while picked.len() < m {
        let k = rng.gen_range(0..n);
        if !picked.contains(&k) { picked.push(k); }
    }
    picked
}

/// Fail with [`SimError::InvalidQubitIndex`] if `k` is not a qubit of an
/// `n`-qubit register.
pub(crate) fn check_qubit(k: usize, n: usize) -> SimResult<()> {
    if k < n {
        Ok(())
    } else {
        Err(SimError::InvalidQubitIndex { index: k as i64, n })
    }
}
