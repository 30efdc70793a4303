//! Density matrices of a register and their single-qubit reductions.
//!
//! For `n ≤ 5` the full `2^n × 2^n` matrix `ρ = ∣ψ⟩⟨ψ∣` is small enough to be
//! built outright. Reduction to qubit `k` sums `ρ[i][j]` over all pairs of
//! basis indices that agree on every other qubit, then divides by the trace of
//! the resulting 2×2 block so that it is exactly 1 against floating-point
//! drift.

use std::fmt;
use itertools::Itertools;
use nalgebra as na;
use num_complex::Complex64 as C64;
use tracing::trace;
use crate::{
    bloch::BlochSummary,
    error::{ SimError, SimResult },
    gate::check_qubit,
    measure::DEGENERATE_EPS,
    state::{ bit, fmt_complex, mask, StateVector },
    unitary::Mat2,
};

/// Matrix entries with magnitude below this are printed as `0`.
pub const DISPLAY_EPS: f64 = 1e-6;

/// The pure-state density matrix of an `n`-qubit register.
#[derive(Clone, Debug, PartialEq)]
pub struct DensityMatrix {
    n: usize,
    rho: na::DMatrix<C64>,
}

impl DensityMatrix {
    /// Compute `ρ[i][j] = ψ[i] ψ[j]*`.
    pub fn from_state(state: &StateVector) -> Self {
        let psi = state.amps();
        let dim = psi.len();
        let rho = na::DMatrix::from_fn(dim, dim, |i, j| psi[i] * psi[j].conj());
        Self { n: state.n(), rho }
    }

    /// Number of qubits.
    pub fn n(&self) -> usize { self.n }

    /// Side length, `2^n`.
    pub fn dim(&self) -> usize { self.rho.nrows() }

    /// Borrow the underlying matrix.
    pub fn matrix(&self) -> &na::DMatrix<C64> { &self.rho }

    /// `Σ_i ρ[i][i]`.
    pub fn trace(&self) -> C64 { self.rho.trace() }

    /// `Tr(ρ²)`.
    pub fn purity(&self) -> f64 { (&self.rho * &self.rho).trace().re }

    /// Return `true` if `ρ = ρ†` to within `eps` in every entry.
    pub fn is_hermitian(&self, eps: f64) -> bool {
        (&self.rho - self.rho.adjoint()).iter().all(|a| a.norm() < eps)
    }

    /// Reduced density matrix of qubit `k`, tracing out all others.
    pub fn reduce(&self, k: usize) -> SimResult<Reduced> {
        check_qubit(k, self.n)?;
        let n = self.n;
        let others = !mask(n, k);
        let mut red = Mat2::zeros();
        (0..self.dim()).cartesian_product(0..self.dim())
            .filter(|(i, j)| (i ^ j) & others == 0)
            .for_each(|(i, j)| {
                red[(bit(i, n, k), bit(j, n, k))] += self.rho[(i, j)];
            });
        let tr = red[(0, 0)] + red[(1, 1)];
        if !(tr.norm() >= DEGENERATE_EPS) {
            return Err(SimError::DegenerateTrace { qubit: k, trace: tr.norm() });
        }
        trace!(qubit = k, trace = tr.re, "normalizing reduced density matrix");
        Ok(Reduced { qubit: k, rho: red / tr })
    }

    /// Reduced density matrices of every qubit, in order.
    pub fn reduce_all(&self) -> SimResult<Vec<Reduced>> {
        (0..self.n).map(|k| self.reduce(k)).collect()
    }
}

impl fmt::Display for DensityMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_matrix(f, self.rho.row_iter().map(|row| row.iter().copied().collect::<Vec<_>>()))
    }
}

/// The 2×2 density matrix of a single qubit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Reduced {
    /// Qubit this matrix describes.
    pub qubit: usize,
    /// The matrix itself, Hermitian with unit trace.
    pub rho: Mat2,
}

impl Reduced {
    /// `ρ[0][0] + ρ[1][1]`.
    pub fn trace(&self) -> C64 { self.rho.trace() }

    /// Bloch vector, purity and entropy of this qubit.
    pub fn bloch(&self) -> BlochSummary { BlochSummary::from_reduced(&self.rho) }
}

impl fmt::Display for Reduced {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_matrix(f, self.rho.row_iter().map(|row| row.iter().copied().collect::<Vec<_>>()))
    }
}

fn fmt_matrix<I>(f: &mut fmt::Formatter<'_>, rows: I) -> fmt::Result
where I: Iterator<Item = Vec<C64>>
{
    let cells: Vec<Vec<String>>
        = rows
        .map(|row| {
            row.into_iter()
                .map(|a| {
                    if a.norm() < DISPLAY_EPS {
                        "0".to_string()
                    } else {
                        fmt_complex(a, 'i')
                    }
                })
                .collect()
        })
        .collect();
    let width
        = cells.iter().flatten().map(|s| s.chars().count()).max().unwrap_or(1);
    let nrows = cells.len();
    for (r, row) in cells.iter().enumerate() {
        write!(f, "[ ")?;
        for cell in row.iter() { write!(f, "{:>w$} ", cell, w = width)?; }
        write!(f, "]")?;
        if r < nrows - 1 { writeln!(f)?; }
    }
    Ok(())
}
