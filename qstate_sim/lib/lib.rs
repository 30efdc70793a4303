#![allow(non_snake_case)]

//! Exact state-vector simulation of small (1–5 qubit) registers.
//!
//! A register of *n* qubits is held as the full vector of 2<sup>*n*</sup>
//! complex amplitudes, indexed so that qubit 0 is the most significant bit of
//! the basis index (i.e. the leftmost character of a ket label). Gates are
//! applied one at a time, each producing a new state vector; projective
//! single-qubit measurements draw from an injected [`measure::RandomSource`].
//!
//! From the final state, the full density matrix, per-qubit reduced density
//! matrices (via partial trace) and their Bloch vectors, purities and von
//! Neumann entropies are derived.
//!
//! # Example
//! ```
//! use qstate_sim::{ circuit::Circuit, gate::Gate };
//!
//! let mut circuit = Circuit::new(2).unwrap();
//! circuit.push(Gate::H(0)).unwrap();
//! circuit.push(Gate::CX(0, 1)).unwrap();
//!
//! let result = circuit.run_seeded(Some(10546)).unwrap();
//! println!("{}", result.state);
//! // ∣00⟩: 0.707+0.000j
//! // ∣11⟩: 0.707+0.000j
//! for bloch in result.bloch.iter() {
//!     assert!((bloch.entropy - 1.0).abs() < 1e-9);
//! }
//! ```

pub mod error;
pub mod unitary;
pub mod gate;
pub mod state;
pub mod measure;
pub mod density;
pub mod bloch;
pub mod circuit;
pub mod remote;
pub mod qasm;
pub mod config;

pub use error::{ SimError, SimResult };

/// Largest register size supported.
pub const MAX_QUBITS: usize = 5;
