//! Wire format of the remote circuit-execution service.
//!
//! The service accepts `{ "numQubits": n, "gates": [...] }` and answers with
//! `{ "counts": { bitstring: count }, "qasm": "..." }`. Only the shapes are
//! modeled here; no transport is provided.

use std::collections::BTreeMap;
use serde::{ Deserialize, Serialize };
use crate::{
    MAX_QUBITS,
    circuit::Circuit,
    error::{ SimError, SimResult },
    gate::Gate,
};

/// A serialized gate: type name, operand list, and optional angle in radians.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireGate {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub params: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
}

impl WireGate {
    /// Decode into a [`Gate`] valid for an `n`-qubit register.
    pub fn decode(&self, n: usize) -> SimResult<Gate> {
        Gate::from_parts(&self.kind, &self.params, self.angle, n)
    }
}

impl From<&Gate> for WireGate {
    fn from(gate: &Gate) -> Self {
        Self {
            kind: gate.name().to_string(),
            params: gate.qubits().into_iter().map(|q| q as i64).collect(),
            angle: gate.angle(),
        }
    }
}

impl From<Gate> for WireGate {
    fn from(gate: Gate) -> Self { Self::from(&gate) }
}

/// Decodes against the largest supported register; use [`WireGate::decode`]
/// to check operands against a specific size.
impl TryFrom<WireGate> for Gate {
    type Error = SimError;

    fn try_from(wire: WireGate) -> SimResult<Self> { wire.decode(MAX_QUBITS) }
}

/// Request body for the remote service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CircuitRequest {
    #[serde(rename = "numQubits")]
    pub num_qubits: usize,
    pub gates: Vec<WireGate>,
}

impl CircuitRequest {
    /// Rebuild a [`Circuit`] from a request, validating every gate. The
    /// initial state is ∣0...0⟩.
    pub fn to_circuit(&self) -> SimResult<Circuit> {
        let mut circuit = Circuit::new(self.num_qubits)?;
        for wire in self.gates.iter() {
            circuit.push(wire.decode(self.num_qubits)?)?;
        }
        Ok(circuit)
    }
}

/// Response body from the remote service.
///
/// Count keys follow the service's convention: qubit 0 is the rightmost
/// character.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitResponse {
    pub counts: BTreeMap<String, u64>,
    #[serde(default)]
    pub qasm: String,
}

impl CircuitResponse {
    /// Build a response from local counts keyed with qubit 0 leftmost, as
    /// returned by [`Circuit::sample`].
    pub fn from_local_counts<'a, I>(counts: I, qasm: String) -> Self
    where I: IntoIterator<Item = (&'a String, &'a usize)>
    {
        let counts
            = counts.into_iter()
            .map(|(bits, count)| (bits.chars().rev().collect::<String>(), *count as u64))
            .collect();
        Self { counts, qasm }
    }

    /// Counts re-keyed with qubit 0 leftmost.
    pub fn local_counts(&self) -> BTreeMap<String, u64> {
        self.counts.iter()
            .map(|(bits, count)| (bits.chars().rev().collect::<String>(), *count))
            .collect()
    }

    /// Total number of shots.
    pub fn shots(&self) -> u64 { self.counts.values().sum() }
}

impl Circuit {
    /// Serialize the gate sequence into a request for the remote service.
    pub fn to_request(&self) -> CircuitRequest {
        CircuitRequest {
            num_qubits: self.n(),
            gates: self.gates().iter().map(WireGate::from).collect(),
        }
    }
}
