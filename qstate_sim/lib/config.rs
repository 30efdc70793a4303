//! Circuit description files.
//!
//! A circuit can be written as TOML or JSON; the format is chosen by file
//! extension. In TOML:
//!
//! ```toml
//! num_qubits = 2
//! basis = "00"
//! seed = 10546
//! shots = 1024
//!
//! [[gates]]
//! type = "H"
//! params = [0]
//!
//! [[gates]]
//! type = "CNOT"
//! params = [0, 1]
//! ```
//!
//! `basis` defaults to all zeros, `seed` to none, and `shots` to 1024. Gates
//! use the same `{ type, params, angle }` shape as the remote service.

use std::path::{ Path, PathBuf };
use serde::{ Deserialize, Serialize };
use thiserror::Error;
use tracing::debug;
use crate::{
    circuit::Circuit,
    error::SimError,
    remote::WireGate,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    FileRead { path: PathBuf, source: std::io::Error },

    #[error("unsupported circuit file extension for {0} (expected .toml or .json)")]
    UnknownFormat(PathBuf),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid circuit: {0}")]
    Circuit(#[from] SimError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

fn default_shots() -> usize { 1024 }

/// Contents of a circuit description file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CircuitConfig {
    pub num_qubits: usize,
    /// Initial basis state as a ket label, qubit 0 first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default = "default_shots")]
    pub shots: usize,
    #[serde(default)]
    pub gates: Vec<WireGate>,
}

impl CircuitConfig {
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> { Ok(toml::from_str(s)?) }

    pub fn from_json_str(s: &str) -> ConfigResult<Self> { Ok(serde_json::from_str(s)?) }

    /// Read a `.toml` or `.json` file.
    pub fn load<P>(path: P) -> ConfigResult<Self>
    where P: AsRef<Path>
    {
        let path = path.as_ref();
        let ext
            = path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let read = || {
            std::fs::read_to_string(path)
                .map_err(|source| ConfigError::FileRead { path: path.to_path_buf(), source })
        };
        let config
            = match ext.as_deref() {
                Some("toml") => Self::from_toml_str(&read()?)?,
                Some("json") => Self::from_json_str(&read()?)?,
                _ => { return Err(ConfigError::UnknownFormat(path.to_path_buf())); },
            };
        debug!(path = %path.display(), gates = config.gates.len(), "loaded circuit file");
        Ok(config)
    }

    /// Build and validate the described circuit.
    pub fn to_circuit(&self) -> ConfigResult<Circuit> {
        let mut circuit = Circuit::new(self.num_qubits)?;
        if let Some(label) = self.basis.as_deref() {
            circuit.set_basis_label(label)?;
        }
        for wire in self.gates.iter() {
            circuit.push(wire.decode(self.num_qubits)?)?;
        }
        Ok(circuit)
    }
}

impl From<&Circuit> for CircuitConfig {
    fn from(circuit: &Circuit) -> Self {
        let req = circuit.to_request();
        Self {
            num_qubits: req.num_qubits,
            basis: Some(circuit.basis_label()),
            seed: None,
            shots: default_shots(),
            gates: req.gates,
        }
    }
}
