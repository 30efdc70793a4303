//! OpenQASM 2.0 export.

use crate::{ circuit::Circuit, gate::Gate };

/// Lower-case `qelib1.inc` name of a gate.
pub fn qasm_name(gate: &Gate) -> &'static str {
    match gate {
        Gate::X(..) => "x",
        Gate::Y(..) => "y",
        Gate::Z(..) => "z",
        Gate::H(..) => "h",
        Gate::S(..) => "s",
        Gate::SInv(..) => "sdg",
        Gate::T(..) => "t",
        Gate::TInv(..) => "tdg",
        Gate::Rx(..) => "rx",
        Gate::Ry(..) => "ry",
        Gate::Rz(..) => "rz",
        Gate::Phase(..) => "p",
        Gate::CX(..) => "cx",
        Gate::CZ(..) => "cz",
        Gate::Swap(..) => "swap",
        Gate::CCX(..) => "ccx",
        Gate::Measure(..) => "measure",
    }
}

/// Render a single gate as one QASM statement.
pub fn gate_line(gate: &Gate) -> String {
    if let Gate::Measure(k) = gate {
        return format!("measure q[{}] -> c[{}];", k, k);
    }
    let operands: Vec<String>
        = gate.qubits().into_iter().map(|q| format!("q[{}]", q)).collect();
    match gate.angle() {
        Some(theta) => format!("{}({}) {};", qasm_name(gate), theta, operands.join(",")),
        None => format!("{} {};", qasm_name(gate), operands.join(",")),
    }
}

/// Render a circuit as an OpenQASM 2.0 program.
///
/// A non-zero initial basis state is prepared with `x` gates. If `measure_all`
/// is set, every qubit is measured into the classical register at the end.
pub fn to_qasm(circuit: &Circuit, measure_all: bool) -> String {
    let n = circuit.n();
    let mut lines: Vec<String> = vec![
        "OPENQASM 2.0;".to_string(),
        "include \"qelib1.inc\";".to_string(),
        format!("qreg q[{}];", n),
        format!("creg c[{}];", n),
    ];
    circuit.basis_label().chars().enumerate()
        .filter(|(_, b)| *b == '1')
        .for_each(|(k, _)| { lines.push(format!("x q[{}];", k)); });
    lines.extend(circuit.gates().iter().map(gate_line));
    if measure_all {
        lines.extend((0..n).map(|k| gate_line(&Gate::Measure(k))));
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
