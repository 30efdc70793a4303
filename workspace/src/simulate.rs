use std::path::PathBuf;
use anyhow::Context;
use clap::Parser;
use qstate_sim::{ config::CircuitConfig, qasm::to_qasm };
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Run a circuit description file and print the final state and everything
/// derived from it.
#[derive(Parser, Debug)]
#[command(name = "simulate", version, about, long_about = None)]
struct Args {
    /// Circuit description (.toml or .json).
    #[arg(value_name = "FILE")]
    circuit: PathBuf,

    /// Seed for measurement sampling; overrides the file.
    #[arg(long)]
    seed: Option<u64>,

    /// Initial basis state as a ket label, e.g. 010; overrides the file.
    #[arg(long)]
    basis: Option<String>,

    /// Print the remote-service request body instead of running.
    #[arg(long, default_value_t = false)]
    request: bool,

    /// Print the circuit as OpenQASM 2.0 instead of running.
    #[arg(long, default_value_t = false)]
    qasm: bool,

    /// With --qasm, measure every qubit at the end.
    #[arg(long, default_value_t = false)]
    measure_all: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn"))
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    let config
        = CircuitConfig::load(&args.circuit)
        .with_context(|| format!("loading {}", args.circuit.display()))?;
    let mut circuit = config.to_circuit().context("building circuit")?;
    if let Some(label) = args.basis.as_deref() {
        circuit.set_basis_label(label).context("--basis")?;
    }

    if args.request {
        println!("{}", serde_json::to_string_pretty(&circuit.to_request())?);
        return Ok(());
    }
    if args.qasm {
        print!("{}", to_qasm(&circuit, args.measure_all));
        return Ok(());
    }

    let seed = args.seed.or(config.seed);
    info!(?seed, "simulating");
    let result = circuit.run_seeded(seed).context("running circuit")?;

    println!("{}\n", circuit);
    println!("final state:\n{}\n", result.state);
    println!("density matrix:\n{}\n", result.density);
    for (red, bloch) in result.reduced.iter().zip(result.bloch.iter()) {
        println!("qubit {}:\n{}\n{}\n", red.qubit, red, bloch);
    }
    for meas in result.measurements.iter() {
        println!("[step {}] {}", meas.step, meas);
    }
    Ok(())
}
