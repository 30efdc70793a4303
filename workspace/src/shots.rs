use std::path::PathBuf;
use anyhow::Context;
use clap::Parser;
use itertools::Itertools;
use qstate_sim::{ circuit::tally, config::CircuitConfig, remote::CircuitResponse };
use rand::{ rngs::StdRng, SeedableRng };
use rayon::iter::{ IntoParallelIterator, ParallelIterator };
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Sample a circuit repeatedly, measuring every qubit at the end of each shot,
/// and print the outcome counts.
#[derive(Parser, Debug)]
#[command(name = "shots", version, about, long_about = None)]
struct Args {
    /// Circuit description (.toml or .json).
    #[arg(value_name = "FILE")]
    circuit: PathBuf,

    /// Number of shots; overrides the file.
    #[arg(long)]
    shots: Option<usize>,

    /// Base seed; shot `k` is sampled with `seed + k`. Overrides the file.
    #[arg(long)]
    seed: Option<u64>,

    /// Print counts as a remote-service response body, keyed with qubit 0
    /// rightmost the way the service reports them.
    #[arg(long, default_value_t = false)]
    json: bool,
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
    let circuit = config.to_circuit().context("building circuit")?;
    let shots = args.shots.unwrap_or(config.shots);
    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    info!(shots, seed, "sampling");

    let outcomes: Vec<String>
        = (0..shots).into_par_iter()
        .map(|shot| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(shot as u64));
            circuit.sample(&mut rng)
        })
        .collect::<Result<_, _>>()
        .context("sampling circuit")?;
    let counts = tally(outcomes);

    if args.json {
        let response
            = CircuitResponse::from_local_counts(
                counts.iter(), qstate_sim::qasm::to_qasm(&circuit, true));
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }
    for (bits, count) in counts.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
        println!("{}  {:>8}  {:.4}", bits, count, *count as f64 / shots as f64);
    }
    Ok(())
}
