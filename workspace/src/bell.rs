use std::f64::consts::FRAC_1_SQRT_2;
use num_complex::Complex64 as C64;
use qstate_sim::{
    density::DensityMatrix,
    gate::Gate,
    measure::FixedSamples,
    state::StateVector,
};

fn show(t: usize, gate: Option<Gate>, psi: &StateVector) -> anyhow::Result<()> {
    match gate {
        Some(g) => println!("t={} after {}", t, g),
        None => println!("t={}", t),
    }
    println!("{}", psi);
    for red in DensityMatrix::from_state(psi).reduce_all()? {
        println!("  q{}: {}", red.qubit, red.bloch());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // no measurements below; the source is never drawn from
    let mut rng = FixedSamples::default();

    let mut psi = StateVector::zero(2)?;
    show(0, None, &psi)?;
    for (t, gate) in [Gate::H(0), Gate::CX(0, 1)].into_iter().enumerate() {
        psi = psi.apply_gate(gate, &mut rng)?.0;
        show(t + 1, Some(gate), &psi)?;
    }

    let phi_plus
        = StateVector::from_amplitudes(
            2,
            [FRAC_1_SQRT_2, 0.0, 0.0, FRAC_1_SQRT_2].into_iter().map(C64::from),
        )?;
    let overlap: C64
        = psi.amps().iter().zip(phi_plus.amps().iter())
        .map(|(a, b)| a.conj() * b)
        .sum();
    println!("\n⟨Φ+∣ψ⟩ = {:.6}", overlap);

    // the same state by a different route: ∣+⟩∣+⟩ then CZ and H on qubit 1
    let mut chi = StateVector::zero(2)?;
    for gate in [Gate::H(0), Gate::H(1), Gate::CZ(0, 1), Gate::H(1)] {
        chi = chi.apply_gate(gate, &mut rng)?.0;
    }
    println!("\nvia CZ:\n{}", chi);
    Ok(())
}
