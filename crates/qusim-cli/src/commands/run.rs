//! Run command implementation.

use anyhow::Result;
use console::style;

use qusim_client::{ClientConfig, RemoteCircuit};
use qusim_ir::NodeSequence;

use super::common::{print_notice, spinner};
use crate::job::JobFile;

/// Execute the run command.
pub fn execute(input: &str, config: &ClientConfig) -> Result<()> {
    println!(
        "{} Running {} on {}",
        style("→").cyan().bold(),
        style(input).green(),
        style(config.auth().endpoint()).yellow()
    );

    let job = JobFile::load(input)?;
    let circuit = job.circuit()?;
    println!(
        "  Loaded: {} qubits, {} nodes",
        circuit.num_qubits(),
        circuit.len()
    );

    let mut remote = RemoteCircuit::from_circuit(circuit, config.auth(), config.interactive)?;

    let progress = spinner("Executing circuit...");
    let (result, notice) = remote.scoped(|c| {
        job.apply_state(c.state_mut())?;
        Ok::<_, anyhow::Error>(c.run()?)
    });
    progress.finish_and_clear();

    print_notice(&notice);
    let result = result?;

    println!("\n{} Result:", style("✓").green().bold());
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
