//! Serialize command implementation.

use anyhow::Result;

use qusim_ir::WirePacket;

use crate::job::JobFile;

/// Print the request body a job would be sent as.
pub fn execute(input: &str) -> Result<()> {
    let circuit = JobFile::load(input)?.circuit()?;
    let packet = WirePacket::from_circuit(&circuit);
    println!("{}", serde_json::to_string_pretty(&packet)?);
    Ok(())
}
