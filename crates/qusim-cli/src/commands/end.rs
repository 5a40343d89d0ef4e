//! End command implementation.

use anyhow::Result;

use qusim_client::{CircuitClient, ClientConfig};

use super::common::print_notice;

/// Send a standalone session termination notice.
pub fn execute(config: &ClientConfig) -> Result<()> {
    let client = CircuitClient::new(config.auth())?;
    print_notice(&client.end_session());
    Ok(())
}
