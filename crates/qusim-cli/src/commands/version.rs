//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - remote circuit execution client",
        style("qusim").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qusim-ir      Symbolic circuit representation");
    println!("  qusim-client  Execution service client");
    println!("  qusim-cli     Command-line interface");
    println!();
    println!("License: {}", style("Apache-2.0").dim());
}
