//! Shared helpers for CLI commands.

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use qusim_client::{ClientConfig, EndNotice};

/// Overrides for the configured service, from command-line flags.
#[derive(Debug, Default, Clone)]
pub struct ServerOverrides {
    pub ip: Option<String>,
    pub port: Option<u16>,
    pub token: Option<String>,
}

/// Apply command-line overrides on top of the loaded configuration.
pub fn apply_overrides(
    mut config: ClientConfig,
    overrides: &ServerOverrides,
) -> Result<ClientConfig> {
    if let Some(ip) = &overrides.ip {
        config.server.ip = ip.clone();
    }
    if let Some(port) = overrides.port {
        config.server.port = port;
    }
    if let Some(token) = &overrides.token {
        config.server.token = token.clone();
    }
    config.validate()?;
    Ok(config)
}

/// A spinner for a blocking request.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

/// Print a session termination notice.
pub fn print_notice(notice: &EndNotice) {
    if notice.is_acknowledged() {
        println!("{} {}", style("✓").green().bold(), notice);
    } else {
        println!("{} {}", style("!").yellow().bold(), notice);
    }
}
