//! qusim Command-Line Interface
//!
//! Runs circuit jobs against the qusim execution service.
//!
//! ```text
//! qusim run --input bell.yaml          # execute, print the result
//! qusim serialize --input bell.yaml    # print the request body only
//! qusim end                            # send a termination notice
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use qusim_client::{ClientConfig, LoggingConfig};

mod commands;
mod job;

use commands::common::{ServerOverrides, apply_overrides};
use commands::{end, run, serialize, version};

/// qusim - run symbolic quantum circuits on a remote execution service
#[derive(Parser)]
#[command(name = "qusim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to <config dir>/qusim/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Service address flags, overriding the configuration.
#[derive(Args, Debug, Default)]
struct ServerArgs {
    /// Service host
    #[arg(long)]
    ip: Option<String>,

    /// Service port (80 selects https)
    #[arg(long)]
    port: Option<u16>,

    /// Access token
    #[arg(long, env = "QUSIM_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

impl From<ServerArgs> for ServerOverrides {
    fn from(args: ServerArgs) -> Self {
        ServerOverrides {
            ip: args.ip,
            port: args.port,
            token: args.token,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a job file on the service
    Run {
        /// Job file (YAML or JSON)
        #[arg(short, long)]
        input: String,

        #[command(flatten)]
        server: ServerArgs,
    },

    /// Print the request body for a job file
    Serialize {
        /// Job file (YAML or JSON)
        #[arg(short, long)]
        input: String,
    },

    /// Send a session termination notice
    End {
        #[command(flatten)]
        server: ServerArgs,
    },

    /// Show version information
    Version,
}

fn init_logging(verbose: u8, logging: &LoggingConfig) {
    let filter = match verbose {
        0 => logging.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false);

    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Load the configuration, apply flag overrides and start logging.
fn setup(verbose: u8, config: Option<&Path>, server: ServerArgs) -> Result<ClientConfig> {
    let config = ClientConfig::load(config)?;
    let config = apply_overrides(config, &server.into())?;
    init_logging(verbose, &config.logging);
    Ok(config)
}

fn dispatch(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Run { input, server } => {
            let config = setup(cli.verbose, config_path, server)?;
            run::execute(&input, &config)
        }

        Commands::Serialize { input } => {
            init_logging(cli.verbose, &LoggingConfig::default());
            serialize::execute(&input)
        }

        Commands::End { server } => {
            let config = setup(cli.verbose, config_path, server)?;
            end::execute(&config)
        }

        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = dispatch(cli) {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
