//! AKS deployment CLI binary entrypoint.
//!
//! This is the main entry point for the `aksdeploy` command-line tool.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use aks_cli::cli::{Cli, Commands};
use aks_cli::commands::{CheckCommand, DeployCommand};
use aks_cli::output::OutputFormat;

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), aks_cli::CliError> {
    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Check(args) => {
            let cmd = CheckCommand::new(args.config);
            cmd.execute(&mut stdout, &format).await?;
        }
        Commands::Deploy(args) => {
            let cmd = DeployCommand::new(args.config);
            cmd.execute(&mut stdout, &format).await?;
        }
    }

    Ok(())
}
