//! # Fathom CLI - Main Entry Point

use clap::Parser;
use fathom_cli::Cli;
use fathom_estimator::RunContext;
use fathom_shared::Result;
use std::process;
use tracing::error;

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        error!(error = %err, exit_code = err.exit_code(), "Command failed");
        eprintln!("Error: {}", err);
        process::exit(err.exit_code());
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.resolve_config()?;
    Cli::logging_for(&config).init_logging()?;

    let ctx = RunContext::load(config)?;
    let output = cli.execute(&ctx)?;
    println!("{}", output.trim_end());
    Ok(())
}
