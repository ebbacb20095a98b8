//! fieldgroups CLI entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fieldgroups_cli::commands::{run_classify, run_summary, run_types};
use fieldgroups_cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing with appropriate level
    let filter = if cli.debug {
        EnvFilter::new("fieldgroups=debug,fieldgroups_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = result_to_exit(dispatch_command(cli.command));
    std::process::exit(exit_code);
}

/// Dispatch a parsed subcommand to its handler.
fn dispatch_command(cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Classify {
            input,
            format,
            compact,
        } => run_classify(&input, format, compact),
        Commands::Summary { input, json } => run_summary(&input, json),
        Commands::Types { json } => run_types(json),
    }
}

/// Convert a result to an exit code, printing the error chain on failure.
fn result_to_exit(result: anyhow::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            tracing::debug!("{:?}", e);
            eprintln!("Error: {:#}", e);
            1
        }
    }
}
