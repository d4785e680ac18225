//! rprompt - generate descriptive prompts from images.
//!
//! This is the main entry point for the rprompt CLI tool.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use rprompt::cli::{describe, Cli};
use rprompt::feedback::safety_net;

/// Environment variable controlling the log filter.
const LOG_ENV: &str = "RPROMPT_LOG";

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(LOG_ENV, default_filter))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(image) = cli.image.clone() else {
        // No image provided - show help
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    describe(cli.describe_options(image))?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Restores the cursor on Ctrl+C, panic, or any return from here
    let _restore = safety_net::install_hooks();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
