// ghelper entry point.
// Parses the invocation, runs one command, and writes launcher feedback to stdout.

use std::io;
use std::process::ExitCode;

use clap::Parser;

use ghelper::cache::resolve_cache_dir;
use ghelper::cli::Cli;
use ghelper::context::Context;
use ghelper::feedback::{Feedback, render_error};
use ghelper::{Result, commands, logging};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_dir = resolve_cache_dir(cli.cache_dir.clone());
    if let Err(err) = logging::init_logging(log_dir.as_deref(), cli.verbose) {
        eprintln!("ghelper: logging disabled: {}", err);
    }

    let outcome = match run(&cli).await {
        Ok(feedback) => feedback.write_to(io::stdout().lock()),
        Err(err) => Err(err),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "invocation failed");
            println!("{}", render_error(&err));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<Feedback> {
    let mut ctx = Context::from_cli(cli)?;
    commands::dispatch(&mut ctx, cli.command.as_ref()).await
}
