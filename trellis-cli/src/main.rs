//! CLI entry point for trellis attribute-tree synthesis.
//!
//! Parses command-line arguments with clap, builds the attribute tree from a
//! directory of statistics records, renders it to stdout or a file, and maps
//! errors to appropriate exit codes. Logging is initialized eagerly so
//! subsequent operations can emit structured diagnostics via `tracing`.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, field};

use trellis_cli::{
    cli::{Cli, CliError, Command, run_cli},
    logging::{self, LoggingError},
};

/// Parse CLI arguments, build the tree, and write the rendered output.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let output = output_path(&cli);
    let tree = run_cli(cli).context("failed to execute command")?;

    let mut rendered = Vec::new();
    tree.render(&mut rendered).context("failed to render tree")?;

    match output {
        Some(path) => fs::write(&path, &rendered)
            .with_context(|| format!("failed to write `{}`", path.display()))?,
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            writer
                .write_all(&rendered)
                .context("failed to write output")?;
            writer.flush().context("failed to flush output")?;
        }
    }
    Ok(())
}

fn output_path(cli: &Cli) -> Option<PathBuf> {
    match &cli.command {
        Command::Tree(command) => command.output.clone(),
    }
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let code = err
            .downcast_ref::<CliError>()
            .and_then(|cli_error| match cli_error {
                CliError::Core(core) => Some(core.code()),
                _ => None,
            });
        let code_field = code.map(|code| field::display(code.as_str()));

        error!(error = %err, code = code_field, "command execution failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
