//! Command-line orchestration for attribute-tree synthesis.
//!
//! The CLI offers a single `tree` command that loads a directory of JSON
//! statistics records (one record per file), feeds them to the tree builder,
//! and renders the resulting hierarchy as text.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::info;

use trellis_core::{AttributeTree, AttributeTreeBuilder, GraphError, PairStatistics};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "trellis",
    about = "Synthesise an attribute tree from pairwise column statistics."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Build the attribute tree from a directory of statistics records.
    Tree(TreeCommand),
}

/// Options accepted by the `tree` command.
#[derive(Debug, Args, Clone)]
pub struct TreeCommand {
    /// Directory holding one JSON statistics record per column pair.
    pub stats_dir: PathBuf,

    /// Write the rendered tree to this file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// File I/O failed while loading statistics records.
    #[error("failed to read `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// A statistics file did not hold a valid record.
    #[error("failed to parse `{path}` as a statistics record: {source}")]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying deserialization failure.
        #[source]
        source: serde_json::Error,
    },
    /// Tree synthesis failed.
    #[error(transparent)]
    Core(#[from] GraphError),
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading, parsing, or synthesis fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use trellis_cli::cli::{Cli, Command, TreeCommand, run_cli};
/// # use tempfile::TempDir;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = TempDir::new()?;
/// std::fs::write(
///     dir.path().join("city_country.json"),
///     r#"{"c1":"city","c2":"country","card_c1":40,"card_c2":7,"card_pair":40,
///         "mode_c1":null,"mode_c2":null,"null_count_c1":0,"null_count_c2":0,
///         "penalty_c1_c2":0,"penalty_c2_c1":0}"#,
/// )?;
/// let cli = Cli {
///     command: Command::Tree(TreeCommand {
///         stats_dir: dir.path().to_path_buf(),
///         output: None,
///     }),
/// };
/// let tree = run_cli(cli)?;
/// assert_eq!(tree.children("city"), &["country".to_owned()]);
/// # Ok(())
/// # }
/// ```
pub fn run_cli(cli: Cli) -> Result<AttributeTree, CliError> {
    match cli.command {
        Command::Tree(command) => build_tree(&command.stats_dir),
    }
}

/// Loads every record under `stats_dir` and synthesises the attribute tree.
///
/// # Errors
/// Returns [`CliError`] when the directory cannot be read, a record fails to
/// parse, or the dependency graph rejects the input.
pub fn build_tree(stats_dir: &Path) -> Result<AttributeTree, CliError> {
    let records = load_records(stats_dir)?;
    info!(records = records.len(), "loaded statistics records");
    Ok(AttributeTreeBuilder::with_statistics(records).build()?)
}

/// Reads one JSON [`PairStatistics`] record from every regular file under
/// `dir`, visiting files in sorted path order so repeated runs see the same
/// record sequence.
///
/// # Errors
/// Returns [`CliError::Io`] when the directory or a file cannot be read and
/// [`CliError::Parse`] when a file does not hold a valid record.
pub fn load_records(dir: &Path) -> Result<Vec<PairStatistics>, CliError> {
    let entries = fs::read_dir(dir).map_err(|source| CliError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| CliError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort_unstable();

    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        records.push(load_record(&path)?);
    }
    Ok(records)
}

fn load_record(path: &Path) -> Result<PairStatistics, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
