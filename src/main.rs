//! `lineview` CLI: compile a line-profiler dump into HTML reports.

mod cli_logger;

use anyhow::Result;
use clap::{Parser, Subcommand};
use lineview::{Config, model_from_artifact, process_artifact};

use std::path::PathBuf;

use cli_logger::CliLogger;

#[derive(Debug, Parser)]
#[command(
    name = "lineview",
    version,
    about = "Compile a line-profiler dump into cross-linked HTML reports."
)]
struct Cli {
    /// Emit machine-readable JSON on stdout.
    #[arg(long, global = true)]
    json: bool,

    /// Disable ANSI styling in pretty output.
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to the config file.
    #[arg(long, global = true, default_value = "lineview.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse ARTIFACT and write the HTML report set under --out.
    Build {
        /// Path to the profiler dump (e.g. pprofile.txt).
        artifact: PathBuf,

        /// Output directory for the generated pages.
        #[arg(long, default_value = "lineview_report")]
        out: PathBuf,
    },
    /// Parse ARTIFACT and print the fully resolved model.
    Inspect {
        /// Path to the profiler dump.
        artifact: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let logger = CliLogger::new(cli.json, cli.no_color);

    if let Err(err) = run(&cli, &logger) {
        logger.print_error(&err.to_string());
        std::process::exit(1);
    }
}

fn run(cli: &Cli, logger: &CliLogger) -> Result<()> {
    let config = Config::load_optional(&cli.config);

    match &cli.command {
        Command::Build { artifact, out } => {
            let paths = process_artifact(artifact, out, &config.report)?;
            logger.print_build(&paths);
        }
        Command::Inspect { artifact } => {
            let model = model_from_artifact(artifact)?;
            logger.print_serialized(&model)?;
        }
    }
    Ok(())
}
