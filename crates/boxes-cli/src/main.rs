//! Entry point. Component: `boxes-cli` binary (spec.md §6.1).
//!
//! Grounded on the teacher's `ox_bin::main`/`AppStartup` split between
//! argument parsing, setup, and the run itself, adapted from a TUI
//! editor's event loop into a single batch pipeline invocation.

mod adhoc;
mod args;
mod error;
mod list;
mod logging;
mod pipeline;

use std::process::ExitCode;

use args::{Cli, ExtraArg};
use clap::Parser;
use error::CliError;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("boxes version {VERSION}");
        return ExitCode::SUCCESS;
    }

    let debug_areas = match &cli.extra {
        Some(spec) => match args::parse_extra(spec) {
            Ok(ExtraArg::Debug(areas)) => areas,
            Ok(ExtraArg::Undoc) => Vec::new(),
            Err(e) => return fail(&e),
        },
        None => Vec::new(),
    };
    let _log_guard = logging::init(&debug_areas);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.list {
        let (catalog, config_errors) = boxes_design::Catalog::load(cli.config.as_deref())?;
        if catalog.is_empty() && !config_errors.is_empty() {
            return Err(CliError::config(config_errors));
        }
        let selected = match &cli.design {
            Some(name) => Some(
                catalog
                    .by_name(name)
                    .ok_or_else(|| CliError::DesignSelection(format!("Unknown design \"{name}\"")))?,
            ),
            None => None,
        };
        let text = list::list(&catalog, selected, cli.tag_query.as_deref())?;
        return pipeline::write_output(cli.outfile.as_deref(), &text);
    }

    let outcome = pipeline::run(cli)?;
    pipeline::write_output(cli.outfile.as_deref(), &outcome.text)
}

fn fail(err: &CliError) -> ExitCode {
    eprintln!("boxes: {err}");
    ExitCode::from(err.exit_code() as u8)
}
