//! PyPlus Translator Driver
//!
//! Command-line entry point: loads parser output, runs the translation
//! engine and writes C++ plus the list of constructs left for manual porting.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use pyplus_driver::cli::{Cli, Command};
use pyplus_driver::{reporter, runner};
use pyplus_translate::TranslatorConfig;
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            process::exit(1);
        }
    }
}

/// Returns whether the run succeeded
fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Command::Translate {
            inputs,
            output,
            source,
            diagnostics,
            policy,
        } => {
            let config = policy.resolve()?;
            translate_command(&inputs, output.as_deref(), source.as_deref(), diagnostics, &config)
        }
        Command::Check { inputs, policy } => {
            let config = policy.resolve()?;
            check_command(&inputs, &config)
        }
    }
}

fn translate_command(
    inputs: &[PathBuf],
    output: Option<&Path>,
    source: Option<&Path>,
    diagnostics: bool,
    config: &TranslatorConfig,
) -> Result<bool> {
    let to_stdout = output.is_none() && inputs.len() == 1;
    if !to_stdout {
        runner::check_output_collisions(inputs, output)?;
    }

    let outcomes = runner::translate_all(inputs, source, config)?;
    let mut ok = true;

    for outcome in outcomes {
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("{}: {:#}", "Error".red().bold(), e);
                ok = false;
                continue;
            }
        };

        if to_stdout {
            print!("{}", outcome.cpp);
            if diagnostics {
                let json = serde_json::to_string_pretty(&outcome.translation.diagnostics)
                    .context("Failed to serialise diagnostics")?;
                eprintln!("{}", json);
            }
            continue;
        }

        let dir = runner::output_dir(&outcome.input, output);
        let written = runner::write_outputs(&outcome, dir, diagnostics)?;
        for path in written {
            println!("{} {}", "wrote".green(), path.display());
        }
    }

    Ok(ok)
}

fn check_command(inputs: &[PathBuf], config: &TranslatorConfig) -> Result<bool> {
    let outcomes = runner::translate_all(inputs, None, config)?;
    let mut clean = true;

    for (input, outcome) in inputs.iter().zip(outcomes) {
        match outcome {
            Ok(outcome) => {
                let report = reporter::collect(&outcome.translation);
                reporter::print_report(&input.display().to_string(), &report);
                clean &= !report.has_warnings() && !report.has_errors();
            }
            Err(e) => {
                eprintln!("{}: {:#}", "Error".red().bold(), e);
                clean = false;
            }
        }
    }

    Ok(clean)
}
