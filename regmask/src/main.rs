// regmask/src/main.rs
//! regmask entry point.
//!
//! Builds the pattern registry (built-ins, then the user's table, then
//! `--patterns`), constructs one shared engine and masks stdin to stdout.

use std::io::{self, BufWriter};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, LevelFilter};

use regmask::commands::list::run_list;
use regmask::commands::mask::{preflight, run_mask, MaskOptions};
use regmask::logger;
use regmask::Cli;
use regmask_core::{default_table_path, load_from_file, MaskError, MaskingEngine, PatternRegistry};

/// Exit status when `--key` names no registered pattern.
const EXIT_UNKNOWN_KEY: u8 = 2;

fn build_registry(args: &Cli) -> Result<PatternRegistry> {
    let mut registry = PatternRegistry::builtin();

    if !args.no_user_table {
        if let Some(path) = default_table_path().filter(|p| p.is_file()) {
            let user = load_from_file(&path)
                .with_context(|| format!("Failed to load user pattern table {}", path.display()))?;
            registry = PatternRegistry::merged(registry, user);
        }
    }

    if let Some(path) = &args.patterns {
        registry = PatternRegistry::merged(registry, load_from_file(path)?);
    }

    debug!("Registry holds {} pattern(s).", registry.len());
    Ok(registry)
}

fn main() -> Result<ExitCode> {
    let args = Cli::parse();

    logger::init_logger(args.verbose.then_some(LevelFilter::Debug));

    let registry = build_registry(&args)?;
    let engine = MaskingEngine::from_registry(registry);

    if args.list {
        run_list(&engine, io::stdout().lock())?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(key) = args.key.clone() else {
        anyhow::bail!("--key is required unless --list is given");
    };

    let options = MaskOptions {
        key,
        mask_char: args.mask_char.clone(),
        null_marker: args.null_marker.clone(),
        collect_stats: args.stats,
    };

    match preflight(&engine, &options) {
        Ok(()) => {}
        Err(MaskError::UnknownPattern(key)) => {
            eprintln!("Unknown pattern key '{}'. Use --list to see registered keys.", key);
            return Ok(ExitCode::from(EXIT_UNKNOWN_KEY));
        }
        Err(err) => return Err(err).context("Cannot mask with the requested settings"),
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let summary = run_mask(&engine, &options, stdin.lock(), BufWriter::new(stdout.lock()))?;

    if args.stats {
        eprintln!("{}", summary);
    }

    Ok(ExitCode::SUCCESS)
}
