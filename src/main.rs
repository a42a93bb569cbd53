//! Afinar CLI
//!
//! Single-command assembly entry point for composite SVC training
//! configurations.
//!
//! # Usage
//!
//! ```bash
//! # Assemble with defaults (multi-speaker, dataset/ tree)
//! afinar
//!
//! # Pick fragments and an output name
//! afinar --model diff_svc_v2 --scheduler warmup_cosine --output my_run
//!
//! # Single-speaker mode loads the dataset fragment instead
//! afinar --multi-speaker false --dataset naive_svc
//! ```

use afinar::assemble::assemble_to_file;
use afinar::cli::Cli;
use afinar::resolve::ResolverContext;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Configure output based on verbose/quiet flags
    let log_level = if cli.quiet {
        LogLevel::Quiet
    } else if cli.verbose {
        LogLevel::Verbose
    } else {
        LogLevel::Normal
    };

    match run(&cli, log_level) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum LogLevel {
    Quiet,
    Normal,
    Verbose,
}

fn log(level: LogLevel, required: LogLevel, msg: &str) {
    if level != LogLevel::Quiet && (level == required || required == LogLevel::Normal) {
        println!("{msg}");
    }
}

fn run(cli: &Cli, level: LogLevel) -> Result<(), String> {
    let opts = cli.to_options();

    log(level, LogLevel::Verbose, &format!("  Model: {}", opts.model));
    log(
        level,
        LogLevel::Verbose,
        &format!("  Dataset: {}", opts.dataset),
    );
    log(
        level,
        LogLevel::Verbose,
        &format!("  Scheduler: {}", opts.scheduler),
    );
    log(
        level,
        LogLevel::Verbose,
        &format!("  Multi-speaker: {}", opts.multi_speaker),
    );

    let ctx = ResolverContext::svc_defaults();
    let out_path = assemble_to_file(&opts, &ctx).map_err(|e| e.to_string())?;

    log(
        level,
        LogLevel::Normal,
        &format!("Saved configuration to {}", out_path.display()),
    );
    Ok(())
}
