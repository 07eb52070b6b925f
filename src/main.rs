//! mjml-utils - watch and compile mjml templates into html.

mod cli;
mod compiler;
mod config;
mod core;
mod logger;
mod utils;
mod watch;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use compiler::{CompileError, Compiler};
use config::Config;
use watch::WatchError;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = Config::load(&cli)?;
    let compiler = Compiler::new(config.compiler);

    let result = run(&cli.command, compiler);

    // A missing compiler gets install guidance instead of an error trace
    if let Err(err) = &result
        && let Some(fatal) = fatal_error(err)
    {
        log!("error"; "{}", fatal);
        std::process::exit(1);
    }

    result
}

fn run(command: &Commands, compiler: Compiler) -> Result<()> {
    match command {
        Commands::Watch { directory } => watch::watch(directory, compiler)
            .with_context(|| format!("watching {} failed", directory.display())),
        Commands::CompileAll { path } => {
            let count = compiler
                .compile_all(path)
                .with_context(|| format!("compiling {} failed", path.display()))?;
            debug!("compile"; "compiled {} file(s) under {}", count, path.display());
            Ok(())
        }
        Commands::Compile { path } => compiler
            .compile(path)
            .with_context(|| format!("compiling {} failed", path.display())),
    }
}

/// The compile error behind `err` when it is fatal.
fn fatal_error(err: &anyhow::Error) -> Option<&CompileError> {
    let compile = match err.downcast_ref::<WatchError>() {
        Some(WatchError::Compile(compile)) => Some(compile),
        Some(_) => None,
        None => err.downcast_ref::<CompileError>(),
    };
    compile.filter(|e| e.is_fatal())
}
