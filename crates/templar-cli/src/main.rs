//! # Templar CLI
//!
//! Static macro expansion for XML behavior templates.
//!
//! ## Startup sequence
//!
//! 1. Parse CLI arguments (clap handles `--help` / `--version` early-exit).
//! 2. Initialise the tracing subscriber (logging, stderr only).
//! 3. Load configuration (file + env + defaults).
//! 4. Expand the input document and emit the result.
//! 5. Translate any [`CliError`] into a user-facing message and exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                     |
//! |------|-----------------------------|
//! |  0   | Success                     |
//! |  1   | Expansion / internal error  |
//! |  2   | User / argument error       |
//! |  3   | Input or include not found  |
//! |  4   | Configuration error         |

use std::io::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info};

use templar_adapters::{FsDocumentLoader, write_document};
use templar_core::{
    application::ExpandService,
    expand::{ExpandOptions, TemplateStrictness},
};

use crate::{
    cli::Cli,
    config::{AppConfig, default_include_dir},
    error::{CliError, CliResult},
    logging::init_logging,
};

mod cli;
mod config;
mod error;
mod logging;

fn main() -> ExitCode {
    // ── 1. Parse arguments ────────────────────────────────────────────────
    // clap handles --help / --version and exits automatically; errors here
    // are argument-parse failures (exit 2).
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Render clap's own error (already user-friendly) and exit 2.
            eprintln!("{}", e.render().ansi());
            return ExitCode::from(2);
        }
    };

    // ── 2. Initialise tracing ─────────────────────────────────────────────
    if let Err(e) = init_logging(&cli.global) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::from(1);
    }

    debug!(
        input = %cli.input.display(),
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        "CLI started"
    );

    // ── 3. Load configuration ─────────────────────────────────────────────
    let config = match AppConfig::load(cli.global.config.as_ref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e:#}");
            return ExitCode::from(4);
        }
    };

    // ── 4. Expand + 5. Error handling ─────────────────────────────────────
    let verbose = cli.global.verbose > 0;
    match run(cli, config) {
        Ok(()) => {
            info!("Templar completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose),
    }
}

/// Expand the input and emit the serialized tree.
fn run(cli: Cli, config: AppConfig) -> CliResult<()> {
    let input = normalize_input(&cli.input);
    let include_dir = cli
        .include_dir
        .or(config.expansion.include_dir)
        .unwrap_or_else(default_include_dir);
    let strictness = if cli.lenient_templates {
        TemplateStrictness::Lenient
    } else {
        config.expansion.strictness
    };

    debug!(
        include_dir = %include_dir.display(),
        ?strictness,
        "expansion configured"
    );

    let options = ExpandOptions::new(include_dir).with_strictness(strictness);
    let service = ExpandService::new(Box::new(FsDocumentLoader::new()), options);
    let tree = service.expand_file(&input)?;

    let mut text = write_document(&tree);
    text.push('\n');
    match &cli.output {
        Some(path) => std::fs::write(path, &text)?,
        None => std::io::stdout().write_all(text.as_bytes())?,
    }
    Ok(())
}

/// A bare filename becomes `./name`, so relative includes have a directory
/// to resolve against.
fn normalize_input(input: &std::path::Path) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => input.to_path_buf(),
        _ => PathBuf::from(".").join(input),
    }
}

/// Translate a `CliError` into a user message and an appropriate exit code.
///
/// This is the single place where structured errors become human-readable
/// output and OS exit codes — the format/suggestion machinery in `CliError`
/// is all exercised here.
fn handle_error(err: CliError, verbose: bool) -> ExitCode {
    // 1. Emit a structured log event at the right severity.
    err.log();

    // 2. Print a user-friendly message.  We write directly to stderr so the
    //    message appears even when stdout is redirected.
    //
    //    Colour is disabled when stderr is not a TTY (same logic as logging.rs).
    let msg = if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{msg}");

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────
