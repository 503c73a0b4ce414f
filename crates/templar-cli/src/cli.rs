//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and environment-variable fallbacks. No business logic lives
//! here.

use std::path::PathBuf;

use clap::{Args, Parser};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
///
/// Templar is a one-shot filter: one input document in, the fully expanded
/// document out. No subcommands.
#[derive(Debug, Parser)]
#[command(
    name    = "templar",
    bin_name = "templar",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Static macro expansion for XML behavior templates",
    long_about = "Templar fully expands the macro vocabulary of an XML behavior \
                  document - conditions, switches, loops, template invocations, \
                  and file includes - against a parameter environment, and prints \
                  the concrete markup.",
    after_help = "EXAMPLES:\n\
        \x20 templar aircraft.xml\n\
        \x20 templar aircraft.xml -I ~/sdk/ModelBehaviorDefs\n\
        \x20 templar aircraft.xml -o expanded.xml -vv\n\
        \x20 templar aircraft.xml --lenient-templates",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Input document path. A bare filename is treated as `./name` so that
    /// relative includes resolve against the current directory.
    #[arg(value_name = "INPUT", help = "Root document to expand")]
    pub input: PathBuf,

    /// Base directory for absolute-mode includes
    /// (`ModelBehaviorFile`/`Path` attributes).
    #[arg(
        short = 'I',
        long = "include-dir",
        value_name = "DIR",
        env = "TEMPLAR_INCLUDE_DIR",
        help = "Base directory for absolute includes"
    )]
    pub include_dir: Option<PathBuf>,

    /// Write the expanded document here instead of stdout.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Output file (default: stdout)"
    )]
    pub output: Option<PathBuf>,

    /// Expand calls to undefined templates to nothing instead of failing.
    #[arg(
        long = "lenient-templates",
        help = "Treat undefined template calls as no-ops"
    )]
    pub lenient_templates: bool,

    /// Flags shared by every invocation.
    #[command(flatten)]
    pub global: GlobalArgs,
}

// ── Global arguments ──────────────────────────────────────────────────────────

/// Global arguments: verbosity, colour, configuration.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase logging verbosity.
    ///
    /// Pass once for INFO (`-v`), twice for DEBUG (`-vv`), three times for
    /// TRACE (`-vvv`).  Conflicts with `--quiet`.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase verbosity (-v, -vv, -vvv)",
        long_help = "Increase logging verbosity:
    (none)  - Only errors and warnings
    -v      - Info level (progress messages)
    -vv     - Debug level (per-construct expansion events)
    -vvv    - Trace level (every evaluation)"
    )]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    /// Disable ANSI colour codes.
    ///
    /// Automatically honoured when `NO_COLOR` is set in the environment
    /// (see <https://no-color.org>).
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Configuration file path.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Configuration file path"
    )]
    pub config: Option<PathBuf>,
}

// ── tests ─────────────────────────────────────────────────────────────────────
