//! `wavsplice` CLI.

/// Internal module.
mod commands;
/// Internal module.
mod error;
/// Internal module.
mod output;
/// Internal module.
mod util;

use clap::{Parser, Subcommand};
use error::{CliError, Result};
use output::Output;
use std::path::PathBuf;
use wavsplice::Settings;

fn main() {
    if let Err(err) = run() {
        Output::error_user(err.user_message());
        std::process::exit(1);
    }
}

#[derive(Parser)]
#[command(name = "wavsplice")]
#[command(about = "Repair and splice RIFF/WAVE containers", version)]
#[command(arg_required_else_help = true)]
/// Internal struct.
struct Cli {
    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode (only errors).
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Settings file (defaults to ~/.wavsplice/config.toml).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    /// Internal field.
    command: Commands,
}

#[derive(Subcommand)]
/// Internal enum.
enum Commands {
    /// Show format, sizes and duration of a wave file.
    Inspect(commands::inspect::CmdArgs),

    /// Rewrite RIFF and data size fields to the real length.
    Repair(commands::repair::CmdArgs),

    /// Insert (positive) or remove (negative) silence.
    Pad(commands::pad::CmdArgs),
}

/// Internal struct.
struct Context {
    /// Internal field.
    out: Output,
    /// Internal field.
    settings: Settings,
}

/// Internal helper function.
fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.quiet && cli.verbose {
        return Err(CliError::Message(
            "--quiet and --verbose cannot be used together".to_string(),
        ));
    }

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let out = Output::new(cli.quiet, cli.verbose);
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load().unwrap_or_else(|err| {
            out.warn_user(format!("settings file ignored, using defaults: {err}"));
            Settings::default()
        }),
    };

    let ctx = Context { out, settings };

    match cli.command {
        Commands::Inspect(args) => commands::inspect::run(&ctx, &args),
        Commands::Repair(args) => commands::repair::run(&ctx, &args),
        Commands::Pad(args) => commands::pad::run(&ctx, &args),
    }
}
