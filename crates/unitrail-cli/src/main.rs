//! Unitrail CLI entry point.
//!
//! Provides the `unitrail` binary with subcommands for ingesting raw
//! provider events into the local bus, checking the store files, and
//! listing the registered provider mappings.

mod cli_contract;
mod cli_handlers;
mod cli_normalize;
mod pipeline;

use clap::error::ErrorKind;
use clap::Parser;
use cli_contract::{AppExit, Cli, OutputMode, QUICK_HELP};
use cli_handlers::{emit_json_error, emit_json_success, handle_command};
use cli_normalize::{
    looks_like_human_requested, looks_like_json_requested, normalize_args, select_output_mode,
};
use serde_json::json;
use std::env;
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[cfg(test)]
use cli_normalize::format_cli_failure;

fn main() -> ExitCode {
    // Diagnostics go to stderr so robot-mode stdout stays pure JSON.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let raw_args: Vec<String> = env::args().collect();
    let mode = select_output_mode(
        looks_like_json_requested(&raw_args),
        looks_like_human_requested(&raw_args),
        io::stdout().is_terminal(),
    );
    if raw_args.len() == 1 {
        if mode == OutputMode::Json {
            emit_json_success(
                "OK",
                "Quick help emitted.",
                Some("help"),
                AppExit::Success as u8,
                &[],
                json!({
                    "quick_help": QUICK_HELP,
                }),
            );
        } else {
            println!("{QUICK_HELP}");
        }
        return AppExit::Success.code();
    }

    let (args, repair_notes) = normalize_args(raw_args);

    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(err) => {
            let (message, suggestions) = parse_error_guidance(err.kind());
            if mode == OutputMode::Json {
                emit_json_error(
                    "INVALID_ARGS",
                    message,
                    &suggestions,
                    &repair_notes,
                    AppExit::InvalidArgs as u8,
                );
            } else {
                if !repair_notes.is_empty() {
                    for note in &repair_notes {
                        eprintln!("Note: {note}");
                    }
                }
                eprintln!("{err}");
                for (idx, suggestion) in suggestions.iter().enumerate() {
                    eprintln!("Hint {}: {}", idx + 1, suggestion);
                }
            }
            return AppExit::InvalidArgs.code();
        }
    };

    let mode = select_output_mode(cli.json, cli.human, io::stdout().is_terminal());
    handle_command(cli, mode, &repair_notes).code()
}

fn parse_error_guidance(kind: ErrorKind) -> (&'static str, Vec<String>) {
    match kind {
        ErrorKind::InvalidSubcommand => (
            "Unknown subcommand.",
            vec![
                "Use one of: `unitrail ingest`, `unitrail check`, or `unitrail providers`."
                    .to_string(),
                "Run `unitrail --help` for full command syntax.".to_string(),
            ],
        ),
        ErrorKind::UnknownArgument => (
            "Unknown flag or option.",
            vec![
                "Run `unitrail --help` for global flags.".to_string(),
                "Run `unitrail <command> --help` to inspect command-specific flags.".to_string(),
            ],
        ),
        ErrorKind::MissingRequiredArgument => (
            "Missing required argument.",
            vec![
                "Example: `unitrail ingest aws payload.json`.".to_string(),
                "Example: `unitrail ingest gcp audit.json --bus events.jsonl --dead-letters rejects.jsonl`."
                    .to_string(),
            ],
        ),
        ErrorKind::ArgumentConflict => (
            "Conflicting flags or arguments.",
            vec![
                "Use either `--json` or `--human`, but not both.".to_string(),
                "Run `unitrail --help` to review valid flag combinations.".to_string(),
            ],
        ),
        _ => (
            "Invalid command syntax.",
            vec![
                "Run `unitrail --help` for command syntax.".to_string(),
                "Run `unitrail <command> --help` for command-specific args.".to_string(),
            ],
        ),
    }
}
