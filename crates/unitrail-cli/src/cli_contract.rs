use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Unitrail — multi-cloud audit event normalizer.
#[derive(Parser)]
#[command(name = "unitrail")]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    /// Emit machine-readable JSON output.
    #[arg(long, global = true, conflicts_with = "human")]
    pub(crate) json: bool,

    /// Force human-readable output (overrides auto JSON in piped mode).
    #[arg(long, global = true)]
    pub(crate) human: bool,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Normalize one raw provider event and publish it to the event bus.
    #[command(alias = "normalize")]
    Ingest {
        /// Provider the payload came from (aws, azure, or gcp; any casing).
        provider: String,

        /// Path to the raw event payload (a JSON object).
        payload: PathBuf,

        /// Event bus file to append published events to.
        #[arg(long, default_value = "unitrail-bus.jsonl")]
        bus: PathBuf,

        /// Dead-letter file for rejected events.
        #[arg(long, default_value = "unitrail-dead-letters.jsonl")]
        dead_letters: PathBuf,
    },

    /// Inspect the bus and dead-letter stores and report record counts and digests.
    #[command(alias = "status")]
    Check {
        /// Event bus file to inspect.
        #[arg(long, default_value = "unitrail-bus.jsonl")]
        bus: PathBuf,

        /// Dead-letter file to inspect.
        #[arg(long, default_value = "unitrail-dead-letters.jsonl")]
        dead_letters: PathBuf,
    },

    /// List registered providers, their field paths, and translation coverage.
    #[command(alias = "mappings")]
    Providers,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum OutputMode {
    Human,
    Json,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum AppExit {
    Success = 0,
    NotFound = 1,
    InvalidArgs = 2,
    EventRejected = 3,
    RuntimeError = 4,
}

impl AppExit {
    pub(crate) fn code(self) -> ExitCode {
        ExitCode::from(self as u8)
    }
}

pub(crate) const QUICK_HELP: &str = "\
unitrail — multi-cloud audit event normalizer
Usage: unitrail [--json|--human] <command> [args]
Commands:
  ingest <provider> <payload.json> [--bus <path>] [--dead-letters <path>]
  check [--bus <path>] [--dead-letters <path>]
  providers
Tips:
  unitrail --help
  unitrail <command> --help";

pub(crate) const ROBOT_SCHEMA_VERSION: &str = "unitrail-cli-robot-v1";
