//! CLI module for aeropart
//!
//! Provides command-line interface for:
//! - check: Validate a simulation plan
//! - simulate: Run a plan's role sequence through an orchestrator

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    check, run, run_command, run_plan, simulate, SimulationSummary, TransitionReport,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_line, write_response};
