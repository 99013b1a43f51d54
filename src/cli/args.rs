//! CLI argument definitions using clap
//!
//! Commands:
//! - aeropart check --plan <path>
//! - aeropart simulate --plan <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// aeropart - partition role-transition orchestrator
#[derive(Parser, Debug)]
#[command(name = "aeropart")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load and validate a simulation plan
    Check {
        /// Path to plan file
        #[arg(long, default_value = "./plan.json")]
        plan: PathBuf,
    },

    /// Run every role in a plan through an orchestrator with scripted steps
    Simulate {
        /// Path to plan file
        #[arg(long, default_value = "./plan.json")]
        plan: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
