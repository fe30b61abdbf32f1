//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - watch: scan the mall for new orders and audit them
//! - audit: audit a single question
//! - tools: list the registered audit tools
//! - check-config: validate the loaded configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Auditr - LLM auditor for points-mall redemption orders
#[derive(Parser, Debug)]
#[command(name = "auditr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan for new orders and audit them until Ctrl-C
    Watch {
        /// Run a single scan and exit
        #[arg(long)]
        once: bool,
    },

    /// Audit one question, e.g. a formatted order
    Audit {
        /// Audit question handed to the engine
        question: String,

        /// Print every step of the run
        #[arg(short, long)]
        trace: bool,
    },

    /// List the registered audit tools
    Tools,

    /// Validate the configuration and print the effective settings
    CheckConfig,
}
