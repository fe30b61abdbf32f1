//! CLI module for auditr - command-line interface and subcommands.
//!
//! Provides the entry point for continuous monitoring, one-off audits and
//! configuration checks.

pub mod commands;

pub use commands::Cli;
