//! Command-line interface: subcommand argument types and console output helpers

pub mod commands;
pub mod output;
