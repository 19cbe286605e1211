//! CLI module
//!
//! Command-line interface for the connector.
//!
//! # Commands
//!
//! - `check` - Test the API key
//! - `operations` - List the routing table
//! - `describe` - Show one operation
//! - `validate` - Check routing tables
//! - `run` - Execute an operation

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;

#[cfg(test)]
mod tests;
