//! CLI module
//!
//! Command-line interface for running the tap.
//!
//! # Commands
//!
//! - `discover` - Print the stream catalog
//! - `read` - Extract data from the selected streams

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
