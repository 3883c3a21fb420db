//! Tooling & Integration Layer
//!
//! Command-line front end that drives a collection controller against a live REST
//! backend, plus the text renderers it prints with.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands};
