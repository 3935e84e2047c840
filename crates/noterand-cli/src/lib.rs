//! noterand CLI library
//!
//! This library exposes the CLI command implementations and the prompting
//! collaborators for testing purposes.

pub mod cli_args;
pub mod commands;
pub mod config;
pub mod prompt;
