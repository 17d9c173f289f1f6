//! CLI, configuration, command handlers
//!
//! This crate provides the `quickcal` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::{Cli, Command};
pub use error::{ClientError, ClientResult};
