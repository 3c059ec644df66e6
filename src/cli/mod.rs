//! Command-line interface
//!
//! Clap argument definitions and the command handlers they dispatch to.

pub mod args;
pub mod commands;
