//! Punch CLI library.
//!
//! This crate provides the `t` command-line interface for punch.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
