//! Shuffly command-line front end
//!
//! Wraps the engine's [`ShuffleSession`](shuffly_engine::ShuffleSession)
//! with configuration loading, a JSON state file and `clap` subcommands.

pub mod cli;
pub mod commands;
pub mod config;
pub mod store;
