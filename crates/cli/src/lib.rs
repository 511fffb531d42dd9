//! `stockroom` command-line application: configuration, commands and the
//! demonstration entry point.

pub mod commands;
pub mod config;
pub mod demo;

pub use commands::{BatchOp, BatchOperation, Cli, Command, apply_batch, run};
pub use config::{AppConfig, ConfigError};
