//! chunkspan CLI library
//!
//! This library provides the command-line interface for annotating long
//! texts through a length-limited annotator, with a local gazetteer
//! standing in for the remote service.

pub mod commands;
pub mod config;
pub mod error;
pub mod gazetteer;
pub mod input;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};
