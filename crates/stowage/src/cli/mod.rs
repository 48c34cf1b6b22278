//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the stowage binary.

mod admit;
mod commands;
mod inspect;
mod serve;

pub use admit::admit_file;
pub use commands::{Cli, Commands};
pub use inspect::{list_assets, sweep_now};
pub use serve::serve;
