//! External process handling
//!
//! This module provides:
//! - Command execution with inherited stdio and explicit working directories
//! - Detection of the tools the post-scaffold steps shell out to

pub mod check;
pub mod command;

pub use check::{check_runtimes, check_tool, RuntimeInfo, Tool, REQUIRED_TOOLS};
pub use command::{run_batch, CommandError, CommandRunner, SystemRunner};
