//! CLI support for the `fz` binary.

pub mod args;
pub mod commands;
pub mod context;

pub use context::CommandContext;
