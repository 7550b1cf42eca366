// src/commands/mod.rs

//! Command implementations for the foundry CLI.

mod build;
mod fetch;
mod package;

pub use build::cmd_build;
pub use fetch::cmd_fetch;
pub use package::cmd_package;
