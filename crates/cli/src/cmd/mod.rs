//! Subcommand implementations

pub mod prepare;
pub mod show;
