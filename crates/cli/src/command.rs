//! Command trait for the chcp-local-dev CLI
//!
//! Every subcommand receives the same `RuntimeContext`, which keeps command
//! implementations free of argument resolution and easy to test.

use crate::common::RuntimeContext;
use anyhow::Result;

/// Trait for all subcommands
pub trait Command {
    /// The type returned by this command
    type Output;

    /// Execute the command with the given runtime context
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot complete. `prepare` never
    /// fails: its problems are reported and folded into the outcome.
    fn execute(&self, context: &RuntimeContext) -> Result<Self::Output>;
}
