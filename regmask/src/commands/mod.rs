//! Subcommand implementations for the `regmask` binary.

pub mod list;
pub mod mask;
