// regmask/src/lib.rs
//! # regmask command-line host
//!
//! Feeds line-oriented input through `regmask-core`, one row per line, the
//! way a query engine would call the masking function once per value.

pub mod cli;
pub mod commands;
pub mod logger;

pub use cli::Cli;
