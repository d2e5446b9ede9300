//! Command-line arguments for `regmask`.

use std::path::PathBuf;

use clap::Parser;

/// Mask named sensitive patterns in every line read from stdin.
#[derive(Debug, Parser)]
#[command(name = "regmask", author, version, about)]
pub struct Cli {
    /// Pattern key to apply to every line (e.g. APN, EMAIL, SSN)
    #[arg(long, short = 'k', required_unless_present = "list")]
    pub key: Option<String>,

    /// Replace each matched character with this single character instead of '*'
    #[arg(long, short = 'm')]
    pub mask_char: Option<String>,

    /// Pattern table (KEY=PATTERN lines, or .yaml) layered over the built-in table
    #[arg(long, short = 'p', env = "REGMASK_PATTERNS")]
    pub patterns: Option<PathBuf>,

    /// Do not read the table from the user's configuration directory
    #[arg(long)]
    pub no_user_table: bool,

    /// Text written for rows that produce no value
    #[arg(long, default_value = "\\N")]
    pub null_marker: String,

    /// List registered pattern keys and exit
    #[arg(long)]
    pub list: bool,

    /// Print a summary of masked rows and spans to stderr
    #[arg(long)]
    pub stats: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
