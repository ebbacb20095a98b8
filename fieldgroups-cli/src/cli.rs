//! CLI definition for the fieldgroups command-line interface.
//!
//! Self-contained: depends only on `clap` and `std`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for classified groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON (pretty-printed unless --compact)
    Json,
    /// YAML
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

/// fieldgroups - classify form field metadata
///
/// Reads form field metadata (JSON or YAML) and sorts the fields into
/// simple, user, string-list, entity-list, file and table groups.
#[derive(Parser, Debug)]
#[command(name = "fieldgroups")]
#[command(version)]
#[command(about = "Classify form field metadata into semantic groups")]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a form and print the grouped fields
    Classify {
        /// Form metadata file, or `-` to read JSON from stdin
        input: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Single-line JSON output
        #[arg(long)]
        compact: bool,
    },
    /// Print per-category field counts, including nested tables
    Summary {
        /// Form metadata file, or `-` to read JSON from stdin
        input: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print which type tags belong to each category
    Types {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
