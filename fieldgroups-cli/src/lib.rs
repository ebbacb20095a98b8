//! fieldgroups CLI - command line surface over the `fieldgroups` library.
//!
//! Commands:
//! - `fieldgroups classify <FILE|->`: print the grouped fields as JSON or YAML
//! - `fieldgroups summary <FILE|->`: print per-category counts, tables included
//! - `fieldgroups types`: print the category to type-tag table

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands, OutputFormat};
