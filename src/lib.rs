//! rebar is a scaffolding tool for concrete5 packages, themes and block types.
//! It exports bundled boilerplate trees to a destination, substituting the
//! object's details and cutting out the sections the chosen options don't need.

/// Command-line interface module for the rebar application
pub mod cli;

/// Recipe files (rebar.json, rebar.yml, rebar.yaml)
pub mod config;

/// Common constants
pub mod constants;

/// Error types and handling for the rebar application
pub mod error;

/// Exclusion tables: skipped files, removed sections and line ranges
pub mod exclusion;

/// Copies a template tree to a destination, transforming file contents
pub mod exporter;

/// Version control ignore patterns and table key matching
pub mod ignore;

/// Byte-level transforms over template file contents
pub mod mutator;

/// Package, theme, block type and block type template recipes
pub mod recipe;

/// Ordered literal search/replace tables
pub mod substitution;

pub use exclusion::{Exclusion, Exclusions, LineRange, Removal};
pub use exporter::{ExportReport, FileExporter};
pub use substitution::{Replacement, Substitution, Substitutions};
