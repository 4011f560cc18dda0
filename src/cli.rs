//! Command-line interface implementation for rebar.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, Args as ClapArgs, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments structure for rebar.
#[derive(Parser, Debug)]
#[command(author, version, about = "rebar: concrete5 scaffolding tool", long_about = None)]
pub struct Args {
    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Export a template directory, applying a recipe file
    Export {
        /// Path to the template directory
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Directory where the exported tree will be created
        #[arg(value_name = "OUTPUT_DIR")]
        output_dir: PathBuf,

        /// Recipe file with substitutions and exclusions.
        /// Defaults to a rebar.json, rebar.yml or rebar.yaml inside the template.
        #[arg(short, long, value_name = "FILE")]
        recipe: Option<PathBuf>,
    },

    /// Create a package
    Package {
        #[command(flatten)]
        object: ObjectArgs,

        /// Keep the composer autoloading sections
        #[arg(long)]
        composer: bool,

        /// Keep the demo service provider and helper
        #[arg(long)]
        service_providers: bool,
    },

    /// Create a theme
    Theme {
        #[command(flatten)]
        object: ObjectArgs,

        /// Wrap the theme in a package of its own
        #[arg(long)]
        package: bool,
    },

    /// Create a block type
    BlockType {
        #[command(flatten)]
        object: ObjectArgs,

        /// Wrap the block type in a package of its own
        #[arg(long)]
        package: bool,
    },

    /// Create a custom template for an existing block type
    BlockTypeTemplate {
        /// Directory of the new template, e.g. application/blocks/content/templates/fancy
        #[arg(value_name = "TEMPLATE_DIR")]
        template_dir: PathBuf,

        /// Directory of the block type providing view.php
        #[arg(value_name = "BLOCK_TYPE_DIR")]
        block_type_dir: PathBuf,
    },
}

/// Answers shared by every object recipe.
#[derive(ClapArgs, Debug)]
pub struct ObjectArgs {
    /// Directory where the object will be created
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Directory holding the package, theme and block boilerplates
    #[arg(short, long, value_name = "DIR", env = "REBAR_TEMPLATES")]
    pub templates: PathBuf,

    /// Object handle, e.g. my-package
    #[arg(long)]
    pub handle: String,

    /// Human readable name
    #[arg(long)]
    pub name: String,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long)]
    pub author_name: String,

    #[arg(long)]
    pub author_email: String,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument
                || e.kind() == ErrorKind::MissingSubcommand
            {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
