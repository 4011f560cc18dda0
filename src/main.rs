//! rebar's main application entry point.
//! Parses the command line and runs the matching recipe or template export.

use rebar::{
    cli::{get_args, Args, Command, ObjectArgs},
    config::export_template,
    error::{default_error_handler, RebarResult},
    exporter::ExportReport,
    recipe::{create_block_type_template, Author, ObjectDetails, PackageOptions, Scaffolder},
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .filter_module(
            "rebar",
            if args.verbose { log::LevelFilter::Trace } else { log::LevelFilter::Info },
        )
        .init();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

fn details(object: &ObjectArgs) -> ObjectDetails {
    ObjectDetails {
        handle: object.handle.clone(),
        name: object.name.clone(),
        description: object.description.clone(),
        author: Author { name: object.author_name.clone(), email: object.author_email.clone() },
    }
}

fn print_report(report: &ExportReport) {
    for path in &report.written {
        println!("Created: '{path}'");
    }
    log::info!("{} files written, {} skipped.", report.written.len(), report.skipped.len());
}

/// Main application logic execution.
fn run(args: Args) -> RebarResult<()> {
    match args.command {
        Command::Export { template, output_dir, recipe } => {
            print_report(&export_template(&template, &output_dir, recipe.as_deref())?);
            println!("Template exported successfully to {}.", output_dir.display());
        }
        Command::Package { object, composer, service_providers } => {
            let scaffolder = Scaffolder::new(&object.templates);
            let options = PackageOptions {
                uses_composer: composer,
                uses_service_providers: service_providers,
                ..Default::default()
            };
            print_report(&scaffolder.create_package(&object.output_dir, &details(&object), &options)?);
            println!("Package created in {}.", object.output_dir.display());
        }
        Command::Theme { object, package } => {
            let scaffolder = Scaffolder::new(&object.templates);
            let scaffold = scaffolder.create_theme(&object.output_dir, &details(&object), package)?;
            if let Some(package) = &scaffold.package {
                print_report(package);
            }
            print_report(&scaffold.object);
            println!("Theme created in {}.", scaffold.object_path.display());
        }
        Command::BlockType { object, package } => {
            let scaffolder = Scaffolder::new(&object.templates);
            let scaffold =
                scaffolder.create_block_type(&object.output_dir, &details(&object), package)?;
            if let Some(package) = &scaffold.package {
                print_report(package);
            }
            print_report(&scaffold.object);
            println!("Block type created in {}.", scaffold.object_path.display());
        }
        Command::BlockTypeTemplate { template_dir, block_type_dir } => {
            let target = create_block_type_template(&template_dir, &block_type_dir)?;
            println!("Block type template created: '{}'.", target.display());
        }
    }
    Ok(())
}
