//! Recipes for the concrete5 objects rebar can scaffold.
//!
//! A recipe turns an object's handle, name, description and author into the
//! substitution and exclusion tables for its boilerplate, then runs the
//! export. Boilerplates live under a templates root:
//!
//! ```text
//! <templates>/package-boilerplate
//! <templates>/theme-boilerplate
//! <templates>/block-boilerplate
//! ```

use crate::constants::{BLOCK_BOILERPLATE, PACKAGE_BOILERPLATE, THEME_BOILERPLATE};
use crate::error::{RebarError, RebarResult};
use crate::exclusion::{Exclusion, Exclusions};
use crate::exporter::{ExportReport, FileExporter};
use crate::substitution::{Replacement, Substitutions};
use cruet::Inflector;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Boilerplate author details, replaced in every generated file.
const BOILERPLATE_AUTHOR_NAME: &str = "Oliver Green";
const BOILERPLATE_AUTHOR_EMAIL: &str = "oliver@c5labs.com";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub email: String,
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// The answers describing an object to scaffold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDetails {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub author: Author,
}

#[derive(Debug, Clone, Default)]
pub struct PackageOptions {
    pub uses_composer: bool,
    pub uses_service_providers: bool,
    /// Extra substitutions, merged over the package defaults by key.
    pub substitutions: Substitutions,
}

/// Where a scaffolded object ended up.
#[derive(Debug)]
pub struct Scaffold {
    pub object_path: PathBuf,
    /// Set when the object was wrapped in a package of its own.
    pub package: Option<ExportReport>,
    pub object: ExportReport,
}

/// `block-boilerplate` and `block_boilerplate` become `BlockBoilerplate`.
pub fn studly(handle: &str) -> String {
    handle.to_pascal_case()
}

fn author_substitutions(author: &Author) -> Substitutions {
    Substitutions::new()
        .global("authorName", BOILERPLATE_AUTHOR_NAME, &author.name)
        .global("authorEmail", BOILERPLATE_AUTHOR_EMAIL, &author.email)
}

/// Tables for the package boilerplate.
pub fn package_tables(
    details: &ObjectDetails,
    options: &PackageOptions,
) -> (Substitutions, Exclusions) {
    let mut substitutions = author_substitutions(&details.author)
        .global(
            "name",
            "$pkgName = 'Package Boilerplate'",
            format!("$pkgName = '{}'", details.name),
        )
        .global(
            "description",
            "$pkgDescription = 'Start building standards complient concrete5 pacakges from me.'",
            format!("$pkgDescription = '{}'", details.description),
        )
        .global(
            "handle",
            "$pkgHandle = 'package-boilerplate'",
            format!("$pkgHandle = '{}'", details.handle),
        )
        .global(
            "namespace",
            "Concrete\\Package\\PackageBoilerplate",
            format!("Concrete\\Package\\{}", studly(&details.handle)),
        )
        .global("otherNameInstances", "Package Boilerplate", &details.name)
        .global(
            "otherDescriptionInstances",
            "Start building standards complient concrete5 packages from me.",
            &details.description,
        )
        .global("otherHandleInstances", "package-boilerplate", &details.handle);
    substitutions.merge(options.substitutions.clone());

    let mut exclusions = Exclusions::new();
    if !options.uses_composer {
        exclusions.set("controller.php", Exclusion::sections(["composer"]));
    }
    if !options.uses_service_providers {
        exclusions.set("src/Helpers/DemoHelper.php", Exclusion::Skip);
        exclusions.set("src/Providers/DemoHelperServiceProvider.php", Exclusion::Skip);
        exclusions.set("controller.php", Exclusion::sections(["service-providers"]));
    }

    (substitutions, exclusions)
}

/// Substitutions for the theme boilerplate, installed under `namespace`.
pub fn theme_tables(details: &ObjectDetails, namespace: &str) -> Substitutions {
    author_substitutions(&details.author)
        .global(
            "name",
            "$pThemeName = 'Theme Boilerplate'",
            format!("$pThemeName = '{}'", details.name),
        )
        .global(
            "description",
            "$pThemeDescription = 'A theme boilerplate to start building from.'",
            format!("$pThemeDescription = '{}'", details.description),
        )
        .global(
            "handle",
            "$pThemeHandle = 'theme-boilerplate'",
            format!("$pThemeHandle = '{}'", details.handle),
        )
        .global("namespace", "Concrete\\Theme\\ThemeBoilerplate", namespace)
        .global("otherNameInstances", "Theme Boilerplate", &details.name)
        .global(
            "otherDescriptionInstances",
            "Start building standards complient concrete5 themes from me.",
            &details.description,
        )
}

/// Substitutions for the block type boilerplate, installed under `namespace`.
pub fn block_type_tables(details: &ObjectDetails, namespace: &str) -> Substitutions {
    author_substitutions(&details.author)
        .global(
            "name",
            "$btName = 'Block Boilerplate'",
            format!("$btName = '{}'", details.name),
        )
        .global(
            "description",
            "$btDescription = 'A block boilerplate to start building from.'",
            format!("$btDescription = '{}'", details.description),
        )
        .global(
            "handle",
            "$btHandle = 'block-boilerplate'",
            format!("$btHandle = '{}'", details.handle),
        )
        .global("namespace", "Application\\Block\\BlockBoilerplate", namespace)
        .global("otherNameInstances", "Block Boilerplate", &details.name)
        .global(
            "otherDescriptionInstances",
            "Start building standards complient concrete5 blocks from me.",
            &details.description,
        )
}

/// Package controller edits that install a wrapped object and import its
/// class.
fn wrapper_substitutions(package_namespace: &str, install: &str, import: &str) -> Substitutions {
    Substitutions::new().scoped(
        "controller.php",
        vec![
            Replacement::new(
                "$pkg = parent::install();\n",
                format!("$pkg = parent::install();\n\n        {install}\n"),
            ),
            Replacement::new(
                format!("{package_namespace};\n"),
                format!("{package_namespace};\n\nuse {import};"),
            ),
        ],
    )
}

/// Runs recipes against the boilerplates under a templates root.
#[derive(Debug, Clone)]
pub struct Scaffolder {
    templates_root: PathBuf,
}

impl Scaffolder {
    pub fn new<P: Into<PathBuf>>(templates_root: P) -> Self {
        Self { templates_root: templates_root.into() }
    }

    fn boilerplate(&self, name: &str) -> PathBuf {
        self.templates_root.join(name)
    }

    /// Creates a package in `destination`.
    pub fn create_package<P: AsRef<Path>>(
        &self,
        destination: P,
        details: &ObjectDetails,
        options: &PackageOptions,
    ) -> RebarResult<ExportReport> {
        let (substitutions, exclusions) = package_tables(details, options);
        let mut exporter = FileExporter::new();
        exporter.set_exclusions(exclusions);
        exporter.set_substitutions(substitutions);

        debug!("Creating package '{}'", details.handle);
        exporter.export(self.boilerplate(PACKAGE_BOILERPLATE), destination)
    }

    /// Creates a theme. With `package_object` the theme is wrapped in a new
    /// `<handle>_package` package created in `destination`.
    pub fn create_theme<P: AsRef<Path>>(
        &self,
        destination: P,
        details: &ObjectDetails,
        package_object: bool,
    ) -> RebarResult<Scaffold> {
        let handle = &details.handle;
        self.create_object(
            destination.as_ref(),
            details,
            package_object,
            ObjectKind {
                boilerplate: THEME_BOILERPLATE,
                directory: "themes",
                segment: "Theme",
                application_namespace: format!("Concrete\\Theme\\{}", studly(handle)),
                install: format!("$theme = Theme::add('{handle}', $pkg);"),
                import: "Concrete\\Core\\Page\\Theme\\Theme",
                tables: theme_tables,
            },
        )
    }

    /// Creates a block type. With `package_object` the block type is wrapped
    /// in a new `<handle>_package` package created in `destination`.
    pub fn create_block_type<P: AsRef<Path>>(
        &self,
        destination: P,
        details: &ObjectDetails,
        package_object: bool,
    ) -> RebarResult<Scaffold> {
        let handle = &details.handle;
        self.create_object(
            destination.as_ref(),
            details,
            package_object,
            ObjectKind {
                boilerplate: BLOCK_BOILERPLATE,
                directory: "blocks",
                segment: "Block",
                application_namespace: format!("Application\\Block\\{}", studly(handle)),
                install: format!("$blockType = BlockType::installBlockType('{handle}', $pkg);"),
                import: "Concrete\\Core\\Block\\BlockType\\BlockType",
                tables: block_type_tables,
            },
        )
    }

    fn create_object(
        &self,
        destination: &Path,
        details: &ObjectDetails,
        package_object: bool,
        kind: ObjectKind,
    ) -> RebarResult<Scaffold> {
        let mut object_path = destination.to_path_buf();
        let mut namespace = kind.application_namespace;
        let mut package = None;

        if package_object {
            let package_handle = format!("{}_package", details.handle);
            let package_namespace = format!("Concrete\\Package\\{}", studly(&package_handle));
            let options = PackageOptions {
                substitutions: wrapper_substitutions(&package_namespace, &kind.install, kind.import),
                ..Default::default()
            };
            let package_details = ObjectDetails { handle: package_handle, ..details.clone() };

            package = Some(self.create_package(destination, &package_details, &options)?);
            object_path = destination.join(kind.directory).join(&details.handle);
            namespace = format!(
                "{package_namespace}\\{}\\{}",
                kind.segment,
                studly(&details.handle)
            );
        }

        let mut exporter = FileExporter::new();
        exporter.set_substitutions((kind.tables)(details, &namespace));

        debug!("Creating {} '{}' in {}", kind.segment, details.handle, object_path.display());
        let object = exporter.export(self.boilerplate(kind.boilerplate), &object_path)?;

        Ok(Scaffold { object_path, package, object })
    }
}

struct ObjectKind {
    boilerplate: &'static str,
    directory: &'static str,
    segment: &'static str,
    application_namespace: String,
    install: String,
    import: &'static str,
    tables: fn(&ObjectDetails, &str) -> Substitutions,
}

/// Creates a custom template for a block type by copying its `view.php`
/// into `template_dir`.
///
/// # Errors
/// * `RebarError::TemplateError` if the block type has no `view.php`, or if
///   `template_dir` or a sibling `<name>.php` template already exists
pub fn create_block_type_template<P, B>(template_dir: P, block_type_path: B) -> RebarResult<PathBuf>
where
    P: AsRef<Path>,
    B: AsRef<Path>,
{
    let template_dir = template_dir.as_ref();
    let templates_directory = template_dir.parent().unwrap_or_else(|| Path::new("."));
    let template_name = template_dir
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            RebarError::TemplateError(format!("invalid template path [{}]", template_dir.display()))
        })?;
    let template_file = templates_directory.join(format!("{template_name}.php"));
    let source = block_type_path.as_ref().join("view.php");
    let target = template_dir.join("view.php");

    if !source.is_file() {
        return Err(RebarError::TemplateError(format!(
            "The source template [{}] does not exist",
            source.display()
        )));
    }

    if template_dir.exists() || template_file.exists() {
        return Err(RebarError::TemplateError(format!(
            "The template already exists in [{}]",
            templates_directory.display()
        )));
    }

    fs::create_dir_all(template_dir)?;
    fs::copy(&source, &target)?;

    debug!("Copied {} to {}", source.display(), target.display());
    Ok(target)
}
