//! Recipe file handling.
//! A recipe file carries the substitution and exclusion tables for a plain
//! template export, in JSON or YAML.

use crate::constants::RECIPE_FILES;
use crate::error::{RebarError, RebarResult};
use crate::exclusion::{Exclusion, Exclusions};
use crate::exporter::{ExportReport, FileExporter};
use crate::substitution::Substitutions;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Substitution and exclusion tables for one export.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub substitutions: Substitutions,
    #[serde(default)]
    pub exclusions: Exclusions,
}

impl Recipe {
    /// Hands both tables to `exporter`, replacing what it had.
    pub fn configure(self, exporter: &mut FileExporter) {
        exporter.set_substitutions(self.substitutions);
        exporter.set_exclusions(self.exclusions);
    }
}

/// Loads the first recipe file found in a template directory.
///
/// # Arguments
/// * `template_dir` - Directory containing the template
/// * `config_files` - File names to try, in order
///
/// # Returns
/// * `RebarResult<(PathBuf, String)>` - Path and contents of the first found file
///
/// # Errors
/// * `RebarError::ConfigError` if none of the files exist
pub fn load_config<P: AsRef<Path>>(
    template_dir: P,
    config_files: &[&str],
) -> RebarResult<(PathBuf, String)> {
    for file in config_files {
        let config_path = template_dir.as_ref().join(file);
        if config_path.is_file() {
            debug!("Loading recipe from {}", config_path.display());
            let content = std::fs::read_to_string(&config_path)?;
            return Ok((config_path, content));
        }
    }

    Err(RebarError::ConfigError(format!(
        "No recipe file found (tried: {})",
        config_files.join(", ")
    )))
}

/// Parses recipe content, trying JSON first and YAML second.
pub fn parse_recipe(content: &str) -> RebarResult<Recipe> {
    match serde_json::from_str(content) {
        Ok(recipe) => Ok(recipe),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| RebarError::ConfigError(format!("Invalid recipe format: {e}"))),
    }
}

/// Reads and parses a recipe file at an explicit path.
pub fn read_recipe<P: AsRef<Path>>(path: P) -> RebarResult<Recipe> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(RebarError::ConfigError(format!(
            "Invalid recipe path: {}",
            path.display()
        )));
    }
    parse_recipe(&std::fs::read_to_string(path)?)
}

/// Looks for a recipe inside the template itself.
///
/// The recipe file is excluded from the export it configures.
pub fn find_recipe<P: AsRef<Path>>(template_dir: P, config_files: &[&str]) -> RebarResult<Option<Recipe>> {
    let template_dir = template_dir.as_ref();
    let (path, content) = match load_config(template_dir, config_files) {
        Ok(found) => found,
        Err(RebarError::ConfigError(_)) => return Ok(None),
        Err(e) => return Err(e),
    };

    let mut recipe = parse_recipe(&content)?;
    if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
        recipe.exclusions.set(name, Exclusion::Skip);
    }
    Ok(Some(recipe))
}

/// Exports `template_dir` into `output_dir`.
///
/// The tables come from `recipe_path` when given, otherwise from a recipe
/// file inside the template, which is then left out of the output.
pub fn export_template<T, O>(
    template_dir: T,
    output_dir: O,
    recipe_path: Option<&Path>,
) -> RebarResult<ExportReport>
where
    T: AsRef<Path>,
    O: AsRef<Path>,
{
    let template_dir = template_dir.as_ref();
    let recipe = match recipe_path {
        Some(path) => Some(read_recipe(path)?),
        None => find_recipe(template_dir, &RECIPE_FILES)?,
    };

    let mut exporter = FileExporter::new();
    if let Some(recipe) = recipe {
        recipe.configure(&mut exporter);
    }
    exporter.export(template_dir, output_dir)
}
