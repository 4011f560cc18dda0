//! The file exporter: copies a template tree to a destination, cutting out
//! excluded files and sections and applying substitutions on the way.

use crate::error::{RebarError, RebarResult};
use crate::exclusion::{CompiledExclusions, Exclusion, Exclusions, FileExclusion, LineRange};
use crate::ignore::vcs_globset;
use crate::mutator::{exclude_regions, strip_template_tags};
use crate::substitution::{CompiledSubstitutions, Substitutions};
use faccess::PathExt;
use globset::GlobSet;
use log::debug;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// What to do with a single template file.
#[derive(Debug, PartialEq, Eq)]
pub enum FileOperation {
    /// The file is excluded entirely.
    Skip,
    /// Write the transformed content.
    Write { target: PathBuf, content: Vec<u8> },
}

/// Relative paths of the files handled by one export.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Materializes transformed copies of template trees.
///
/// The exclusion and substitution tables are set by the caller before each
/// [`FileExporter::export`] call.
#[derive(Debug, Default, Clone)]
pub struct FileExporter {
    exclusions: Exclusions,
    substitutions: Substitutions,
}

impl FileExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the entire exclusion table.
    pub fn set_exclusions(&mut self, exclusions: Exclusions) {
        self.exclusions = exclusions;
    }

    /// Upserts one exclusion entry. See [`Exclusions::set`].
    pub fn set_exclusion<K: Into<String>>(&mut self, path: K, exclusion: Exclusion) {
        self.exclusions.set(path, exclusion);
    }

    /// Replaces the entire substitution table.
    pub fn set_substitutions(&mut self, substitutions: Substitutions) {
        self.substitutions = substitutions;
    }

    pub fn exclusions(&self) -> &Exclusions {
        &self.exclusions
    }

    pub fn substitutions(&self) -> &Substitutions {
        &self.substitutions
    }

    /// Runs the content pipeline for one file without touching the disk.
    ///
    /// Content of a skipped file is returned unchanged.
    pub fn transform(&self, relative_path: &str, content: Vec<u8>) -> RebarResult<Vec<u8>> {
        let exclusions = self.exclusions.compile();
        let substitutions = self.substitutions.compile()?;
        Ok(match exclusions.resolve(relative_path) {
            FileExclusion::Skip => content,
            FileExclusion::Keep { sections, lines } => {
                run_pipeline(&substitutions, relative_path, content, &sections, &lines)
            }
        })
    }

    /// Exports every file under `source` into `destination`.
    ///
    /// # Errors
    /// * `RebarError::PathNotWritable` if the directory two levels above
    ///   `destination` is missing or the current user cannot write to it;
    ///   nothing is written then.
    /// * `RebarError::IoError` for any failure while walking, reading or writing.
    ///   Files written before the failure are left in place.
    pub fn export<S: AsRef<Path>, D: AsRef<Path>>(
        &self,
        source: S,
        destination: D,
    ) -> RebarResult<ExportReport> {
        let source = source.as_ref();
        let destination = destination.as_ref();

        ensure_writable(destination)?;
        fs::create_dir_all(destination)?;

        debug!("Exporting '{}' to '{}'", source.display(), destination.display());

        let plan = ExportPlan {
            exclusions: self.exclusions.compile(),
            substitutions: self.substitutions.compile()?,
            destination,
        };
        let vcs = vcs_globset()?;
        let mut report = ExportReport::default();

        let walker = WalkDir::new(source)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_vcs_entry(&vcs, source, entry));

        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_dir() || !entry.path().is_file() {
                continue;
            }
            let Some(relative_path) = relative_path(source, entry.path()) else {
                debug!("Skipping file with a non UTF-8 path: {}", entry.path().display());
                continue;
            };

            match plan.process(entry.path(), &relative_path)? {
                FileOperation::Skip => {
                    debug!("Skipping file {relative_path} excluded entirely");
                    report.skipped.push(relative_path);
                }
                FileOperation::Write { target, content } => {
                    debug!("Writing file: {}", target.display());
                    write_file(&target, &content)?;
                    report.written.push(relative_path);
                }
            }
        }

        Ok(report)
    }
}

struct ExportPlan<'a> {
    exclusions: CompiledExclusions<'a>,
    substitutions: CompiledSubstitutions<'a>,
    destination: &'a Path,
}

impl ExportPlan<'_> {
    fn process(&self, path: &Path, relative_path: &str) -> RebarResult<FileOperation> {
        let (sections, lines) = match self.exclusions.resolve(relative_path) {
            FileExclusion::Skip => return Ok(FileOperation::Skip),
            FileExclusion::Keep { sections, lines } => (sections, lines),
        };
        let content = run_pipeline(
            &self.substitutions,
            relative_path,
            fs::read(path)?,
            &sections,
            &lines,
        );
        Ok(FileOperation::Write { target: self.destination.join(relative_path), content })
    }
}

/// Region exclusion, then substitution, then marker stripping. Contents are
/// handled as raw bytes, so templates in any encoding go through unchanged
/// apart from the edits.
fn run_pipeline(
    substitutions: &CompiledSubstitutions<'_>,
    relative_path: &str,
    content: Vec<u8>,
    sections: &[&str],
    lines: &[LineRange],
) -> Vec<u8> {
    let content = exclude_regions(content, sections, lines);
    let content = substitutions.apply(relative_path, content);
    strip_template_tags(&content)
}

fn is_vcs_entry(vcs: &GlobSet, source: &Path, entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .path()
            .strip_prefix(source)
            .is_ok_and(|relative| vcs.is_match(relative))
}

/// Returns the `/`-separated path of `path` relative to `root`, or `None`
/// when `path` is outside `root` or has a component that is not UTF-8.
pub fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;

    let mut parts = Vec::new();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            parts.push(part.to_str()?);
        }
    }
    Some(parts.join("/"))
}

/// The directory `path` lives in, with `.` for bare names and the root as
/// its own parent.
fn containing_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => PathBuf::from("."),
        Some(parent) => parent.to_path_buf(),
        None => path.to_path_buf(),
    }
}

/// Checks that the directory two levels above `destination` exists and the
/// current user may write to it.
pub fn ensure_writable(destination: &Path) -> RebarResult<()> {
    let checked = containing_dir(&containing_dir(destination));
    if !checked.is_dir() || !checked.writable() {
        return Err(RebarError::PathNotWritable { path: checked.display().to_string() });
    }
    Ok(())
}

fn write_file(path: &Path, content: &[u8]) -> RebarResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).map_err(RebarError::IoError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_containing_dir() {
        assert_eq!(containing_dir(Path::new("out")), PathBuf::from("."));
        assert_eq!(containing_dir(Path::new(".")), PathBuf::from("."));
        assert_eq!(containing_dir(Path::new("a/b/out")), PathBuf::from("a/b"));
        assert_eq!(containing_dir(Path::new("/")), PathBuf::from("/"));
    }

    #[test]
    fn test_relative_path_uses_forward_slashes() {
        let root = Path::new("templates/package");
        let path = root.join("src").join("Helpers").join("DemoHelper.php");
        assert_eq!(relative_path(root, &path).unwrap(), "src/Helpers/DemoHelper.php");
        assert_eq!(relative_path(root, Path::new("elsewhere/a.php")), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_path_rejects_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let root = Path::new("templates");
        let path = root.join(OsStr::from_bytes(b"caf\xe9.php"));
        assert_eq!(relative_path(root, &path), None);
    }

    #[test]
    fn test_transform_runs_pipeline_in_order() {
        let mut exporter = FileExporter::new();
        exporter.set_exclusion("controller.php", Exclusion::sections(["composer"]));
        exporter.set_substitutions(
            Substitutions::new().global("handle", "'rebar'", "'demo'"),
        );

        let content = "<?php\n\
/* @section composer */\n\
use Composer\\Autoload;\n\
/* @endsection composer */\n\
/* @section service-providers */\n\
$handle = 'rebar';\n\
/* @endsection service-providers */\n";

        assert_eq!(
            exporter.transform("controller.php", content.as_bytes().to_vec()).unwrap(),
            b"<?php\n$handle = 'demo';\n"
        );
    }

    #[test]
    fn test_substitution_cannot_reintroduce_removed_sections() {
        let mut exporter = FileExporter::new();
        exporter.set_exclusion("a.php", Exclusion::sections(["x"]));
        exporter.set_substitutions(
            Substitutions::new().global("marker", "KEEP", "/* @section x */"),
        );
        assert_eq!(exporter.transform("a.php", b"KEEP\nbody".to_vec()).unwrap(), b"\nbody");
    }

    #[test]
    fn test_transform_leaves_skipped_content_alone() {
        let mut exporter = FileExporter::new();
        exporter.set_exclusion("a.php", Exclusion::Skip);
        exporter.set_substitutions(Substitutions::new().global("x", "a", "b"));
        let content = b"a /* @section x */".to_vec();
        assert_eq!(exporter.transform("a.php", content.clone()).unwrap(), content);
    }

    #[test]
    fn test_missing_directory_is_not_writable() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let destination = temp_dir.path().join("missing").join("packages").join("demo");
        assert!(matches!(
            ensure_writable(&destination),
            Err(RebarError::PathNotWritable { .. })
        ));
        assert!(ensure_writable(&temp_dir.path().join("packages").join("demo")).is_ok());
    }
}
