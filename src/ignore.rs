//! Path pattern handling for template exports.
//! Builds the set of always-ignored version control paths and compiles the
//! path keys of substitution and exclusion tables into glob matchers.

use crate::constants::VCS_DIRECTORIES;
use crate::error::{RebarError, RebarResult};
use globset::{Glob, GlobMatcher, GlobSet, GlobSetBuilder};
use log::debug;

/// Builds the set of version control paths that are never exported.
///
/// Each entry of [`VCS_DIRECTORIES`] matches both at the template root and
/// at any depth, so `.git` and `vendor/lib/.git` are ignored alike.
///
/// # Returns
/// * `RebarResult<GlobSet>` - Set of compiled glob patterns for path matching
pub fn vcs_globset() -> RebarResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for name in VCS_DIRECTORIES {
        for pattern in [name.to_string(), format!("**/{name}")] {
            builder.add(Glob::new(&pattern).map_err(|e| {
                RebarError::ConfigError(format!("ignore pattern '{pattern}' failed: {e}"))
            })?);
        }
    }
    builder
        .build()
        .map_err(|e| RebarError::ConfigError(format!("ignore patterns loading failed: {e}")))
}

/// A table key compiled for matching relative file paths.
///
/// A path matches when it equals the key or when the key, read as a glob,
/// matches it. `*` crosses directory separators.
#[derive(Debug, Clone)]
pub struct PathPattern {
    key: String,
    glob: Option<GlobMatcher>,
}

impl PathPattern {
    /// Compiles a table key. Keys that are not valid globs only match
    /// exactly.
    pub fn new(key: &str) -> Self {
        let glob = match Glob::new(key) {
            Ok(glob) => Some(glob.compile_matcher()),
            Err(e) => {
                debug!("Key '{key}' is not a valid glob, matching exactly: {e}");
                None
            }
        };
        Self { key: key.to_string(), glob }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_match(&self, relative_path: &str) -> bool {
        self.key == relative_path
            || self.glob.as_ref().is_some_and(|glob| glob.is_match(relative_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vcs_globset_matches_at_any_depth() {
        let set = vcs_globset().unwrap();
        assert!(set.is_match(".git"));
        assert!(set.is_match("vendor/lib/.svn"));
        assert!(set.is_match("CVS"));
        assert!(!set.is_match(".gitignore"));
        assert!(!set.is_match("src/controller.php"));
    }

    #[test]
    fn test_path_pattern_exact_and_glob() {
        let exact = PathPattern::new("controller.php");
        assert!(exact.is_match("controller.php"));
        assert!(!exact.is_match("other.php"));

        let glob = PathPattern::new("src/*.php");
        assert!(glob.is_match("src/Helpers/DemoHelper.php"));
        assert!(!glob.is_match("controller.php"));
    }

    #[test]
    fn test_invalid_glob_matches_exactly() {
        let pattern = PathPattern::new("weird[name.php");
        assert!(pattern.is_match("weird[name.php"));
        assert!(!pattern.is_match("weirdn.php"));
    }
}
