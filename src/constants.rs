//! Common constants used throughout rebar.

/// Supported recipe file names, looked up inside a template directory
pub const RECIPE_FILES: [&str; 3] = ["rebar.json", "rebar.yml", "rebar.yaml"];

/// Version control metadata directories that are never exported
pub const VCS_DIRECTORIES: [&str; 8] =
    [".git", ".svn", ".hg", "CVS", "_darcs", ".arch-params", ".monotone", ".bzr"];

/// Boilerplate directory names under the templates root
pub const PACKAGE_BOILERPLATE: &str = "package-boilerplate";
pub const THEME_BOILERPLATE: &str = "theme-boilerplate";
pub const BLOCK_BOILERPLATE: &str = "block-boilerplate";
