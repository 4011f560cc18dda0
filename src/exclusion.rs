//! Exclusion tables: which template files are skipped and which tagged
//! sections or line ranges are cut out of the ones that are exported.

use crate::ignore::PathPattern;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A 1-indexed `(start_line, line_count)` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange(pub usize, pub usize);

impl LineRange {
    pub fn start(&self) -> usize {
        self.0
    }

    pub fn count(&self) -> usize {
        self.1
    }
}

/// One thing to cut out of an exported file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Removal {
    /// A `/* @section <name> */` region.
    Section(String),
    /// A range of lines in the template as it is on disk.
    Lines(LineRange),
}

/// An exclusion table value.
///
/// In recipe files `true` means [`Exclusion::Skip`], a list means
/// [`Exclusion::Remove`] and `false` removes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawExclusion", into = "RawExclusion")]
pub enum Exclusion {
    /// The file is not exported at all.
    Skip,
    Remove(Vec<Removal>),
}

impl Exclusion {
    /// Builds a section removal list from tag names.
    pub fn sections<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Exclusion::Remove(names.into_iter().map(|n| Removal::Section(n.into())).collect())
    }

    /// Builds a line removal list from `(start_line, line_count)` pairs.
    pub fn lines<I: IntoIterator<Item = (usize, usize)>>(ranges: I) -> Self {
        Exclusion::Remove(
            ranges.into_iter().map(|(start, count)| Removal::Lines(LineRange(start, count))).collect(),
        )
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawExclusion {
    Flag(bool),
    List(Vec<Removal>),
}

impl From<RawExclusion> for Exclusion {
    fn from(raw: RawExclusion) -> Self {
        match raw {
            RawExclusion::Flag(true) => Exclusion::Skip,
            RawExclusion::Flag(false) => Exclusion::Remove(Vec::new()),
            RawExclusion::List(list) => Exclusion::Remove(list),
        }
    }
}

impl From<Exclusion> for RawExclusion {
    fn from(exclusion: Exclusion) -> Self {
        match exclusion {
            Exclusion::Skip => RawExclusion::Flag(true),
            Exclusion::Remove(list) => RawExclusion::List(list),
        }
    }
}

/// Ordered exclusion table keyed by relative path or path glob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Exclusions(IndexMap<String, Exclusion>);

impl Exclusions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts one entry.
    ///
    /// A skip always replaces what is stored. A removal list is appended to
    /// an existing list for the same key, otherwise it is stored as is.
    pub fn set<K: Into<String>>(&mut self, key: K, exclusion: Exclusion) {
        let key = key.into();
        match exclusion {
            Exclusion::Remove(more) => match self.0.get_mut(&key) {
                Some(Exclusion::Remove(existing)) => existing.extend(more),
                _ => {
                    self.0.insert(key, Exclusion::Remove(more));
                }
            },
            Exclusion::Skip => {
                self.0.insert(key, Exclusion::Skip);
            }
        }
    }

    /// Chaining form of [`Exclusions::set`].
    pub fn with<K: Into<String>>(mut self, key: K, exclusion: Exclusion) -> Self {
        self.set(key, exclusion);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Exclusion> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Exclusion)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compiles the path keys once for a whole export.
    pub fn compile(&self) -> CompiledExclusions<'_> {
        let entries = self
            .0
            .iter()
            .map(|(key, exclusion)| (PathPattern::new(key), exclusion))
            .collect();
        CompiledExclusions { entries }
    }
}

/// What happens to a single file during an export.
#[derive(Debug, PartialEq, Eq)]
pub enum FileExclusion<'a> {
    Skip,
    Keep {
        sections: Vec<&'a str>,
        lines: Vec<LineRange>,
    },
}

/// An exclusion table with its path keys compiled to matchers.
pub struct CompiledExclusions<'a> {
    entries: Vec<(PathPattern, &'a Exclusion)>,
}

impl<'a> CompiledExclusions<'a> {
    /// Resolves every entry governing `relative_path`.
    ///
    /// Any matching skip wins. Otherwise the removal lists of all matching
    /// entries are combined in table order.
    pub fn resolve(&self, relative_path: &str) -> FileExclusion<'a> {
        let mut sections = Vec::new();
        let mut lines = Vec::new();
        for (pattern, exclusion) in &self.entries {
            if !pattern.is_match(relative_path) {
                continue;
            }
            match *exclusion {
                Exclusion::Skip => return FileExclusion::Skip,
                Exclusion::Remove(removals) => {
                    for removal in removals.iter() {
                        match removal {
                            Removal::Section(name) => sections.push(name.as_str()),
                            Removal::Lines(range) => lines.push(*range),
                        }
                    }
                }
            }
        }
        FileExclusion::Keep { sections, lines }
    }
}
