//! Literal search/replace tables applied to exported file contents.

use crate::error::{RebarError, RebarResult};
use crate::ignore::PathPattern;
use indexmap::IndexMap;
use regex::bytes::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

/// A `(search, replace)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement(pub String, pub String);

impl Replacement {
    pub fn new<S: Into<String>, R: Into<String>>(search: S, replace: R) -> Self {
        Self(search.into(), replace.into())
    }

    pub fn search(&self) -> &str {
        &self.0
    }

    pub fn replace(&self) -> &str {
        &self.1
    }

    /// Compiles the search text to a literal byte matcher. An empty search
    /// text compiles to nothing and leaves content unchanged.
    fn compile(&self) -> RebarResult<Option<CompiledPair<'_>>> {
        if self.0.is_empty() {
            return Ok(None);
        }
        let finder = Regex::new(&regex::escape(&self.0)).map_err(|e| {
            RebarError::ConfigError(format!("substitution '{}' failed: {e}", self.0))
        })?;
        Ok(Some(CompiledPair { finder, replace: self.1.as_bytes() }))
    }
}

struct CompiledPair<'a> {
    finder: Regex,
    replace: &'a [u8],
}

impl CompiledPair<'_> {
    fn apply(&self, content: Vec<u8>) -> Vec<u8> {
        if !self.finder.is_match(&content) {
            return content;
        }
        self.finder.replace_all(&content, NoExpand(self.replace)).into_owned()
    }
}

fn compile_pairs(pairs: &[Replacement]) -> RebarResult<Vec<CompiledPair<'_>>> {
    let mut compiled = Vec::with_capacity(pairs.len());
    for pair in pairs {
        compiled.extend(pair.compile()?);
    }
    Ok(compiled)
}

/// A substitution table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Substitution {
    /// Applied to every file; the table key is only a name.
    Global(Replacement),
    /// Applied, in order, to files whose relative path matches the table key.
    Scoped(Vec<Replacement>),
}

/// Ordered substitution table.
///
/// Entries are applied in insertion order, so the replacement text of one
/// entry can be matched by a later one. Inserting an existing key replaces
/// its value without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Substitutions(IndexMap<String, Substitution>);

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K: Into<String>>(&mut self, key: K, substitution: Substitution) {
        self.0.insert(key.into(), substitution);
    }

    /// Adds a global pair under `name`.
    pub fn global<K, S, R>(mut self, name: K, search: S, replace: R) -> Self
    where
        K: Into<String>,
        S: Into<String>,
        R: Into<String>,
    {
        self.insert(name, Substitution::Global(Replacement::new(search, replace)));
        self
    }

    /// Adds pairs that only apply to files matching `pattern`.
    pub fn scoped<K: Into<String>>(mut self, pattern: K, pairs: Vec<Replacement>) -> Self {
        self.insert(pattern, Substitution::Scoped(pairs));
        self
    }

    /// Merges `other` into this table: existing keys are overwritten in
    /// place, new keys are appended.
    pub fn merge(&mut self, other: Substitutions) {
        for (key, substitution) in other.0 {
            self.0.insert(key, substitution);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Substitution> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Substitution)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compiles the search texts and scoped keys once for a whole export.
    pub fn compile(&self) -> RebarResult<CompiledSubstitutions<'_>> {
        let mut entries = Vec::with_capacity(self.0.len());
        for (key, substitution) in &self.0 {
            let entry = match substitution {
                Substitution::Global(pair) => {
                    CompiledEntry::Global(compile_pairs(std::slice::from_ref(pair))?)
                }
                Substitution::Scoped(pairs) => {
                    CompiledEntry::Scoped(PathPattern::new(key), compile_pairs(pairs)?)
                }
            };
            entries.push(entry);
        }
        Ok(CompiledSubstitutions { entries })
    }
}

enum CompiledEntry<'a> {
    Global(Vec<CompiledPair<'a>>),
    Scoped(PathPattern, Vec<CompiledPair<'a>>),
}

/// A substitution table with its path keys compiled to matchers.
pub struct CompiledSubstitutions<'a> {
    entries: Vec<CompiledEntry<'a>>,
}

impl CompiledSubstitutions<'_> {
    /// Applies every entry relevant to `relative_path`, in table order.
    pub fn apply(&self, relative_path: &str, mut content: Vec<u8>) -> Vec<u8> {
        for entry in &self.entries {
            let pairs = match entry {
                CompiledEntry::Global(pairs) => pairs,
                CompiledEntry::Scoped(pattern, pairs) if pattern.is_match(relative_path) => pairs,
                CompiledEntry::Scoped(..) => continue,
            };
            for pair in pairs {
                content = pair.apply(content);
            }
        }
        content
    }
}
