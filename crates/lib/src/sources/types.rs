//! Source-to-object mapping types.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while discovering sources or building a mapping.
#[derive(Debug, Error)]
pub enum MappingError {
  /// The same source path appears twice.
  #[error("duplicate source in mapping: {0}")]
  DuplicateSource(PathBuf),

  /// Two sources would write the same object file.
  #[error("object {object} is produced by both {first} and {second}")]
  DuplicateObject {
    object: PathBuf,
    first: PathBuf,
    second: PathBuf,
  },

  /// The source directory could not be listed.
  #[error("failed to list {path}: {source}")]
  ReadDir {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },
}

/// Ordered association list from source file to object file.
///
/// Built once when a module is constructed and never mutated afterwards.
/// Iteration follows insertion order, which is also the compile order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMapping {
  entries: Vec<(PathBuf, PathBuf)>,
}

impl SourceMapping {
  /// Build a mapping from `(source, object)` pairs.
  ///
  /// Sources must be unique, and no two sources may share an object path.
  pub fn new<I, S, O>(pairs: I) -> Result<Self, MappingError>
  where
    I: IntoIterator<Item = (S, O)>,
    S: Into<PathBuf>,
    O: Into<PathBuf>,
  {
    let mut entries: Vec<(PathBuf, PathBuf)> = Vec::new();
    let mut seen_sources = HashSet::new();

    for (source, object) in pairs {
      let source = source.into();
      let object = object.into();

      if !seen_sources.insert(source.clone()) {
        return Err(MappingError::DuplicateSource(source));
      }

      if let Some((first, _)) = entries.iter().find(|(_, existing)| *existing == object) {
        return Err(MappingError::DuplicateObject {
          object,
          first: first.clone(),
          second: source,
        });
      }

      entries.push((source, object));
    }

    Ok(Self { entries })
  }

  pub fn iter(&self) -> impl Iterator<Item = (&Path, &Path)> {
    self.entries.iter().map(|(s, o)| (s.as_path(), o.as_path()))
  }

  pub fn sources(&self) -> impl Iterator<Item = &Path> {
    self.entries.iter().map(|(s, _)| s.as_path())
  }

  pub fn objects(&self) -> impl Iterator<Item = &Path> {
    self.entries.iter().map(|(_, o)| o.as_path())
  }

  /// Object path for `source`, if it is mapped.
  pub fn object_for(&self, source: &Path) -> Option<&Path> {
    self
      .entries
      .iter()
      .find(|(s, _)| s == source)
      .map(|(_, o)| o.as_path())
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}
