//! Source discovery.
//!
//! Thin filesystem helpers for turning a directory of sources into a
//! [`SourceMapping`]:
//! - `find_files()`: list the files in one directory with a given extension
//! - `default_map()`: derive object paths for those files, in place or into
//!   a separate object directory

mod types;

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

pub use types::{MappingError, SourceMapping};

/// Extension given to derived object files.
pub const OBJECT_EXTENSION: &str = "o";

/// List the regular files directly inside `dir` whose name ends in `.ext`.
///
/// The leading dot on `ext` is optional. Subdirectories are not searched and
/// hidden files are skipped. Results are sorted so the mapping order, and
/// with it the compile order, is stable between runs.
pub fn find_files(ext: &str, dir: &Path) -> Result<Vec<PathBuf>, MappingError> {
  let suffix = if ext.starts_with('.') {
    ext.to_string()
  } else {
    format!(".{}", ext)
  };

  let mut found = Vec::new();

  for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
    let entry = entry.map_err(|source| MappingError::ReadDir {
      path: dir.to_path_buf(),
      source,
    })?;

    if !entry.file_type().is_file() {
      continue;
    }

    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') || !name.ends_with(&suffix) {
      continue;
    }

    found.push(entry.into_path());
  }

  found.sort();
  debug!(dir = %dir.display(), ext = %suffix, count = found.len(), "found sources");
  Ok(found)
}

/// Derive a [`SourceMapping`] for `sources`.
///
/// Without `out_dir` every object sits next to its source (`src/a.c` →
/// `src/a.o`). With `out_dir` every object goes into that directory under the
/// source's file stem (`src/a.c` → `build/a.o`), so two sources with the same
/// stem collide and are rejected.
pub fn default_map(sources: &[PathBuf], out_dir: Option<&Path>) -> Result<SourceMapping, MappingError> {
  let pairs = sources.iter().map(|source| {
    let object = match out_dir {
      None => source.with_extension(OBJECT_EXTENSION),
      Some(dir) => {
        let mut name = source.file_stem().unwrap_or(source.as_os_str()).to_os_string();
        name.push(".");
        name.push(OBJECT_EXTENSION);
        dir.join(name)
      }
    };
    (source.clone(), object)
  });

  SourceMapping::new(pairs)
}
