//! Timestamp-based staleness checks.
//!
//! An output is stale when it is missing or when an input's modification time
//! is strictly greater than the output's. Equal timestamps count as up to
//! date.

use std::io;
use std::path::Path;
use std::time::SystemTime;

use tracing::debug;

use crate::module::BuildError;
use crate::sources::SourceMapping;

/// Modification time of `path`, or `None` if it does not exist.
pub fn modified(path: &Path) -> Result<Option<SystemTime>, BuildError> {
  let metadata = match std::fs::metadata(path) {
    Ok(metadata) => metadata,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
    Err(source) => {
      return Err(BuildError::Io {
        path: path.to_path_buf(),
        source,
      });
    }
  };

  metadata.modified().map(Some).map_err(|source| BuildError::Io {
    path: path.to_path_buf(),
    source,
  })
}

/// Whether `output` must be rebuilt from `source`.
///
/// Fails with [`BuildError::MissingSource`] when `source` does not exist.
pub fn needs_rebuild(source: &Path, output: &Path) -> Result<bool, BuildError> {
  let Some(source_time) = modified(source)? else {
    return Err(BuildError::MissingSource {
      path: source.to_path_buf(),
    });
  };

  match modified(output)? {
    None => Ok(true),
    Some(output_time) => Ok(source_time > output_time),
  }
}

/// The `(source, object)` pairs of `mapping` that need compiling, in mapping
/// order. With `force` every pair is returned without touching the
/// filesystem.
pub fn stale_sources(mapping: &SourceMapping, force: bool) -> Result<Vec<(&Path, &Path)>, BuildError> {
  if force {
    return Ok(mapping.iter().collect());
  }

  let mut work = Vec::new();
  for (source, object) in mapping.iter() {
    if needs_rebuild(source, object)? {
      debug!(source = %source.display(), object = %object.display(), "source is stale");
      work.push((source, object));
    }
  }
  Ok(work)
}

/// Whether `target` must be relinked from `inputs`.
///
/// True when forced, when `target` is missing, or when any input is missing
/// or strictly newer than `target`.
pub fn needs_link(inputs: &[&Path], target: &Path, force: bool) -> Result<bool, BuildError> {
  if force {
    return Ok(true);
  }

  let Some(target_time) = modified(target)? else {
    debug!(target = %target.display(), "link target missing");
    return Ok(true);
  };

  for input in inputs {
    match modified(input)? {
      None => {
        debug!(input = %input.display(), "link input missing");
        return Ok(true);
      }
      Some(input_time) if input_time > target_time => {
        debug!(input = %input.display(), target = %target.display(), "link input is newer");
        return Ok(true);
      }
      Some(_) => {}
    }
  }

  Ok(false)
}
