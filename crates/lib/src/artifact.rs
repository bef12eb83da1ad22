//! Build artifacts.
//!
//! An [`Artifact`] names a file produced by a build step together with its
//! [`ArtifactKind`]. The kind decides how the file may be consumed downstream.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// What kind of file a build step produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
  /// A compiled object file (`.o`).
  Object,
  /// An archive of objects (`.a`), produced by the archiver.
  StaticLib,
  /// A shared library, produced by the linker with `-shared`.
  SharedLib,
  /// A linked program. Never valid as link input.
  Executable,
}

impl ArtifactKind {
  pub fn as_str(self) -> &'static str {
    match self {
      ArtifactKind::Object => "object",
      ArtifactKind::StaticLib => "static_lib",
      ArtifactKind::SharedLib => "shared_lib",
      ArtifactKind::Executable => "executable",
    }
  }

  /// Whether an artifact of this kind may be passed to a link or archive step.
  pub fn is_linkable(self) -> bool {
    !matches!(self, ArtifactKind::Executable)
  }
}

impl fmt::Display for ArtifactKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A file produced by a build step.
///
/// Artifacts are plain descriptions: a rebuild overwrites the file at `path`
/// but never changes the artifact itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Artifact {
  pub path: PathBuf,
  pub kind: ArtifactKind,
}

impl Artifact {
  pub fn new(path: impl Into<PathBuf>, kind: ArtifactKind) -> Self {
    Self {
      path: path.into(),
      kind,
    }
  }

  pub fn object(path: impl Into<PathBuf>) -> Self {
    Self::new(path, ArtifactKind::Object)
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// File name used in progress notices (`[LD] prog`).
  pub fn basename(&self) -> String {
    basename(&self.path)
  }
}

/// Last path component as a lossy string, or the whole path if it has none.
pub(crate) fn basename(path: &Path) -> String {
  path
    .file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
