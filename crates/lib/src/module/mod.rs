//! Build-graph modules.
//!
//! A [`Module`] is one node of the build graph. It can report the artifacts
//! it produces (`output`), bring them up to date (`update`) and delete them
//! (`clean`). There are exactly two kinds:
//! - [`LeafModule`]: compiles its own sources, optionally linking or
//!   archiving the objects into one terminal artifact
//! - [`CompositeModule`]: updates other modules, then links or archives their
//!   outputs into one terminal artifact

mod composite;
mod leaf;
mod types;

use std::io;
use std::path::Path;

use tracing::debug;

use crate::artifact::{Artifact, ArtifactKind};
use crate::progress::Progress;
use crate::staleness::needs_link;
use crate::toolchain::{Stage, Toolchain};

pub use composite::CompositeModule;
pub use leaf::LeafModule;
pub use types::{BuildError, BuildStats, CleanStats};

/// A node of the build graph.
#[derive(Debug)]
pub enum Module {
  Leaf(LeafModule),
  Composite(CompositeModule),
}

impl Module {
  pub fn name(&self) -> &str {
    match self {
      Module::Leaf(m) => m.name(),
      Module::Composite(m) => m.name(),
    }
  }

  /// Artifacts this module produces. Stable for the life of the module.
  pub fn output(&self) -> Vec<Artifact> {
    match self {
      Module::Leaf(m) => m.output(),
      Module::Composite(m) => m.output(),
    }
  }

  /// Bring this module's artifacts up to date.
  ///
  /// With `force` every staleness check is skipped. Returns the work done,
  /// or the first error, in which case nothing after the failing step ran.
  pub async fn update(&self, force: bool, progress: &dyn Progress) -> Result<BuildStats, BuildError> {
    match self {
      Module::Leaf(m) => m.update(force, progress).await,
      Module::Composite(m) => m.update(force, progress).await,
    }
  }

  /// Remove this module's artifacts. Files that are already gone are skipped.
  pub fn clean(&self) -> Result<CleanStats, BuildError> {
    match self {
      Module::Leaf(m) => m.clean(),
      Module::Composite(m) => m.clean(),
    }
  }
}

impl From<LeafModule> for Module {
  fn from(module: LeafModule) -> Self {
    Module::Leaf(module)
  }
}

impl From<CompositeModule> for Module {
  fn from(module: CompositeModule) -> Self {
    Module::Composite(module)
  }
}

/// Link or archive `inputs` into `target` if it is out of date.
///
/// Static libraries go through the archiver; every other kind goes through
/// the linker, with `-shared` for shared libraries. Executables are rejected
/// as inputs before anything else happens.
pub(crate) async fn link_step(
  toolchain: &Toolchain,
  inputs: &[Artifact],
  target: &Artifact,
  force: bool,
  progress: &dyn Progress,
) -> Result<BuildStats, BuildError> {
  if let Some(exe) = inputs.iter().find(|a| !a.kind.is_linkable()) {
    return Err(BuildError::InvalidLinkInput {
      path: exe.path.clone(),
      target: target.path.clone(),
    });
  }

  let paths: Vec<&Path> = inputs.iter().map(Artifact::path).collect();

  if !needs_link(&paths, target.path(), force)? {
    debug!(target = %target.path.display(), "link target up to date");
    return Ok(BuildStats::default());
  }

  let mut stats = BuildStats::default();

  let (stage, result) = match target.kind {
    ArtifactKind::StaticLib => {
      progress.stage(Stage::Archive, target.path());
      stats.archived = 1;
      (Stage::Archive, toolchain.archive(&paths, target.path()).await)
    }
    kind => {
      progress.stage(Stage::Link, target.path());
      stats.linked = 1;
      let shared = kind == ArtifactKind::SharedLib;
      (Stage::Link, toolchain.link(&paths, target.path(), shared).await)
    }
  };

  result.map_err(|source| BuildError::ToolFailed {
    stage,
    target: target.path.clone(),
    source,
  })?;

  Ok(stats)
}

/// Delete `path` if it exists, recording it in `stats`.
pub(crate) fn remove_artifact(path: &Path, stats: &mut CleanStats) -> Result<(), BuildError> {
  match std::fs::remove_file(path) {
    Ok(()) => {
      debug!(path = %path.display(), "removed artifact");
      stats.removed.push(path.to_path_buf());
      Ok(())
    }
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(source) => Err(BuildError::Io {
      path: path.to_path_buf(),
      source,
    }),
  }
}
