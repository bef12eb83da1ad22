//! Error and result types for module updates.

use std::io;
use std::ops::AddAssign;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::toolchain::{Stage, ToolError};

/// Errors that stop a module update or clean.
///
/// Every variant is terminal for the current invocation. Nothing is retried
/// and nothing already built is rolled back.
#[derive(Debug, Error)]
pub enum BuildError {
  /// A declared source does not exist.
  #[error("source file not found: {}", path.display())]
  MissingSource { path: PathBuf },

  /// The compiler, linker or archiver failed or could not be launched.
  #[error("{stage} failed for {}: {source}", target.display())]
  ToolFailed {
    stage: Stage,
    target: PathBuf,
    #[source]
    source: ToolError,
  },

  /// An executable was handed to a link or archive step.
  #[error("cannot link executable {} into {}", path.display(), target.display())]
  InvalidLinkInput { path: PathBuf, target: PathBuf },

  /// Reading metadata or removing an artifact failed.
  #[error("io error on {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

impl BuildError {
  /// Short machine-friendly name of the failure class.
  pub fn kind(&self) -> &'static str {
    match self {
      BuildError::MissingSource { .. } => "missing_source",
      BuildError::ToolFailed { .. } => "tool_failed",
      BuildError::InvalidLinkInput { .. } => "invalid_link_input",
      BuildError::Io { .. } => "io",
    }
  }
}

/// Work performed by an update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
  pub compiled: usize,
  pub linked: usize,
  pub archived: usize,
}

impl BuildStats {
  /// True when the update found everything up to date.
  pub fn is_noop(&self) -> bool {
    self.compiled == 0 && self.linked == 0 && self.archived == 0
  }
}

impl AddAssign for BuildStats {
  fn add_assign(&mut self, other: Self) {
    self.compiled += other.compiled;
    self.linked += other.linked;
    self.archived += other.archived;
  }
}

/// Files removed by a clean.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanStats {
  pub removed: Vec<PathBuf>,
}

impl AddAssign for CleanStats {
  fn add_assign(&mut self, other: Self) {
    self.removed.extend(other.removed);
  }
}
