//! Build driver.
//!
//! Entry point for running `update` or `clean` on a root module and turning
//! the outcome into a report.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{error, info};

use crate::module::{BuildError, BuildStats, Module};
use crate::progress::Progress;

/// Options for a build run.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
  /// Skip every staleness check and rebuild everything.
  pub force: bool,
}

/// Outcome of a successful update.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
  pub module: String,
  pub stats: BuildStats,
  pub elapsed: Duration,
}

/// Outcome of a successful clean.
#[derive(Debug, Clone, Serialize)]
pub struct CleanReport {
  pub module: String,
  pub removed: Vec<PathBuf>,
}

/// Runs updates and cleans against a module tree, sending notices to
/// `progress`.
pub struct BuildDriver<'a> {
  progress: &'a dyn Progress,
}

impl<'a> BuildDriver<'a> {
  pub fn new(progress: &'a dyn Progress) -> Self {
    Self { progress }
  }

  /// Update `root` and all of its dependencies.
  ///
  /// The first failure anywhere in the tree is returned as-is.
  pub async fn update(&self, root: &Module, options: &BuildOptions) -> Result<BuildReport, BuildError> {
    let start = Instant::now();
    info!(module = %root.name(), force = options.force, "starting build");

    let stats = match root.update(options.force, self.progress).await {
      Ok(stats) => stats,
      Err(e) => {
        error!(module = %root.name(), kind = e.kind(), error = %e, "build failed");
        return Err(e);
      }
    };

    let status = if stats.is_noop() { "Up to date" } else { "Done" };
    self.progress.status(root.name(), status);

    let elapsed = start.elapsed();
    info!(
      module = %root.name(),
      compiled = stats.compiled,
      linked = stats.linked,
      archived = stats.archived,
      elapsed_ms = elapsed.as_millis() as u64,
      "build complete"
    );

    Ok(BuildReport {
      module: root.name().to_string(),
      stats,
      elapsed,
    })
  }

  /// Remove every artifact of `root` and its dependencies.
  pub fn clean(&self, root: &Module) -> Result<CleanReport, BuildError> {
    let stats = root.clean().inspect_err(|e| {
      error!(module = %root.name(), error = %e, "clean failed");
    })?;

    self.progress.status(root.name(), "Cleaned");
    info!(module = %root.name(), removed = stats.removed.len(), "clean complete");

    Ok(CleanReport {
      module: root.name().to_string(),
      removed: stats.removed,
    })
  }
}
