//! Leaf modules: compile own sources, optionally link the result.

use std::sync::Arc;

use tracing::{debug, info};

use crate::artifact::Artifact;
use crate::progress::Progress;
use crate::sources::SourceMapping;
use crate::staleness::stale_sources;
use crate::toolchain::{Stage, Toolchain};

use super::types::{BuildError, BuildStats, CleanStats};
use super::{link_step, remove_artifact};

/// A module with its own sources and no module dependencies.
#[derive(Debug)]
pub struct LeafModule {
  name: String,
  toolchain: Arc<Toolchain>,
  mapping: SourceMapping,
  target: Option<Artifact>,
}

impl LeafModule {
  pub fn new(name: impl Into<String>, toolchain: Arc<Toolchain>, mapping: SourceMapping) -> Self {
    Self {
      name: name.into(),
      toolchain,
      mapping,
      target: None,
    }
  }

  /// Link or archive the compiled objects into `target`.
  pub fn with_target(mut self, target: Artifact) -> Self {
    self.target = Some(target);
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn mapping(&self) -> &SourceMapping {
    &self.mapping
  }

  pub fn target(&self) -> Option<&Artifact> {
    self.target.as_ref()
  }

  /// The terminal artifact if there is one, else one object per source.
  pub fn output(&self) -> Vec<Artifact> {
    match &self.target {
      Some(target) => vec![target.clone()],
      None => self.mapping.objects().map(Artifact::object).collect(),
    }
  }

  /// Compile stale sources in mapping order, then relink if needed.
  ///
  /// Stops at the first failing compile; later sources are not attempted and
  /// the link step is skipped.
  pub async fn update(&self, force: bool, progress: &dyn Progress) -> Result<BuildStats, BuildError> {
    let work = stale_sources(&self.mapping, force)?;
    info!(module = %self.name, stale = work.len(), total = self.mapping.len(), force, "updating module");

    let mut stats = BuildStats::default();

    for (source, object) in work {
      progress.stage(Stage::Compile, object);

      if let Err(source_err) = self.toolchain.compile(source, object).await {
        progress.status(&self.name, "Compilation failed");
        return Err(BuildError::ToolFailed {
          stage: Stage::Compile,
          target: object.to_path_buf(),
          source: source_err,
        });
      }

      stats.compiled += 1;
    }

    if let Some(target) = &self.target {
      let objects: Vec<Artifact> = self.mapping.objects().map(Artifact::object).collect();

      stats += link_step(&self.toolchain, &objects, target, force, progress)
        .await
        .inspect_err(|_| progress.status(&self.name, "Link failed"))?;
    }

    debug!(module = %self.name, ?stats, "module updated");
    Ok(stats)
  }

  /// Remove every object, then the terminal artifact.
  pub fn clean(&self) -> Result<CleanStats, BuildError> {
    let mut stats = CleanStats::default();

    for object in self.mapping.objects() {
      remove_artifact(object, &mut stats)?;
    }

    if let Some(target) = &self.target {
      remove_artifact(target.path(), &mut stats)?;
    }

    info!(module = %self.name, removed = stats.removed.len(), "cleaned module");
    Ok(stats)
  }
}
