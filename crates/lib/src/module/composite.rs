//! Composite modules: link the outputs of other modules.

use std::sync::Arc;

use tracing::{error, info};

use crate::artifact::Artifact;
use crate::progress::Progress;
use crate::toolchain::Toolchain;

use super::types::{BuildError, BuildStats, CleanStats};
use super::{Module, link_step, remove_artifact};

/// A module whose output is built purely from other modules' outputs.
#[derive(Debug)]
pub struct CompositeModule {
  name: String,
  toolchain: Arc<Toolchain>,
  dependencies: Vec<Module>,
  target: Artifact,
}

impl CompositeModule {
  pub fn new(name: impl Into<String>, toolchain: Arc<Toolchain>, dependencies: Vec<Module>, target: Artifact) -> Self {
    Self {
      name: name.into(),
      toolchain,
      dependencies,
      target,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn dependencies(&self) -> &[Module] {
    &self.dependencies
  }

  pub fn target(&self) -> &Artifact {
    &self.target
  }

  pub fn output(&self) -> Vec<Artifact> {
    vec![self.target.clone()]
  }

  /// Update every dependency in order, then link their outputs.
  ///
  /// The first failing dependency ends the walk: later dependencies are not
  /// updated and the link step is not attempted.
  pub async fn update(&self, force: bool, progress: &dyn Progress) -> Result<BuildStats, BuildError> {
    progress.status(&self.name, "Processing");
    info!(module = %self.name, dependencies = self.dependencies.len(), force, "updating composite module");

    let mut stats = BuildStats::default();

    for dependency in &self.dependencies {
      match Box::pin(dependency.update(force, progress)).await {
        Ok(dep_stats) => stats += dep_stats,
        Err(e) => {
          error!(module = %self.name, dependency = %dependency.name(), error = %e, "dependency failed");
          progress.status(&self.name, "Build failed");
          return Err(e);
        }
      }
    }

    let inputs: Vec<Artifact> = self.dependencies.iter().flat_map(Module::output).collect();

    stats += link_step(&self.toolchain, &inputs, &self.target, force, progress)
      .await
      .inspect_err(|_| progress.status(&self.name, "Link failed"))?;

    Ok(stats)
  }

  /// Clean every dependency in order, then remove the terminal artifact.
  pub fn clean(&self) -> Result<CleanStats, BuildError> {
    let mut stats = CleanStats::default();

    for dependency in &self.dependencies {
      stats += dependency.clean()?;
    }

    remove_artifact(self.target.path(), &mut stats)?;

    info!(module = %self.name, removed = stats.removed.len(), "cleaned composite module");
    Ok(stats)
  }
}
