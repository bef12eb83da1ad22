//! Turning command-line arguments into a module.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tracing::debug;

use kiln_lib::{Artifact, ArtifactKind, LeafModule, Module, Toolchain, default_map, find_files};

/// Kind of the linked artifact, as spelled on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TargetKind {
  /// Object file produced by a plain link of all objects
  Object,
  /// Static library, built with the archiver
  Static,
  /// Shared library, linked with `-shared`
  Shared,
  /// Executable program
  #[default]
  Exe,
}

impl From<TargetKind> for ArtifactKind {
  fn from(kind: TargetKind) -> Self {
    match kind {
      TargetKind::Object => ArtifactKind::Object,
      TargetKind::Static => ArtifactKind::StaticLib,
      TargetKind::Shared => ArtifactKind::SharedLib,
      TargetKind::Exe => ArtifactKind::Executable,
    }
  }
}

/// Where the sources are and what to produce from them.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
  /// Directory containing the sources (not searched recursively)
  #[arg(short, long, default_value = ".")]
  pub src: PathBuf,

  /// Source file extension
  #[arg(short, long, default_value = "c")]
  pub ext: String,

  /// Directory for object files (default: next to each source)
  #[arg(long)]
  pub obj_dir: Option<PathBuf>,

  /// Link or archive all objects into this file
  #[arg(short, long)]
  pub target: Option<PathBuf>,

  /// Kind of the target file
  #[arg(short, long, value_enum, default_value = "exe")]
  pub kind: TargetKind,

  /// Module name used in progress output (default: target or directory name)
  #[arg(long)]
  pub name: Option<String>,
}

impl ProjectArgs {
  pub fn module_name(&self) -> String {
    if let Some(name) = &self.name {
      return name.clone();
    }
    let from = self.target.as_deref().unwrap_or(&self.src);
    dir_or_file_name(from)
  }

  /// Discover sources and build the leaf module they describe.
  pub fn module(&self, toolchain: Arc<Toolchain>) -> Result<Module> {
    let sources = find_files(&self.ext, &self.src)
      .with_context(|| format!("Failed to list sources in {}", self.src.display()))?;

    let mapping = default_map(&sources, self.obj_dir.as_deref()).context("Failed to map sources to objects")?;
    debug!(src = %self.src.display(), sources = mapping.len(), "discovered sources");

    let mut module = LeafModule::new(self.module_name(), toolchain, mapping);
    if let Some(target) = &self.target {
      module = module.with_target(Artifact::new(target, self.kind.into()));
    }

    Ok(module.into())
  }

  /// Create the object directory and the target's parent directory.
  pub fn prepare_dirs(&self) -> Result<()> {
    if let Some(dir) = &self.obj_dir {
      std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    if let Some(parent) = self.target.as_deref().and_then(Path::parent)
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
  }
}

fn dir_or_file_name(path: &Path) -> String {
  let resolved = if path.file_name().is_none() {
    std::env::current_dir().map(|cwd| cwd.join(path)).unwrap_or_else(|_| path.to_path_buf())
  } else {
    path.to_path_buf()
  };

  resolved
    .canonicalize()
    .unwrap_or(resolved)
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_else(|| "build".to_string())
}
