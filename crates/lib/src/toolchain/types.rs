//! Toolchain configuration and error types.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variables read by [`Toolchain::from_env`].
pub mod env {
  pub const CC: &str = "KILN_CC";
  pub const CFLAGS: &str = "KILN_CFLAGS";
  pub const LD: &str = "KILN_LD";
  pub const LDFLAGS: &str = "KILN_LDFLAGS";
  pub const AR: &str = "KILN_AR";
  pub const ARFLAGS: &str = "KILN_ARFLAGS";
}

/// The three toolchain operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
  Compile,
  Link,
  Archive,
}

impl Stage {
  /// Short tag used in progress notices.
  pub fn tag(self) -> &'static str {
    match self {
      Stage::Compile => "CC",
      Stage::Link => "LD",
      Stage::Archive => "AR",
    }
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Stage::Compile => write!(f, "compile"),
      Stage::Link => write!(f, "link"),
      Stage::Archive => write!(f, "archive"),
    }
  }
}

/// Failure of one external tool invocation.
#[derive(Debug, Error)]
pub enum ToolError {
  /// The executable could not be started at all.
  #[error("failed to launch {exe}: {source}")]
  Launch {
    exe: String,
    #[source]
    source: std::io::Error,
  },

  /// The process ran and exited unsuccessfully. `code` is `None` when it was
  /// killed by a signal.
  #[error("command exited with code {code:?}: {command}")]
  Exit {
    command: String,
    code: Option<i32>,
    stderr: String,
  },
}

/// Errors loading a toolchain description from disk.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read toolchain file {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid toolchain file {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

/// One external executable plus the flags passed on every invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
  pub exe: String,
  #[serde(default)]
  pub flags: Vec<String>,
}

impl Tool {
  pub fn new(exe: impl Into<String>, flags: Vec<String>) -> Self {
    Self { exe: exe.into(), flags }
  }

  /// Render `exe flags... args...` as a single display string.
  pub fn command_line<S: AsRef<str>>(&self, args: &[S]) -> String {
    let mut parts = Vec::with_capacity(1 + self.flags.len() + args.len());
    parts.push(self.exe.as_str());
    parts.extend(self.flags.iter().map(String::as_str));
    parts.extend(args.iter().map(AsRef::as_ref));
    parts.join(" ")
  }
}

/// Compiler, linker and archiver configuration.
///
/// Immutable once built. The operations themselves live in the parent module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toolchain {
  pub cc: Tool,
  pub ld: Tool,
  pub ar: Tool,
}

impl Default for Toolchain {
  fn default() -> Self {
    Self {
      cc: Tool::new("cc", Vec::new()),
      ld: Tool::new("cc", Vec::new()),
      ar: Tool::new("ar", vec!["rcs".to_string()]),
    }
  }
}

impl Toolchain {
  pub fn new(cc: Tool, ld: Tool, ar: Tool) -> Self {
    Self { cc, ld, ar }
  }

  /// Build a toolchain from `KILN_*` environment variables.
  ///
  /// Unset variables fall back to [`Toolchain::default`]. Flag variables are
  /// split on whitespace; an empty flag variable clears the default flags.
  pub fn from_env() -> Self {
    let defaults = Self::default();
    Self {
      cc: tool_from_env(env::CC, env::CFLAGS, defaults.cc),
      ld: tool_from_env(env::LD, env::LDFLAGS, defaults.ld),
      ar: tool_from_env(env::AR, env::ARFLAGS, defaults.ar),
    }
  }

  /// Load a toolchain from a JSON file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// The configured tool for a stage.
  pub fn tool(&self, stage: Stage) -> &Tool {
    match stage {
      Stage::Compile => &self.cc,
      Stage::Link => &self.ld,
      Stage::Archive => &self.ar,
    }
  }
}

fn tool_from_env(exe_var: &str, flags_var: &str, default: Tool) -> Tool {
  let exe = std::env::var(exe_var)
    .ok()
    .filter(|v| !v.trim().is_empty())
    .unwrap_or(default.exe);
  let flags = match std::env::var(flags_var) {
    Ok(value) => value.split_whitespace().map(str::to_string).collect(),
    Err(_) => default.flags,
  };
  Tool { exe, flags }
}
