//! Progress notices.
//!
//! Two kinds of one-line notices are emitted while building:
//! - `[CC] a.o`, `[LD] prog`, `[AR] libx.a` before each toolchain step
//! - `app: Processing`, `app: Build failed` for module-level status
//!
//! They are meant for humans; nothing parses them.

use std::path::Path;

use crate::artifact::basename;
use crate::toolchain::Stage;

/// Sink for progress notices.
pub trait Progress {
  /// Called right before a toolchain step producing `target`.
  fn stage(&self, stage: Stage, target: &Path);

  /// Called on module-level status changes.
  fn status(&self, module: &str, status: &str);
}

/// Format a stage notice: `[CC] a.o`.
pub fn stage_line(stage: Stage, target: &Path) -> String {
  format!("[{}] {}", stage.tag(), basename(target))
}

/// Format a module status notice: `app: Processing`.
pub fn status_line(module: &str, status: &str) -> String {
  format!("{}: {}", module, status)
}

/// Prints notices to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleProgress;

impl Progress for ConsoleProgress {
  fn stage(&self, stage: Stage, target: &Path) {
    println!("{}", stage_line(stage, target));
  }

  fn status(&self, module: &str, status: &str) {
    println!("{}", status_line(module, status));
  }
}

/// Discards all notices.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl Progress for SilentProgress {
  fn stage(&self, _stage: Stage, _target: &Path) {}

  fn status(&self, _module: &str, _status: &str) {}
}
