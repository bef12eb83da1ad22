//! Implementation of the `kiln clean` command.

use std::sync::Arc;

use anyhow::{Context, Result};

use kiln_lib::progress::{ConsoleProgress, Progress, SilentProgress};
use kiln_lib::{BuildDriver, Toolchain};

use crate::cmd::project::ProjectArgs;
use crate::output::{OutputFormat, print_info, print_json, print_stat, print_success};

/// Execute the clean command.
///
/// Removes every object file and the target. Files that do not exist are
/// skipped, so running it twice is harmless.
pub fn cmd_clean(project: &ProjectArgs, toolchain: Toolchain, output: OutputFormat) -> Result<()> {
  let module = project.module(Arc::new(toolchain))?;

  let progress: &dyn Progress = if output.is_json() {
    &SilentProgress
  } else {
    &ConsoleProgress
  };
  let driver = BuildDriver::new(progress);

  let report = driver
    .clean(&module)
    .with_context(|| format!("Clean of {} failed", module.name()))?;

  if output.is_json() {
    print_json(&report)?;
  } else if report.removed.is_empty() {
    print_info("Nothing to clean.");
  } else {
    print_success("Clean complete!");
    print_stat("Removed", &report.removed.len().to_string());
  }

  Ok(())
}
