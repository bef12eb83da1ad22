//! Implementation of the `kiln build` command.
//!
//! Discovers sources, compiles the stale ones and relinks the target when
//! any object is newer than it.

use std::sync::Arc;

use anyhow::{Context, Result};

use kiln_lib::progress::{ConsoleProgress, Progress, SilentProgress};
use kiln_lib::{BuildDriver, BuildOptions, Toolchain};

use crate::cmd::project::ProjectArgs;
use crate::output::{OutputFormat, format_duration, print_json, print_stat, print_success};

/// Execute the build command.
///
/// Prints `[CC]`/`[LD]`/`[AR]` notices as work happens, then a summary.
/// In JSON mode the notices are suppressed and the report is printed instead.
pub fn cmd_build(project: &ProjectArgs, force: bool, toolchain: Toolchain, output: OutputFormat) -> Result<()> {
  project.prepare_dirs()?;
  let module = project.module(Arc::new(toolchain))?;

  let progress: &dyn Progress = if output.is_json() {
    &SilentProgress
  } else {
    &ConsoleProgress
  };
  let driver = BuildDriver::new(progress);

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = rt
    .block_on(driver.update(&module, &BuildOptions { force }))
    .with_context(|| format!("Build of {} failed", module.name()))?;

  if output.is_json() {
    print_json(&report)?;
  } else {
    println!();
    if report.stats.is_noop() {
      print_success(&format!("{} is up to date", report.module));
    } else {
      print_success("Build complete!");
      print_stat("Compiled", &report.stats.compiled.to_string());
      print_stat("Linked", &report.stats.linked.to_string());
      print_stat("Archived", &report.stats.archived.to_string());
    }
    print_stat("Duration", &format_duration(report.elapsed));
  }

  Ok(())
}
