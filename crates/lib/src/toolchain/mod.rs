//! External toolchain invocation.
//!
//! Every operation spawns exactly one process and waits for it:
//! - compile: `<cc> <flags...> -c <src> -o <target>`
//! - link:    `<ld> <flags...> [-shared] <objects...> -o <target>`
//! - archive: `<ar> <flags...> <target> <objects...>`
//!
//! Exit status zero is success. Anything else, including a failure to
//! launch, comes back as a [`ToolError`] so the caller decides what to do.

mod types;

use std::ffi::OsString;
use std::path::Path;

use tokio::process::Command;
use tracing::{debug, warn};

pub use types::{ConfigError, Stage, Tool, ToolError, Toolchain, env};

/// Flag added to link commands producing a shared library.
pub const SHARED_FLAG: &str = "-shared";

impl Toolchain {
  /// Compile one source file into an object file.
  pub async fn compile(&self, source: &Path, target: &Path) -> Result<(), ToolError> {
    let args: Vec<OsString> = vec![
      "-c".into(),
      source.as_os_str().to_owned(),
      "-o".into(),
      target.as_os_str().to_owned(),
    ];
    run_tool(&self.cc, &args).await
  }

  /// Link `objects` into `target`, adding `-shared` when `shared` is set.
  pub async fn link(&self, objects: &[&Path], target: &Path, shared: bool) -> Result<(), ToolError> {
    let mut args: Vec<OsString> = Vec::with_capacity(objects.len() + 3);
    if shared {
      args.push(SHARED_FLAG.into());
    }
    args.extend(objects.iter().map(|o| o.as_os_str().to_owned()));
    args.push("-o".into());
    args.push(target.as_os_str().to_owned());
    run_tool(&self.ld, &args).await
  }

  /// Archive `objects` into the static library `target`.
  pub async fn archive(&self, objects: &[&Path], target: &Path) -> Result<(), ToolError> {
    let mut args: Vec<OsString> = Vec::with_capacity(objects.len() + 1);
    args.push(target.as_os_str().to_owned());
    args.extend(objects.iter().map(|o| o.as_os_str().to_owned()));
    run_tool(&self.ar, &args).await
  }
}

/// Run `tool` with `args` appended to its configured flags.
async fn run_tool(tool: &Tool, args: &[OsString]) -> Result<(), ToolError> {
  let display_args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
  let command_line = tool.command_line(&display_args);

  debug!(cmd = %command_line, "spawning process");

  let output = Command::new(&tool.exe)
    .args(&tool.flags)
    .args(args)
    .output()
    .await
    .map_err(|source| ToolError::Launch {
      exe: tool.exe.clone(),
      source,
    })?;

  let stdout = String::from_utf8_lossy(&output.stdout);
  let stderr = String::from_utf8_lossy(&output.stderr);

  if !stdout.trim().is_empty() {
    debug!(stdout = %stdout.trim(), "command stdout");
  }

  if !output.status.success() {
    warn!(
      cmd = %command_line,
      code = ?output.status.code(),
      stderr = %stderr.trim(),
      "command failed"
    );
    return Err(ToolError::Exit {
      command: command_line,
      code: output.status.code(),
      stderr: stderr.trim().to_string(),
    });
  }

  // Diagnostics from a successful run are compiler warnings; keep them visible.
  if !stderr.trim().is_empty() {
    warn!(cmd = %command_line, stderr = %stderr.trim(), "command stderr");
  }

  Ok(())
}

#[cfg(all(test, unix))]
mod tests {
  use super::*;
  use crate::util::testutil::{FakeToolchain, read_log};
  use tempfile::TempDir;
  use tracing_test::traced_test;

  #[tokio::test]
  async fn compile_passes_c_and_o() {
    let temp = TempDir::new().unwrap();
    let fake = FakeToolchain::new(temp.path());
    let src = temp.path().join("a.c");
    let obj = temp.path().join("a.o");
    std::fs::write(&src, "int a;").unwrap();

    fake.toolchain().compile(&src, &obj).await.unwrap();

    assert!(obj.exists());
    let log = read_log(&fake.log_path());
    assert_eq!(log, vec![format!("cc -c {} -o {}", src.display(), obj.display())]);
  }

  #[tokio::test]
  async fn link_appends_shared_before_objects() {
    let temp = TempDir::new().unwrap();
    let fake = FakeToolchain::new(temp.path());
    let a = temp.path().join("a.o");
    let b = temp.path().join("b.o");
    let target = temp.path().join("libx.so");

    fake.toolchain().link(&[&a, &b], &target, true).await.unwrap();

    let log = read_log(&fake.log_path());
    assert_eq!(
      log,
      vec![format!(
        "ld -shared {} {} -o {}",
        a.display(),
        b.display(),
        target.display()
      )]
    );
    assert!(target.exists());
  }

  #[tokio::test]
  async fn link_without_shared_flag() {
    let temp = TempDir::new().unwrap();
    let fake = FakeToolchain::new(temp.path());
    let a = temp.path().join("a.o");
    let target = temp.path().join("prog");

    fake.toolchain().link(&[&a], &target, false).await.unwrap();

    let log = read_log(&fake.log_path());
    assert_eq!(log, vec![format!("ld {} -o {}", a.display(), target.display())]);
  }

  #[tokio::test]
  async fn archive_puts_target_first() {
    let temp = TempDir::new().unwrap();
    let fake = FakeToolchain::new(temp.path());
    let a = temp.path().join("a.o");
    let target = temp.path().join("libx.a");

    fake.toolchain().archive(&[&a], &target).await.unwrap();

    let log = read_log(&fake.log_path());
    assert_eq!(log, vec![format!("ar {} {}", target.display(), a.display())]);
    assert!(target.exists());
  }

  #[tokio::test]
  async fn nonzero_exit_is_reported() {
    let temp = TempDir::new().unwrap();
    let fake = FakeToolchain::new(temp.path());
    let src = temp.path().join("bad.c");
    std::fs::write(&src, "FAIL").unwrap();

    let err = fake
      .toolchain()
      .compile(&src, &temp.path().join("bad.o"))
      .await
      .unwrap_err();

    match err {
      ToolError::Exit { code, stderr, .. } => {
        assert_eq!(code, Some(1));
        assert!(stderr.contains("bad.c"));
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[tokio::test]
  #[traced_test]
  async fn warnings_from_successful_run_are_logged_at_warn() {
    let temp = TempDir::new().unwrap();
    let fake = FakeToolchain::new(temp.path());
    let src = temp.path().join("noisy.c");
    let obj = temp.path().join("noisy.o");
    std::fs::write(&src, "WARN").unwrap();

    fake.toolchain().compile(&src, &obj).await.unwrap();

    assert!(obj.exists());
    logs_assert(|lines: &[&str]| {
      if lines.iter().any(|l| l.contains("WARN") && l.contains("unused variable")) {
        Ok(())
      } else {
        Err("compiler warning was not logged at warn level".to_string())
      }
    });
  }

  #[tokio::test]
  async fn missing_executable_is_launch_error() {
    let temp = TempDir::new().unwrap();
    let tc = Toolchain::new(
      Tool::new(temp.path().join("no-such-cc").to_string_lossy(), Vec::new()),
      Tool::new("unused", Vec::new()),
      Tool::new("unused", Vec::new()),
    );

    let err = tc
      .compile(&temp.path().join("a.c"), &temp.path().join("a.o"))
      .await
      .unwrap_err();

    assert!(matches!(err, ToolError::Launch { .. }));
  }

  #[tokio::test]
  async fn configured_flags_come_first() {
    let temp = TempDir::new().unwrap();
    let fake = FakeToolchain::new(temp.path());
    let mut tc = fake.toolchain();
    tc.cc.flags.extend(["-O2".to_string(), "-Wall".to_string()]);
    let src = temp.path().join("a.c");
    let obj = temp.path().join("a.o");
    std::fs::write(&src, "").unwrap();

    tc.compile(&src, &obj).await.unwrap();

    let log = read_log(&fake.log_path());
    assert_eq!(
      log,
      vec![format!("cc -O2 -Wall -c {} -o {}", src.display(), obj.display())]
    );
  }
}
