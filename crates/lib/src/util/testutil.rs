//! Test utilities for kiln-lib.
//!
//! Provides a fake compiler/linker/archiver written in POSIX sh (unix only),
//! a recording progress sink and helpers for pinning file modification times.

use std::fs::File;
use std::path::Path;
#[cfg(unix)]
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::SystemTime;

use crate::progress::{Progress, stage_line, status_line};
use crate::toolchain::Stage;
#[cfg(unix)]
use crate::toolchain::{Tool, Toolchain};

#[cfg(unix)]
const FAKE_CC: &str = r#"
echo "cc $*" >> "$KILN_FAKE_LOG"
[ -e "$KILN_FAKE_DIR/fail-cc" ] && { echo "cc: forced failure" >&2; exit 1; }
src=""
out=""
while [ $# -gt 0 ]; do
  case "$1" in
    -c) src="$2"; shift ;;
    -o) out="$2"; shift ;;
  esac
  shift
done
if grep -q FAIL "$src" 2>/dev/null; then
  echo "error: $src: compile failed" >&2
  exit 1
fi
if grep -q WARN "$src" 2>/dev/null; then
  echo "warning: $src: unused variable" >&2
fi
cat "$src" > "$out"
"#;

#[cfg(unix)]
const FAKE_LD: &str = r#"
echo "ld $*" >> "$KILN_FAKE_LOG"
[ -e "$KILN_FAKE_DIR/fail-ld" ] && { echo "ld: forced failure" >&2; exit 1; }
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then out="$2"; shift; fi
  shift
done
echo linked > "$out"
"#;

#[cfg(unix)]
const FAKE_AR: &str = r#"
echo "ar $*" >> "$KILN_FAKE_LOG"
[ -e "$KILN_FAKE_DIR/fail-ar" ] && { echo "ar: forced failure" >&2; exit 1; }
echo archived > "$1"
"#;

/// A fake toolchain rooted in a scratch directory.
///
/// Each tool appends its arguments to `tools.log` (`cc -c a.c -o a.o`) and
/// writes its output file. A compile fails when the source contains `FAIL`
/// and succeeds with a warning on stderr when it contains `WARN`;
/// any stage can be made to fail with [`FakeToolchain::fail`].
#[cfg(unix)]
pub struct FakeToolchain {
  dir: PathBuf,
}

#[cfg(unix)]
impl FakeToolchain {
  pub fn new(root: &Path) -> Self {
    let dir = root.join("fake-toolchain");
    std::fs::create_dir_all(&dir).unwrap();
    let log = dir.join("tools.log");

    for (name, body) in [("cc", FAKE_CC), ("ld", FAKE_LD), ("ar", FAKE_AR)] {
      let script = format!(
        "KILN_FAKE_LOG='{}'\nKILN_FAKE_DIR='{}'\n{}",
        log.display(),
        dir.display(),
        body
      );
      std::fs::write(dir.join(format!("{}.sh", name)), script).unwrap();
    }

    Self { dir }
  }

  /// Scripts run through `/bin/sh <script>`, so nothing is exec'd directly.
  pub fn toolchain(&self) -> Toolchain {
    let tool = |name: &str| {
      Tool::new(
        "/bin/sh",
        vec![self.dir.join(format!("{}.sh", name)).to_string_lossy().into_owned()],
      )
    };
    Toolchain::new(tool("cc"), tool("ld"), tool("ar"))
  }

  pub fn log_path(&self) -> PathBuf {
    self.dir.join("tools.log")
  }

  /// Every logged invocation, oldest first.
  pub fn invocations(&self) -> Vec<String> {
    read_log(&self.log_path())
  }

  /// Number of logged invocations of one stage.
  pub fn count(&self, stage: Stage) -> usize {
    let prefix = match stage {
      Stage::Compile => "cc ",
      Stage::Link => "ld ",
      Stage::Archive => "ar ",
    };
    self.invocations().iter().filter(|l| l.starts_with(prefix)).count()
  }

  /// Forget previous invocations.
  pub fn reset_log(&self) {
    let _ = std::fs::remove_file(self.log_path());
  }

  /// Make every following invocation of `stage` exit with status 1.
  pub fn fail(&self, stage: Stage) {
    std::fs::write(self.dir.join(marker(stage)), "").unwrap();
  }
}

#[cfg(unix)]
fn marker(stage: Stage) -> &'static str {
  match stage {
    Stage::Compile => "fail-cc",
    Stage::Link => "fail-ld",
    Stage::Archive => "fail-ar",
  }
}

/// Lines of a tool log, or nothing if no tool has run yet.
#[cfg(unix)]
pub fn read_log(path: &Path) -> Vec<String> {
  match std::fs::read_to_string(path) {
    Ok(content) => content.lines().map(str::to_string).collect(),
    Err(_) => Vec::new(),
  }
}

/// Write `content` to `path`, creating parent directories.
pub fn write_file(path: &Path, content: &str) {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).unwrap();
  }
  std::fs::write(path, content).unwrap();
}

/// Set the modification time of `path`.
pub fn set_mtime(path: &Path, time: SystemTime) {
  let file = File::options().write(true).open(path).unwrap();
  file.set_modified(time).unwrap();
}

/// Set the modification time of `path` to now.
pub fn touch(path: &Path) {
  set_mtime(path, SystemTime::now());
}

/// Keeps every notice in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingProgress {
  lines: Mutex<Vec<String>>,
}

impl RecordingProgress {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn lines(&self) -> Vec<String> {
    self.lines.lock().map(|l| l.clone()).unwrap_or_default()
  }

  fn push(&self, line: String) {
    if let Ok(mut lines) = self.lines.lock() {
      lines.push(line);
    }
  }
}

impl Progress for RecordingProgress {
  fn stage(&self, stage: Stage, target: &Path) {
    self.push(stage_line(stage, target));
  }

  fn status(&self, module: &str, status: &str) {
    self.push(status_line(module, status));
  }
}
