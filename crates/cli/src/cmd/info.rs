use anyhow::Result;

use kiln_lib::Toolchain;

use crate::output::{OutputFormat, print_json};

/// Show the effective toolchain as the command lines it would run.
pub fn cmd_info(toolchain: &Toolchain, output: OutputFormat) -> Result<()> {
  if output.is_json() {
    return print_json(toolchain);
  }

  println!("Toolchain:");
  println!("  Compile: {}", toolchain.cc.command_line(&["-c", "<src>", "-o", "<obj>"]));
  println!("  Link:    {}", toolchain.ld.command_line(&["<objects...>", "-o", "<target>"]));
  println!("  Archive: {}", toolchain.ar.command_line(&["<target>", "<objects...>"]));
  Ok(())
}
