mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use kiln_lib::Toolchain;

use crate::cmd::{ProjectArgs, cmd_build, cmd_clean, cmd_info};
use crate::output::{OutputFormat, print_error};

/// kiln - incremental builds driven by file timestamps
#[derive(Parser)]
#[command(name = "kiln")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Toolchain description (JSON). Defaults to KILN_CC/KILN_LD/KILN_AR and friends.
  #[arg(long, global = true)]
  toolchain: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Compile stale sources and relink the target
  Build {
    #[command(flatten)]
    project: ProjectArgs,

    /// Rebuild everything regardless of timestamps
    #[arg(short, long)]
    force: bool,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Remove object files and the target
  Clean {
    #[command(flatten)]
    project: ProjectArgs,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Show the toolchain that would be used
  Info {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },
}

fn main() {
  let cli = Cli::parse();

  init_logging(cli.verbose);

  if let Err(e) = run(cli) {
    print_error(&format!("{:#}", e));
    std::process::exit(1);
  }
}

fn init_logging(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn run(cli: Cli) -> Result<()> {
  let toolchain = load_toolchain(cli.toolchain.as_deref())?;

  match cli.command {
    Commands::Build { project, force, output } => cmd_build(&project, force, toolchain, output),
    Commands::Clean { project, output } => cmd_clean(&project, toolchain, output),
    Commands::Info { output } => cmd_info(&toolchain, output),
  }
}

fn load_toolchain(path: Option<&std::path::Path>) -> Result<Toolchain> {
  let toolchain = match path {
    Some(path) => Toolchain::load(path).context("Failed to load toolchain")?,
    None => Toolchain::from_env(),
  };

  debug!(
    cc = %toolchain.cc.exe,
    ld = %toolchain.ld.exe,
    ar = %toolchain.ar.exe,
    from_file = path.is_some(),
    "loaded toolchain"
  );
  Ok(toolchain)
}
