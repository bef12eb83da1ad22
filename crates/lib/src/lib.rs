//! kiln-lib: incremental build orchestration
//!
//! This crate decides which sources are stale and drives an external
//! compiler/linker/archiver to bring build outputs up to date:
//! - `Toolchain`: how to invoke the compiler, linker and archiver
//! - `staleness`: modification-time checks between sources and outputs
//! - `Module`: build-graph nodes, either a leaf with its own sources or a
//!   composite linking other modules' outputs
//! - `BuildDriver`: runs `update` / `clean` on a root module

pub mod artifact;
pub mod driver;
pub mod module;
pub mod progress;
pub mod sources;
pub mod staleness;
pub mod toolchain;
mod util;

pub use artifact::{Artifact, ArtifactKind};
pub use driver::{BuildDriver, BuildOptions, BuildReport, CleanReport};
pub use module::{BuildError, BuildStats, CompositeModule, LeafModule, Module};
pub use sources::{MappingError, SourceMapping, default_map, find_files};
pub use toolchain::{Stage, Tool, ToolError, Toolchain};
