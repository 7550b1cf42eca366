// src/lib.rs

//! Foundry
//!
//! Builds a patched shared-library distribution of Ceres Solver with
//! bundled Eigen headers. Upstream does not support the shared-library
//! configuration on Windows, so the pipeline applies a fixed set of
//! textual patches before driving CMake through configure/build/install.
//!
//! # Pipeline
//!
//! - Fetch: download and extract the two source trees (idempotent,
//!   keyed on filesystem presence)
//! - Patch: ordered textual transforms; non-matching patches are advisory
//! - Build: configure, compile, install; any non-zero exit is fatal
//! - Verify: the install tree must contain the shared library
//! - Package: optional zip archive of the install tree, Eigen headers,
//!   and license texts

pub mod config;
pub mod driver;
mod error;
pub mod fetch;
pub mod package;
pub mod patch;
pub mod pipeline;
pub mod stage;
pub mod verify;

pub use config::{ForgeConfig, ToolSet};
pub use driver::{BuildDriver, BuildPhase};
pub use error::{Error, Result};
pub use fetch::{FetchStatus, Fetcher};
pub use package::Packager;
pub use patch::{shared_build_patches, Patch, Patcher, Transform};
pub use pipeline::{ForgeReport, Pipeline};
pub use stage::StageOutcome;
pub use verify::verify_install;
