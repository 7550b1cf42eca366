// src/commands/package.rs

//! Package command - archive an existing install tree

use anyhow::{Context, Result};
use foundry::{verify_install, ForgeConfig, Packager};
use std::path::PathBuf;

/// Package a previously built install tree into a zip archive.
///
/// Verifies the install tree first so a stale or empty prefix fails with
/// the same distinct status as the build pipeline would.
pub fn cmd_package(
    ceres_version: &str,
    eigen_version: &str,
    work_dir: &str,
    install_dir: &str,
    out: Option<&str>,
) -> Result<()> {
    let config = ForgeConfig {
        ceres_version: ceres_version.to_string(),
        eigen_version: eigen_version.to_string(),
        work_dir: PathBuf::from(work_dir),
        install_dir: PathBuf::from(install_dir),
        ..Default::default()
    };

    verify_install(&config.install_dir)?;

    let out_path = out
        .map(PathBuf::from)
        .unwrap_or_else(|| config.default_archive_path());

    println!("Packaging {} -> {}...", install_dir, out_path.display());

    let packager = Packager::new(&config);
    let warnings = packager
        .package(&out_path)
        .with_context(|| format!("failed to package {}", install_dir))?;

    println!("[COMPLETE] Archive: {}", out_path.display());
    for warning in &warnings {
        println!("  warning: {}", warning);
    }

    Ok(())
}
