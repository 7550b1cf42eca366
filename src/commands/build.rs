// src/commands/build.rs

//! Build command - run the full pipeline

use anyhow::{Context, Result};
use foundry::{ForgeConfig, Pipeline};
use std::path::PathBuf;
use tracing::info;

/// Run the full fetch/patch/build/verify pipeline.
///
/// # Arguments
/// * `ceres_version` - Ceres Solver release to build
/// * `eigen_version` - Eigen release bundled as headers
/// * `work_dir` - Working directory (download cache and build scratch)
/// * `install_dir` - Installation prefix
/// * `jobs` - Number of parallel compile jobs (None = logical CPUs)
/// * `with_tests` - Build upstream tests alongside the library
/// * `package` - Package the result into a zip archive
/// * `archive_out` - Archive output path (implies packaging)
/// * `cmake` - Path to the cmake executable
#[allow(clippy::too_many_arguments)]
pub fn cmd_build(
    ceres_version: &str,
    eigen_version: &str,
    work_dir: &str,
    install_dir: &str,
    jobs: Option<u32>,
    with_tests: bool,
    package: bool,
    archive_out: Option<&str>,
    cmake: Option<&str>,
) -> Result<()> {
    let mut config = ForgeConfig {
        ceres_version: ceres_version.to_string(),
        eigen_version: eigen_version.to_string(),
        work_dir: PathBuf::from(work_dir),
        install_dir: PathBuf::from(install_dir),
        with_tests,
        ..Default::default()
    };

    if let Some(j) = jobs {
        config.jobs = j;
    }
    if let Some(cmake) = cmake {
        config.tools.cmake = PathBuf::from(cmake);
    }

    let archive_path = if package || archive_out.is_some() {
        Some(
            archive_out
                .map(PathBuf::from)
                .unwrap_or_else(|| config.default_archive_path()),
        )
    } else {
        None
    };

    println!(
        "Building ceres-solver {} (shared, eigen {}, {} jobs)...",
        config.ceres_version, config.eigen_version, config.jobs
    );

    let pipeline = Pipeline::new(config);
    let report = pipeline
        .run(archive_path.as_deref())
        .with_context(|| format!("failed to build ceres-solver {}", ceres_version))?;

    println!("\n[COMPLETE] Shared library: {}", report.library.display());
    println!("Install tree: {}", report.install_dir.display());
    if let Some(archive) = &report.archive {
        println!("Archive: {}", archive.display());
    }

    if !report.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &report.warnings {
            println!("  - {}", warning);
        }
    }

    info!(
        "built ceres-solver {} into {}",
        ceres_version,
        report.install_dir.display()
    );

    Ok(())
}
