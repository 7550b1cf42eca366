// src/commands/fetch.rs

//! Fetch command - warm the source cache without building

use anyhow::{Context, Result};
use foundry::{Fetcher, ForgeConfig};
use std::path::PathBuf;

/// Download and extract both source trees, skipping anything already
/// present. Useful for preparing an offline build.
pub fn cmd_fetch(ceres_version: &str, eigen_version: &str, work_dir: &str) -> Result<()> {
    let config = ForgeConfig {
        ceres_version: ceres_version.to_string(),
        eigen_version: eigen_version.to_string(),
        work_dir: PathBuf::from(work_dir),
        ..Default::default()
    };

    let fetcher = Fetcher::new(&config);

    if fetcher.sources_cached() {
        println!("[OK] All sources already present in {}", work_dir);
        return Ok(());
    }

    println!("Fetching sources into {}...", work_dir);
    fetcher
        .fetch_all()
        .with_context(|| "failed to fetch sources")?;

    println!("[COMPLETE] Sources ready:");
    println!("  - {}", config.ceres_src_dir().display());
    println!("  - {}", config.eigen_dir().display());

    Ok(())
}
