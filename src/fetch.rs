// src/fetch.rs

//! Dependency fetcher: downloads and extracts the two upstream source trees.
//!
//! Idempotence is keyed on filesystem presence of a marker file inside each
//! extracted tree, not on content hashes: if the marker is there, no network
//! access happens at all. A non-zero exit from the retrieval or extraction
//! tool aborts the run; partial state stays in the working directory for
//! inspection and reuse on the next run.

use crate::config::ForgeConfig;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// Whether a source tree was freshly fetched or already on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Cached,
    Fetched,
}

pub struct Fetcher<'a> {
    config: &'a ForgeConfig,
}

impl<'a> Fetcher<'a> {
    pub fn new(config: &'a ForgeConfig) -> Self {
        Self { config }
    }

    /// Fetch both source trees, skipping any that are already present.
    pub fn fetch_all(&self) -> Result<()> {
        fs::create_dir_all(&self.config.work_dir)?;
        self.fetch_eigen()?;
        self.fetch_ceres()?;
        Ok(())
    }

    /// Check whether both source trees are already on disk.
    ///
    /// When this returns `true`, a build can proceed without network access.
    pub fn sources_cached(&self) -> bool {
        self.eigen_marker().exists() && self.ceres_marker().exists()
    }

    /// Fetch the Eigen headers tree from its release archive.
    pub fn fetch_eigen(&self) -> Result<FetchStatus> {
        let marker = self.eigen_marker();
        if marker.exists() {
            debug!("Eigen already present: {}", self.config.eigen_dir().display());
            return Ok(FetchStatus::Cached);
        }

        let archive = self.config.eigen_archive();
        if !archive.exists() {
            info!("Downloading: {}", self.config.eigen_url());
            self.download(&self.config.eigen_url(), &archive)?;
        } else {
            debug!("Using previously downloaded archive: {}", archive.display());
        }

        info!("Extracting: {}", archive.display());
        self.extract_7z(&archive, &self.config.work_dir)?;

        if !marker.exists() {
            return Err(Error::Extract(format!(
                "Eigen tree incomplete after extraction: {} not found",
                marker.display()
            )));
        }

        Ok(FetchStatus::Fetched)
    }

    /// Fetch the Ceres source tree from its release tarball.
    pub fn fetch_ceres(&self) -> Result<FetchStatus> {
        let marker = self.ceres_marker();
        if marker.exists() {
            debug!(
                "Ceres sources already present: {}",
                self.config.ceres_src_dir().display()
            );
            return Ok(FetchStatus::Cached);
        }

        let archive = self.config.ceres_archive();
        if !archive.exists() {
            info!("Downloading: {}", self.config.ceres_url());
            self.download(&self.config.ceres_url(), &archive)?;
        } else {
            debug!("Using previously downloaded archive: {}", archive.display());
        }

        info!("Extracting: {}", archive.display());
        self.extract_tar(&archive, &self.config.work_dir)?;

        if !marker.exists() {
            return Err(Error::Extract(format!(
                "Ceres tree incomplete after extraction: {} not found",
                marker.display()
            )));
        }

        Ok(FetchStatus::Fetched)
    }

    fn eigen_marker(&self) -> std::path::PathBuf {
        self.config.eigen_dir().join("Eigen").join("Core")
    }

    fn ceres_marker(&self) -> std::path::PathBuf {
        self.config.ceres_src_dir().join("CMakeLists.txt")
    }

    /// Download a file from a URL
    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let output = Command::new(&self.config.tools.curl)
            .arg("-fsSL")
            .arg("-o")
            .arg(dest)
            .arg(url)
            .output()
            .map_err(|e| Error::Download(format!("curl failed to start: {}", e)))?;

        if !output.status.success() {
            return Err(Error::Download(format!(
                "failed to download {}: {}",
                url,
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        Ok(())
    }

    /// Extract a zip/7z archive with the external 7z tool
    fn extract_7z(&self, archive: &Path, dest: &Path) -> Result<()> {
        let mut outdir = std::ffi::OsString::from("-o");
        outdir.push(dest.as_os_str());

        let output = Command::new(&self.config.tools.sevenzip)
            .arg("x")
            .arg("-y")
            .arg(outdir)
            .arg(archive)
            .output()
            .map_err(|e| Error::Extract(format!("7z failed to start: {}", e)))?;

        if !output.status.success() {
            return Err(Error::Extract(format!(
                "failed to extract {}: {}",
                archive.display(),
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        Ok(())
    }

    /// Extract a gzipped tarball with the external tar tool
    fn extract_tar(&self, archive: &Path, dest: &Path) -> Result<()> {
        let output = Command::new(&self.config.tools.tar)
            .arg("-xzf")
            .arg(archive)
            .arg("-C")
            .arg(dest)
            .output()
            .map_err(|e| Error::Extract(format!("tar failed to start: {}", e)))?;

        if !output.status.success() {
            return Err(Error::Extract(format!(
                "failed to extract {}: {}",
                archive.display(),
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        Ok(())
    }
}
