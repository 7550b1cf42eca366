// src/package.rs

//! Packager: assemble a staging area mirroring the distributable layout and
//! compress it into a single zip archive.

use crate::config::ForgeConfig;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Name of the optional test binary bundled when upstream tests were built.
const TEST_BINARY: &str = "bundle_adjustment_test";

pub struct Packager<'a> {
    config: &'a ForgeConfig,
}

impl<'a> Packager<'a> {
    pub fn new(config: &'a ForgeConfig) -> Self {
        Self { config }
    }

    /// Stage and compress the distribution into `out`, overwriting any
    /// prior archive of the same name. Returns advisory warnings.
    pub fn package(&self, out: &Path) -> Result<Vec<String>> {
        let staging = TempDir::new()?;
        let warnings = self.stage(staging.path())?;
        self.archive(staging.path(), out)?;
        info!("packaged distribution: {}", out.display());
        Ok(warnings)
    }

    /// Assemble the staging area: install tree, optional test binary,
    /// dependency headers, and license texts.
    pub fn stage(&self, staging_root: &Path) -> Result<Vec<String>> {
        let mut warnings = Vec::new();
        let dist = staging_root.join(self.config.dist_name());
        fs::create_dir_all(&dist)?;

        // Full install tree (headers, shared library, link stub)
        copy_tree(&self.config.install_dir, &dist)?;

        // Optional test binary: matched by name inside a bin directory.
        // Absence is advisory; the distribution is complete without it.
        match self.find_test_binary() {
            Some(binary) => {
                let bin_dir = dist.join("bin");
                fs::create_dir_all(&bin_dir)?;
                let dest = bin_dir.join(binary.file_name().unwrap_or_default());
                fs::copy(&binary, &dest)?;
                debug!("bundled test binary: {}", binary.display());
            }
            None => {
                let detail = format!("test binary {} not found in build tree", TEST_BINARY);
                warn!("{}", detail);
                warnings.push(detail);
            }
        }

        // Dependency headers tree
        let eigen_headers = self.config.eigen_dir().join("Eigen");
        let eigen_dest = dist
            .join("third_party")
            .join(format!("eigen-{}", self.config.eigen_version))
            .join("Eigen");
        fs::create_dir_all(&eigen_dest)?;
        copy_tree(&eigen_headers, &eigen_dest)?;

        // License texts for both projects
        fs::copy(
            self.config.ceres_src_dir().join("LICENSE"),
            dist.join("LICENSE"),
        )?;
        fs::copy(
            self.config.eigen_dir().join("COPYING.MPL2"),
            dist.join("LICENSE.eigen"),
        )?;

        Ok(warnings)
    }

    /// Compress the staging area into a zip archive at `out`.
    pub fn archive(&self, staging_root: &Path, out: &Path) -> Result<()> {
        // zip appends to an existing archive, so drop any previous one
        if out.exists() {
            fs::remove_file(out)?;
        }

        let out_abs = if out.is_absolute() {
            out.to_path_buf()
        } else {
            std::env::current_dir()?.join(out)
        };

        let output = Command::new(&self.config.tools.zip)
            .arg("-r")
            .arg("-q")
            .arg(&out_abs)
            .arg(".")
            .current_dir(staging_root)
            .output()
            .map_err(|e| Error::CommandFailed {
                tool: self.config.tools.zip.display().to_string(),
                status: -1,
                stderr: format!("failed to start: {}", e),
            })?;

        if !output.status.success() {
            return Err(Error::CommandFailed {
                tool: self.config.tools.zip.display().to_string(),
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(())
    }

    /// Search the build tree for the test binary: name must match and the
    /// containing directory must be a `bin` directory.
    fn find_test_binary(&self) -> Option<PathBuf> {
        WalkDir::new(self.config.build_dir())
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .find(|e| {
                let name = e.file_name().to_string_lossy();
                let name_ok = name == TEST_BINARY || name == format!("{}.exe", TEST_BINARY);
                let dir_ok = e
                    .path()
                    .parent()
                    .and_then(|p| p.file_name())
                    .map(|d| d == "bin")
                    .unwrap_or(false);
                name_ok && dir_ok
            })
            .map(|e| e.path().to_path_buf())
    }
}

/// Copy a directory tree, preserving relative layout.
///
/// Symlinks are recreated rather than followed: on unix the link stub
/// (`lib/libceres.so -> libceres.so.2.1.0`) is a symlink, and the staged
/// distribution must carry it as one.
fn copy_tree(src: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(src).into_iter().filter_map(|e| e.ok()) {
        let rel = entry
            .path()
            .strip_prefix(src)
            .expect("walked entries are prefixed by their root");
        if rel.as_os_str().is_empty() {
            continue;
        }
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            if entry.file_type().is_symlink() {
                copy_symlink(entry.path(), &target)?;
            } else if entry.file_type().is_file() {
                fs::copy(entry.path(), &target)?;
            }
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> Result<()> {
    let dest = fs::read_link(link)?;
    std::os::unix::fs::symlink(dest, target)?;
    Ok(())
}

/// Without symlink support, fall back to materializing the link target.
#[cfg(not(unix))]
fn copy_symlink(link: &Path, target: &Path) -> Result<()> {
    fs::copy(link, target)?;
    Ok(())
}
