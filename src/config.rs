// src/config.rs

//! Immutable configuration record passed through every pipeline stage.

use std::path::PathBuf;

/// External tool programs invoked by the pipeline.
///
/// Each defaults to the bare command name (resolved via `PATH`), but can be
/// pinned to an absolute path so users can select a specific toolchain and
/// tests can substitute stubs.
#[derive(Debug, Clone)]
pub struct ToolSet {
    pub curl: PathBuf,
    pub tar: PathBuf,
    pub sevenzip: PathBuf,
    pub cmake: PathBuf,
    pub zip: PathBuf,
}

impl Default for ToolSet {
    fn default() -> Self {
        Self {
            curl: PathBuf::from("curl"),
            tar: PathBuf::from("tar"),
            sevenzip: PathBuf::from("7z"),
            cmake: PathBuf::from("cmake"),
            zip: PathBuf::from("zip"),
        }
    }
}

/// Configuration for a full forge run.
#[derive(Debug, Clone)]
pub struct ForgeConfig {
    /// Ceres Solver release to build (e.g. "2.1.0")
    pub ceres_version: String,
    /// Eigen release bundled as headers (e.g. "3.4.0")
    pub eigen_version: String,
    /// Working directory; doubles as download cache and debugging aid.
    /// Aborted runs leave their partial state here on purpose.
    pub work_dir: PathBuf,
    /// Installation prefix handed to the configure step
    pub install_dir: PathBuf,
    /// Number of parallel compile jobs
    pub jobs: u32,
    /// Build upstream tests alongside the library
    pub with_tests: bool,
    /// External tool programs
    pub tools: ToolSet,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        let jobs = std::thread::available_parallelism()
            .map(|p| p.get() as u32)
            .unwrap_or(4);

        Self {
            ceres_version: "2.1.0".to_string(),
            eigen_version: "3.4.0".to_string(),
            work_dir: PathBuf::from("build"),
            install_dir: PathBuf::from("install"),
            jobs,
            with_tests: false,
            tools: ToolSet::default(),
        }
    }
}

impl ForgeConfig {
    pub fn ceres_url(&self) -> String {
        format!(
            "http://ceres-solver.org/ceres-solver-{}.tar.gz",
            self.ceres_version
        )
    }

    pub fn eigen_url(&self) -> String {
        format!(
            "https://gitlab.com/libeigen/eigen/-/archive/{v}/eigen-{v}.zip",
            v = self.eigen_version
        )
    }

    /// Downloaded Ceres release tarball
    pub fn ceres_archive(&self) -> PathBuf {
        self.work_dir
            .join(format!("ceres-solver-{}.tar.gz", self.ceres_version))
    }

    /// Downloaded Eigen release archive
    pub fn eigen_archive(&self) -> PathBuf {
        self.work_dir
            .join(format!("eigen-{}.zip", self.eigen_version))
    }

    /// Extracted Ceres source tree (the tarball's top-level directory)
    pub fn ceres_src_dir(&self) -> PathBuf {
        self.work_dir
            .join(format!("ceres-solver-{}", self.ceres_version))
    }

    /// Extracted Eigen headers tree
    pub fn eigen_dir(&self) -> PathBuf {
        self.work_dir.join(format!("eigen-{}", self.eigen_version))
    }

    /// Out-of-source CMake build directory
    pub fn build_dir(&self) -> PathBuf {
        self.work_dir.join("ceres-bin")
    }

    /// Name of the distribution root inside the packaged archive
    pub fn dist_name(&self) -> String {
        format!("ceres-solver-{}", self.ceres_version)
    }

    /// Default location of the packaged archive
    pub fn default_archive_path(&self) -> PathBuf {
        PathBuf::from(format!("ceres-solver-{}-shared.zip", self.ceres_version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ForgeConfig::default();
        assert!(config.jobs > 0);
        assert!(!config.with_tests);
        assert_eq!(config.ceres_version, "2.1.0");
    }

    #[test]
    fn test_derived_paths() {
        let config = ForgeConfig {
            work_dir: PathBuf::from("/tmp/forge"),
            ..Default::default()
        };
        assert_eq!(
            config.ceres_src_dir(),
            PathBuf::from("/tmp/forge/ceres-solver-2.1.0")
        );
        assert_eq!(config.eigen_dir(), PathBuf::from("/tmp/forge/eigen-3.4.0"));
        assert!(config.ceres_url().ends_with("ceres-solver-2.1.0.tar.gz"));
        assert!(config.eigen_url().contains("/3.4.0/eigen-3.4.0.zip"));
    }
}
