// src/pipeline.rs

//! The linear fetch -> patch -> build -> verify -> package pipeline.

use crate::config::ForgeConfig;
use crate::driver::BuildDriver;
use crate::error::{Error, Result};
use crate::fetch::Fetcher;
use crate::package::Packager;
use crate::patch::{shared_build_patches, Patcher};
use crate::stage::StageOutcome;
use crate::verify::verify_install;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Result of a full pipeline run.
#[derive(Debug)]
pub struct ForgeReport {
    /// Installation prefix holding headers, shared library, and link stub
    pub install_dir: PathBuf,
    /// The verified shared-library artifact
    pub library: PathBuf,
    /// Packaged archive, when packaging was requested
    pub archive: Option<PathBuf>,
    /// Advisory warnings collected across stages
    pub warnings: Vec<String>,
    /// Captured output of the build steps
    pub log: String,
}

pub struct Pipeline {
    config: ForgeConfig,
}

impl Pipeline {
    pub fn new(config: ForgeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }

    /// Resolve every external tool the run will invoke, failing fast with
    /// an actionable error instead of partway through a long build.
    pub fn preflight(&self, packaging: bool) -> Result<()> {
        let tools = &self.config.tools;
        let mut required = vec![&tools.curl, &tools.tar, &tools.sevenzip, &tools.cmake];
        if packaging {
            required.push(&tools.zip);
        }

        for tool in required {
            which::which(tool)
                .map_err(|_| Error::ToolMissing(tool.display().to_string()))?;
        }
        Ok(())
    }

    /// Run the whole pipeline. Packages into `archive_out` when given.
    pub fn run(&self, archive_out: Option<&Path>) -> Result<ForgeReport> {
        info!(
            "forging ceres-solver {} (eigen {}, {} jobs)",
            self.config.ceres_version, self.config.eigen_version, self.config.jobs
        );

        self.preflight(archive_out.is_some())?;

        let mut warnings = Vec::new();

        // Fetch
        let fetcher = Fetcher::new(&self.config);
        if fetcher.sources_cached() {
            info!("sources already present, skipping downloads");
        }
        fetcher.fetch_all()?;

        // Patch. A non-matching patch is advisory: source drift should
        // surface as a build failure, not a silent abort here.
        let ceres_src = self.config.ceres_src_dir();
        let patcher = Patcher::new(&ceres_src);
        for outcome in patcher.apply_all(&shared_build_patches()) {
            match outcome {
                StageOutcome::Ok => {}
                StageOutcome::Warning(detail) => warnings.push(detail),
                StageOutcome::Fatal(detail) => {
                    return Err(Error::Stage {
                        stage: "patch",
                        detail,
                    });
                }
            }
        }

        // Configure, build, install
        let mut driver = BuildDriver::new(&self.config);
        match driver.run()? {
            StageOutcome::Ok => {}
            StageOutcome::Warning(detail) => {
                warn!("{}", detail);
                warnings.push(detail);
            }
            StageOutcome::Fatal(detail) => {
                return Err(Error::Stage {
                    stage: "configure",
                    detail,
                });
            }
        }

        // Verify: every step above can exit 0 and still produce nothing
        let library = verify_install(&self.config.install_dir)?;

        // Package (optional)
        let archive = match archive_out {
            Some(out) => {
                let packager = Packager::new(&self.config);
                warnings.extend(packager.package(out)?);
                Some(out.to_path_buf())
            }
            None => None,
        };

        Ok(ForgeReport {
            install_dir: self.config.install_dir.clone(),
            library,
            archive,
            warnings,
            log: driver.log().to_string(),
        })
    }
}
