// src/cli.rs

//! CLI definitions for foundry.
//!
//! Command implementations live in the `commands` module.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "foundry")]
#[command(version)]
#[command(
    about = "Builds a patched shared-library distribution of Ceres Solver",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch, patch, build, install, and verify the shared library
    Build {
        /// Ceres Solver release to build
        #[arg(long, default_value = "2.1.0")]
        ceres_version: String,

        /// Eigen release to bundle as headers
        #[arg(long, default_value = "3.4.0")]
        eigen_version: String,

        /// Working directory (download cache and build scratch)
        #[arg(short, long, default_value = "build")]
        work_dir: String,

        /// Installation prefix
        #[arg(short, long, default_value = "install")]
        install_dir: String,

        /// Number of parallel compile jobs (default: logical CPUs)
        #[arg(short, long)]
        jobs: Option<u32>,

        /// Build upstream tests alongside the library
        #[arg(long)]
        with_tests: bool,

        /// Package the result into a zip archive after verification
        #[arg(long)]
        package: bool,

        /// Archive output path (implies --package)
        #[arg(long)]
        archive_out: Option<String>,

        /// Path to the cmake executable
        #[arg(long)]
        cmake: Option<String>,
    },

    /// Download and extract the source trees without building
    Fetch {
        /// Ceres Solver release to fetch
        #[arg(long, default_value = "2.1.0")]
        ceres_version: String,

        /// Eigen release to fetch
        #[arg(long, default_value = "3.4.0")]
        eigen_version: String,

        /// Working directory (download cache)
        #[arg(short, long, default_value = "build")]
        work_dir: String,
    },

    /// Package an existing install tree without rebuilding
    Package {
        /// Ceres Solver release the install tree was built from
        #[arg(long, default_value = "2.1.0")]
        ceres_version: String,

        /// Eigen release to bundle as headers
        #[arg(long, default_value = "3.4.0")]
        eigen_version: String,

        /// Working directory holding the source trees
        #[arg(short, long, default_value = "build")]
        work_dir: String,

        /// Installation prefix to package
        #[arg(short, long, default_value = "install")]
        install_dir: String,

        /// Archive output path
        #[arg(short, long)]
        out: Option<String>,
    },
}
