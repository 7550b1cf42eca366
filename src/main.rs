// src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build {
            ceres_version,
            eigen_version,
            work_dir,
            install_dir,
            jobs,
            with_tests,
            package,
            archive_out,
            cmake,
        } => commands::cmd_build(
            &ceres_version,
            &eigen_version,
            &work_dir,
            &install_dir,
            jobs,
            with_tests,
            package,
            archive_out.as_deref(),
            cmake.as_deref(),
        ),
        Commands::Fetch {
            ceres_version,
            eigen_version,
            work_dir,
        } => commands::cmd_fetch(&ceres_version, &eigen_version, &work_dir),
        Commands::Package {
            ceres_version,
            eigen_version,
            work_dir,
            install_dir,
            out,
        } => commands::cmd_package(
            &ceres_version,
            &eigen_version,
            &work_dir,
            &install_dir,
            out.as_deref(),
        ),
    };

    if let Err(e) = result {
        eprintln!("error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

/// A missing artifact after a nominally successful build gets a distinct
/// exit status so callers can tell it apart from tool failures.
fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<foundry::Error>() {
        Some(foundry::Error::ArtifactMissing(_)) => 3,
        _ => 1,
    }
}
