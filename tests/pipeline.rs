// tests/pipeline.rs

//! Fetch idempotence, fail-fast behavior, and the verification gate,
//! exercised with stub external tools.

#![cfg(unix)]

mod common;

use foundry::{BuildDriver, BuildPhase, Error, Fetcher, ForgeConfig, Pipeline};
use std::fs;
use std::path::PathBuf;

/// Config rooted in a temp dir, with every external tool replaced by a
/// stub that records its invocations.
fn stubbed_config(
    root: &std::path::Path,
    cmake_exit: i32,
) -> (ForgeConfig, PathBuf, PathBuf) {
    let bin = root.join("stub-bin");
    fs::create_dir_all(&bin).unwrap();

    let curl_log = root.join("curl.log");
    let cmake_log = root.join("cmake.log");
    let zip_log = root.join("zip.log");

    let mut config = ForgeConfig {
        work_dir: root.join("work"),
        install_dir: root.join("install"),
        ..Default::default()
    };
    config.tools.curl = common::stub_tool(&bin, "curl", 1, &curl_log);
    config.tools.tar = common::stub_tool(&bin, "tar", 0, &root.join("tar.log"));
    config.tools.sevenzip = common::stub_tool(&bin, "7z", 0, &root.join("7z.log"));
    config.tools.cmake = common::stub_tool(&bin, "cmake", cmake_exit, &cmake_log);
    config.tools.zip = common::stub_tool(&bin, "zip", 0, &zip_log);

    (config, curl_log, cmake_log)
}

/// Pre-populate both source trees so the fetch stage short-circuits.
fn seed_sources(config: &ForgeConfig) {
    common::make_ceres_tree(&config.ceres_src_dir());
    common::make_eigen_tree(&config.eigen_dir());
}

#[test]
fn test_fetch_skips_download_when_sources_present() {
    let root = tempfile::tempdir().unwrap();
    // curl stub exits 1: any attempted download would fail the test
    let (config, curl_log, _) = stubbed_config(root.path(), 0);
    seed_sources(&config);

    let fetcher = Fetcher::new(&config);
    assert!(fetcher.sources_cached());
    fetcher.fetch_all().unwrap();

    assert_eq!(common::invocation_count(&curl_log), 0);
}

#[test]
fn test_failed_download_aborts_fetch() {
    let root = tempfile::tempdir().unwrap();
    let (config, curl_log, _) = stubbed_config(root.path(), 0);
    // No seeded sources: fetch must reach for curl, which exits 1

    let fetcher = Fetcher::new(&config);
    let result = fetcher.fetch_all();

    assert!(matches!(result, Err(Error::Download(_))));
    assert_eq!(common::invocation_count(&curl_log), 1);
}

#[test]
fn test_driver_aborts_on_configure_failure() {
    let root = tempfile::tempdir().unwrap();
    let (config, _, cmake_log) = stubbed_config(root.path(), 1);
    seed_sources(&config);

    let mut driver = BuildDriver::new(&config);
    let result = driver.run();

    assert!(matches!(result, Err(Error::CommandFailed { .. })));
    // Only the configure invocation happened; build and install never ran
    assert_eq!(common::invocation_count(&cmake_log), 1);
    assert_eq!(driver.phase(), None);
}

#[test]
fn test_driver_runs_steps_in_order() {
    let root = tempfile::tempdir().unwrap();
    let (config, _, cmake_log) = stubbed_config(root.path(), 0);
    seed_sources(&config);

    let mut driver = BuildDriver::new(&config);
    let diagnostic = driver.run().unwrap();

    // Stub cmake generates nothing, so the header inspection is advisory
    assert!(diagnostic.is_warning());
    assert_eq!(common::invocation_count(&cmake_log), 3);
    assert_eq!(driver.phase(), Some(BuildPhase::Installed));

    let invocations = fs::read_to_string(&cmake_log).unwrap();
    let mut lines = invocations.lines();
    assert!(lines.next().unwrap().contains("-DBUILD_SHARED_LIBS=ON"));
    assert!(lines.next().unwrap().starts_with("--build"));
    assert!(lines.next().unwrap().starts_with("--install"));
}

#[test]
fn test_pipeline_aborts_before_verify_and_package() {
    let root = tempfile::tempdir().unwrap();
    let (config, _, cmake_log) = stubbed_config(root.path(), 1);
    seed_sources(&config);

    let archive_out = root.path().join("dist.zip");
    let pipeline = Pipeline::new(config);
    let result = pipeline.run(Some(&archive_out));

    assert!(result.is_err());
    assert_eq!(common::invocation_count(&cmake_log), 1);
    assert!(!archive_out.exists());
}

#[test]
fn test_verification_gate_catches_empty_install() {
    let root = tempfile::tempdir().unwrap();
    // cmake exits 0 everywhere but installs nothing
    let (config, _, cmake_log) = stubbed_config(root.path(), 0);
    seed_sources(&config);
    fs::create_dir_all(&config.install_dir).unwrap();

    let pipeline = Pipeline::new(config);
    let result = pipeline.run(None);

    // Every driver step exited 0, yet the run reports failure
    assert_eq!(common::invocation_count(&cmake_log), 3);
    assert!(matches!(result, Err(Error::ArtifactMissing(_))));
}

#[test]
fn test_pipeline_succeeds_when_library_installed() {
    let root = tempfile::tempdir().unwrap();
    let (config, _, _) = stubbed_config(root.path(), 0);
    seed_sources(&config);

    // Stand in for a real install step
    let lib_dir = config.install_dir.join("lib");
    fs::create_dir_all(&lib_dir).unwrap();
    fs::write(lib_dir.join("libceres.so.2.1.0"), b"").unwrap();

    let pipeline = Pipeline::new(config);
    let report = pipeline.run(None).unwrap();

    assert!(report.library.ends_with("lib/libceres.so.2.1.0"));
    assert!(report.archive.is_none());
    // The stub build produced no generated header, which is advisory only
    assert!(report.warnings.iter().any(|w| w.contains("generated header")));
}
