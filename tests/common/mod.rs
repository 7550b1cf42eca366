// tests/common/mod.rs

//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Build a miniature Ceres source tree carrying the upstream text the
/// patch list targets.
pub fn make_ceres_tree(root: &Path) {
    fs::create_dir_all(root.join("internal/ceres")).unwrap();
    fs::create_dir_all(root.join("include/ceres/internal")).unwrap();

    fs::write(
        root.join("CMakeLists.txt"),
        "cmake_minimum_required(VERSION 3.10)\n\
         project(Ceres C CXX)\n\
         \n\
         if (WIN32 AND BUILD_SHARED_LIBS)\n  \
           message(FATAL_ERROR\n    \
             \"Building Ceres as a shared library with MSVC is not supported.\")\n\
         endif()\n\
         \n\
         add_subdirectory(internal/ceres)\n",
    )
    .unwrap();

    fs::write(
        root.join("internal/ceres/CMakeLists.txt"),
        "set(CERES_LIBRARY_SOURCE solver.cc problem.cc)\n\
         add_library(ceres ${CERES_LIBRARY_SOURCE})\n\
         target_include_directories(ceres PUBLIC ${CMAKE_SOURCE_DIR}/include)\n",
    )
    .unwrap();

    fs::write(
        root.join("include/ceres/internal/config.h.in"),
        "#ifndef CERES_PUBLIC_INTERNAL_CONFIG_H_\n\
         #define CERES_PUBLIC_INTERNAL_CONFIG_H_\n\
         \n\
         #cmakedefine CERES_USE_MINIGLOG\n\
         #cmakedefine CERES_NO_THREADS\n\
         \n\
         #endif  // CERES_PUBLIC_INTERNAL_CONFIG_H_\n",
    )
    .unwrap();

    fs::write(
        root.join("include/ceres/problem.h"),
        "#include \"ceres/internal/config.h\"\n\
         \n\
         namespace ceres {\n\
         class Problem {\n \
          public:\n  \
           Problem();\n \
          private:\n  \
           static const int kDefaultBlockSize;\n\
         };\n\
         }  // namespace ceres\n",
    )
    .unwrap();

    fs::write(
        root.join("include/ceres/solver.h"),
        "#include \"ceres/internal/config.h\"\n\
         \n\
         namespace ceres {\n\
         class Solver {\n \
          public:\n  \
           struct Options {};\n \
          private:\n  \
           static const double kDefaultGradientTolerance;\n\
         };\n\
         }  // namespace ceres\n",
    )
    .unwrap();

    fs::write(root.join("LICENSE"), "BSD 3-Clause License\n").unwrap();
}

/// Build a miniature Eigen headers tree.
pub fn make_eigen_tree(root: &Path) {
    fs::create_dir_all(root.join("Eigen/src/Core")).unwrap();
    fs::write(root.join("Eigen/Core"), "#include \"src/Core/Matrix.h\"\n").unwrap();
    fs::write(root.join("Eigen/src/Core/Matrix.h"), "// matrix\n").unwrap();
    fs::write(root.join("COPYING.MPL2"), "Mozilla Public License 2.0\n").unwrap();
}

/// Write an executable stub standing in for an external tool. Every
/// invocation appends its argument list to `log`, then exits with `code`.
#[cfg(unix)]
pub fn stub_tool(dir: &Path, name: &str, code: i32, log: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    let script = format!("#!/bin/sh\necho \"$@\" >> \"{}\"\nexit {}\n", log.display(), code);
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Number of recorded invocations in a stub's log file.
#[cfg(unix)]
pub fn invocation_count(log: &Path) -> usize {
    match fs::read_to_string(log) {
        Ok(content) => content.lines().count(),
        Err(_) => 0,
    }
}
