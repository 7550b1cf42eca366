// src/verify.rs

//! Install-tree verification.
//!
//! Guards against silent partial success: every build step can exit 0 and
//! still leave no usable library behind (an install rule that matched
//! nothing, say). Absence of the shared library is therefore fatal with a
//! distinct exit status.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Search the install tree recursively for the Ceres shared library.
///
/// Returns the first matching path. Absence is [`Error::ArtifactMissing`],
/// which the binary maps to exit status 3.
pub fn verify_install(install_dir: &Path) -> Result<PathBuf> {
    debug!("verifying install tree at {}", install_dir.display());

    for entry in WalkDir::new(install_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let name = entry.file_name().to_string_lossy();
        if is_ceres_shared_library(&name) {
            info!("found shared library: {}", entry.path().display());
            return Ok(entry.path().to_path_buf());
        }
    }

    Err(Error::ArtifactMissing(install_dir.display().to_string()))
}

/// Match the shared-library artifact by name across platforms:
/// `ceres.dll`, `libceres.so`, `libceres.so.2.1.0`, `libceres.dylib`.
fn is_ceres_shared_library(name: &str) -> bool {
    let stem_ok = name.starts_with("ceres") || name.starts_with("libceres");
    stem_ok && (name.ends_with(".dll") || name.ends_with(".dylib") || has_so_suffix(name))
}

/// `.so` must be the suffix or be followed only by a dotted version tail,
/// so stray files like `ceres.solver.notes` never satisfy the verifier.
fn has_so_suffix(name: &str) -> bool {
    if name.ends_with(".so") {
        return true;
    }
    match name.rfind(".so.") {
        Some(pos) => {
            let tail = &name[pos + 4..];
            !tail.is_empty() && tail.chars().all(|c| c.is_ascii_digit() || c == '.')
        }
        None => false,
    }
}
