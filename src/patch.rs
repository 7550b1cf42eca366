// src/patch.rs

//! Source patcher: a fixed ordered list of textual transformations applied
//! to the Ceres tree before configuring.
//!
//! Upstream refuses to build Ceres as a shared library on Windows because
//! its symbol-export annotations are incomplete: exporting all symbols by
//! default does not reach private static data members. The patches remove
//! that configure-time guard and inject the missing export machinery.
//!
//! A patch whose target text is absent is an advisory condition, not a
//! failure: upstream source drift should surface as a build failure later
//! rather than abort here. The ordering is not interchangeable — the
//! annotation patches assume the macro block injected into the
//! generated-headers template by an earlier patch.

use crate::stage::StageOutcome;
use regex::RegexBuilder;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// One textual transformation of a single file.
#[derive(Debug, Clone)]
pub enum Transform {
    /// Exact substring replacement. An absent needle is a no-op, not an
    /// error: the transform is tolerant of already-patched trees.
    Replace {
        needle: &'static str,
        replacement: &'static str,
    },
    /// Multiline regular-expression replacement. No match is advisory:
    /// a warning is logged together with diagnostic context lines.
    RegexReplace {
        pattern: &'static str,
        replacement: &'static str,
        /// Substring used to locate and dump context lines when the
        /// pattern fails to match.
        hint: &'static str,
    },
    /// Insert a fixed block immediately before the LAST occurrence of
    /// `marker`. Skipped when `signature` is already present, so applying
    /// the patch twice leaves the file unchanged.
    InsertBeforeLast {
        marker: &'static str,
        block: &'static str,
        signature: &'static str,
    },
}

/// A transformation bound to a file inside the source tree.
#[derive(Debug, Clone)]
pub struct Patch {
    /// Path relative to the source tree root
    pub file: &'static str,
    pub summary: &'static str,
    pub transform: Transform,
}

/// Export macro block injected into the generated-headers template.
///
/// `CMAKE_WINDOWS_EXPORT_ALL_SYMBOLS` covers functions but not static data
/// members, so translation units that define them need explicit annotations.
const EXPORT_MACRO_BLOCK: &str = r#"
// Symbol export annotations for shared-library builds. Export-all covers
// functions but not private static data members, which must be annotated
// explicitly at their declarations.
#if defined(_MSC_VER) && defined(CERES_BUILDING_SHARED_LIBRARY)
#define CERES_EXPORT __declspec(dllexport)
#define CERES_EXPORT_INTERNAL __declspec(dllexport)
#elif defined(_MSC_VER) && defined(CERES_USING_SHARED_LIBRARY)
#define CERES_EXPORT __declspec(dllimport)
#define CERES_EXPORT_INTERNAL
#else
#define CERES_EXPORT
#define CERES_EXPORT_INTERNAL
#endif
"#;

/// The fixed, ordered patch list enabling the shared-library configuration.
pub fn shared_build_patches() -> Vec<Patch> {
    vec![
        Patch {
            file: "CMakeLists.txt",
            summary: "remove the configure-time guard against shared builds on Windows",
            transform: Transform::RegexReplace {
                pattern: r"(?s)if \(WIN32 AND BUILD_SHARED_LIBS\).*?endif\(\)\n",
                replacement: "",
                hint: "BUILD_SHARED_LIBS",
            },
        },
        Patch {
            file: "internal/ceres/CMakeLists.txt",
            summary: "export all symbols from the ceres target by default",
            transform: Transform::Replace {
                needle: "add_library(ceres ${CERES_LIBRARY_SOURCE})",
                replacement: "add_library(ceres ${CERES_LIBRARY_SOURCE})\n\
                              set_target_properties(ceres PROPERTIES WINDOWS_EXPORT_ALL_SYMBOLS ON)",
            },
        },
        Patch {
            file: "include/ceres/internal/config.h.in",
            summary: "inject export macro definitions into the generated-headers template",
            transform: Transform::InsertBeforeLast {
                marker: "#endif",
                block: EXPORT_MACRO_BLOCK,
                signature: "#define CERES_EXPORT_INTERNAL",
            },
        },
        // The annotation patches below rely on the macro block injected above.
        Patch {
            file: "include/ceres/problem.h",
            summary: "annotate Problem for export across the shared-library boundary",
            transform: Transform::RegexReplace {
                pattern: r"(?m)^class Problem \{$",
                replacement: "class CERES_EXPORT Problem {",
                hint: "class Problem",
            },
        },
        Patch {
            file: "include/ceres/solver.h",
            summary: "annotate Solver for export across the shared-library boundary",
            transform: Transform::RegexReplace {
                pattern: r"(?m)^class Solver \{$",
                replacement: "class CERES_EXPORT Solver {",
                hint: "class Solver",
            },
        },
    ]
}

/// Applies patches to files under a source tree root.
pub struct Patcher<'a> {
    root: &'a Path,
}

impl<'a> Patcher<'a> {
    pub fn new(root: &'a Path) -> Self {
        Self { root }
    }

    /// Apply every patch in order, returning one outcome per patch.
    ///
    /// Warnings never stop the sequence; the caller decides what a `Fatal`
    /// outcome means for the run.
    pub fn apply_all(&self, patches: &[Patch]) -> Vec<StageOutcome> {
        patches
            .iter()
            .map(|patch| {
                let outcome = self.apply(patch);
                match &outcome {
                    StageOutcome::Ok => info!("patched {}: {}", patch.file, patch.summary),
                    StageOutcome::Warning(detail) => {
                        warn!("patch skipped for {}: {}", patch.file, detail)
                    }
                    StageOutcome::Fatal(detail) => {
                        warn!("patch failed for {}: {}", patch.file, detail)
                    }
                }
                outcome
            })
            .collect()
    }

    /// Apply a single patch.
    pub fn apply(&self, patch: &Patch) -> StageOutcome {
        let path = self.root.join(patch.file);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return StageOutcome::Warning(format!(
                    "target file not found: {}",
                    path.display()
                ));
            }
            Err(e) => {
                return StageOutcome::Fatal(format!("cannot read {}: {}", path.display(), e));
            }
        };

        let (patched, outcome) = match &patch.transform {
            Transform::Replace {
                needle,
                replacement,
            } => {
                if content.contains(needle) {
                    (content.replace(needle, replacement), StageOutcome::Ok)
                } else {
                    // Absent needle is a deliberate no-op: the tree may
                    // already carry the replacement.
                    debug!("substring not present in {}, nothing to do", patch.file);
                    return StageOutcome::Ok;
                }
            }
            Transform::RegexReplace {
                pattern,
                replacement,
                hint,
            } => {
                let re = RegexBuilder::new(pattern)
                    .multi_line(true)
                    .build()
                    .expect("patch patterns are fixed and must compile");

                if re.is_match(&content) {
                    (
                        re.replace_all(&content, *replacement).into_owned(),
                        StageOutcome::Ok,
                    )
                } else {
                    dump_context(patch.file, &content, hint);
                    return StageOutcome::Warning(format!(
                        "pattern matched nothing: {}",
                        pattern
                    ));
                }
            }
            Transform::InsertBeforeLast {
                marker,
                block,
                signature,
            } => {
                if content.contains(signature) {
                    debug!("signature already present in {}, nothing to do", patch.file);
                    return StageOutcome::Ok;
                }
                match content.rfind(marker) {
                    Some(pos) => {
                        let mut patched = String::with_capacity(content.len() + block.len());
                        patched.push_str(&content[..pos]);
                        patched.push_str(block);
                        patched.push_str(&content[pos..]);
                        (patched, StageOutcome::Ok)
                    }
                    None => {
                        dump_context(patch.file, &content, marker);
                        return StageOutcome::Warning(format!(
                            "marker {:?} not found",
                            marker
                        ));
                    }
                }
            }
        };

        if let Err(e) = fs::write(&path, patched) {
            return StageOutcome::Fatal(format!("cannot write {}: {}", path.display(), e));
        }

        outcome
    }
}

/// Log the lines surrounding the expected patch site, so drift in the
/// upstream source can be diagnosed from the run log alone.
fn dump_context(file: &str, content: &str, hint: &str) {
    let matching: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .filter(|(_, line)| line.contains(hint))
        .take(10)
        .collect();

    if matching.is_empty() {
        warn!("{}: no lines containing {:?}", file, hint);
    } else {
        for (idx, line) in matching {
            warn!("{}:{}: {}", file, idx + 1, line.trim_end());
        }
    }
}
