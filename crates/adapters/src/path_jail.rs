// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Path jail: every filesystem parameter must canonically resolve under
//! one of the configured `ALLOWED_ROOTS`. Rejects symlink escape, `..`
//! traversal, and drive changes (spec §4.2 step 5).

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("path outside allowed roots: {0}")]
pub struct PathJailError(pub String);

/// Resolves `candidate` (joined to `base` if relative) to its canonical
/// form and checks that it falls under one of `allowed_roots`.
///
/// Canonicalization follows symlinks and normalizes `..`, so a symlink
/// planted inside an allowed root that points outside it is still
/// rejected — the check is against the *resolved* path, never the
/// textual one.
pub fn resolve_within_jail(
    base: &Path,
    candidate: &str,
    allowed_roots: &[PathBuf],
) -> Result<PathBuf, PathJailError> {
    let raw = Path::new(candidate);
    let joined = if raw.is_absolute() { raw.to_path_buf() } else { base.join(raw) };

    let canonical = canonicalize_best_effort(&joined);

    let canonical_roots: Vec<PathBuf> = allowed_roots.iter().map(|r| canonicalize_best_effort(r)).collect();

    if canonical_roots.iter().any(|root| canonical.starts_with(root)) {
        Ok(canonical)
    } else {
        Err(PathJailError(candidate.to_string()))
    }
}

/// `canonicalize()` requires the path to exist. For paths that don't exist
/// yet (e.g. a file about to be written), canonicalize the longest existing
/// ancestor and re-append the remaining, lexically-normalized components.
fn canonicalize_best_effort(path: &Path) -> PathBuf {
    if let Ok(c) = path.canonicalize() {
        return c;
    }
    let mut existing = path;
    let mut tail = Vec::new();
    loop {
        match existing.parent() {
            Some(parent) => {
                if let Some(name) = existing.file_name() {
                    tail.push(name.to_owned());
                }
                existing = parent;
                if let Ok(c) = existing.canonicalize() {
                    let mut result = c;
                    for component in tail.into_iter().rev() {
                        result.push(component);
                    }
                    return normalize_lexically(&result);
                }
            }
            None => return normalize_lexically(path),
        }
    }
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            std::path::Component::ParentDir => {
                out.pop();
            }
            std::path::Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
#[path = "path_jail_tests.rs"]
mod tests;
