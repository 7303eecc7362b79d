// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! `file_write`: creates parent directories, then writes capped content.
//!
//! The 1 MiB cap itself is enforced by the caller (the Validator, spec
//! §4.2 step 6, before the handler ever runs) — this module just performs
//! the write, matching the original behavior of creating parent
//! directories first.

use crew_core::ActionResult;
use std::path::Path;

pub const MAX_FILE_WRITE_BYTES: usize = 1024 * 1024;

pub async fn file_write(path: &Path, content: &str) -> ActionResult {
    if let Some(parent) = path.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            return ActionResult { returncode: -1, stdout: String::new(), stderr: format!("mkdir failed: {e}") };
        }
    }
    match tokio::fs::write(path, content).await {
        Ok(()) => ActionResult::success(format!("wrote {} bytes to {}", content.len(), path.display()), ""),
        Err(e) => ActionResult { returncode: -1, stdout: String::new(), stderr: format!("write failed: {e}") },
    }
}

#[cfg(test)]
#[path = "files_tests.rs"]
mod tests;
