// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! `zip_project`: streams project files into a zip archive, aborting once
//! the running archive size would exceed the cap (spec §8 boundary case).

use crew_core::ActionResult;
use std::io::Write;
use std::path::Path;

pub const MAX_ZIP_OUTPUT_BYTES: u64 = 10 * 1024 * 1024;

pub async fn zip_project(project_dir: &Path, output_path: &Path) -> ActionResult {
    let project_dir = project_dir.to_path_buf();
    let output_path = output_path.to_path_buf();
    tokio::task::spawn_blocking(move || zip_project_blocking(&project_dir, &output_path))
        .await
        .unwrap_or_else(|e| ActionResult { returncode: -1, stdout: String::new(), stderr: format!("zip task panicked: {e}") })
}

fn zip_project_blocking(project_dir: &Path, output_path: &Path) -> ActionResult {
    let file = match std::fs::File::create(output_path) {
        Ok(f) => f,
        Err(e) => return ActionResult { returncode: -1, stdout: String::new(), stderr: format!("create failed: {e}") },
    };

    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut written: u64 = 0;
    let mut file_count = 0u32;

    for entry in walkdir::WalkDir::new(project_dir).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = match entry.path().strip_prefix(project_dir) {
            Ok(r) => r,
            Err(_) => continue,
        };
        let Some(name) = rel.to_str() else { continue };

        let contents = match std::fs::read(entry.path()) {
            Ok(c) => c,
            Err(_) => continue,
        };

        written += contents.len() as u64;
        if written > MAX_ZIP_OUTPUT_BYTES {
            let _ = writer.finish();
            let _ = std::fs::remove_file(output_path);
            return ActionResult {
                returncode: -1,
                stdout: String::new(),
                stderr: format!("zip_project aborted: archive exceeded {MAX_ZIP_OUTPUT_BYTES} bytes"),
            };
        }

        if writer.start_file(name, options).is_err() {
            continue;
        }
        if writer.write_all(&contents).is_err() {
            continue;
        }
        file_count += 1;
    }

    match writer.finish() {
        Ok(_) => ActionResult::success(format!("zipped {file_count} files to {}", output_path.display()), ""),
        Err(e) => ActionResult { returncode: -1, stdout: String::new(), stderr: format!("finish failed: {e}") },
    }
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
