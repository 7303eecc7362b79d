// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Fixed-argument subprocess execution for action handlers.
//!
//! Every handler in [`crate::actions`] routes through [`run`]. There is no
//! shell invocation anywhere in this module: the binary and its arguments
//! are always a pre-built `Vec<String>`, never a string a handler formats
//! from caller-controlled parameters.

use crew_core::ActionResult;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

/// stdout is truncated at this many bytes before being returned (spec §4.2 step 6).
pub const STDOUT_CAP: usize = 8 * 1024;
/// stderr is truncated at this many bytes before being returned (spec §4.2 step 6).
pub const STDERR_CAP: usize = 4 * 1024;

/// Runs `argv[0] argv[1..]` in `cwd`, killing the process tree if it runs
/// longer than `timeout`. Never raises on a non-zero exit: the returncode
/// flows back to the caller unchanged (spec §4.2, "Handler contract").
pub async fn run(argv: &[String], cwd: &Path, timeout: Duration) -> ActionResult {
    let Some((program, args)) = argv.split_first() else {
        return ActionResult { returncode: -1, stdout: String::new(), stderr: "empty argv".to_string() };
    };

    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => return ActionResult { returncode: -1, stdout: String::new(), stderr: format!("spawn failed: {e}") },
    };

    let mut stdout_pipe = child.stdout.take();
    let mut stderr_pipe = child.stderr.take();

    let collect = async {
        let mut stdout_buf = Vec::new();
        let mut stderr_buf = Vec::new();
        if let Some(mut out) = stdout_pipe.take() {
            let _ = out.read_to_end(&mut stdout_buf).await;
        }
        if let Some(mut err) = stderr_pipe.take() {
            let _ = err.read_to_end(&mut stderr_buf).await;
        }
        let status = child.wait().await;
        (status, stdout_buf, stderr_buf)
    };

    match tokio::time::timeout(timeout, collect).await {
        Ok((status, stdout_buf, stderr_buf)) => {
            let returncode = status.ok().and_then(|s| s.code()).unwrap_or(-1);
            ActionResult {
                returncode,
                stdout: truncate_utf8(&stdout_buf, STDOUT_CAP),
                stderr: truncate_utf8(&stderr_buf, STDERR_CAP),
            }
        }
        Err(_) => ActionResult { returncode: -1, stdout: String::new(), stderr: "timed out".to_string() },
    }
}

fn truncate_utf8(bytes: &[u8], cap: usize) -> String {
    let slice = if bytes.len() > cap { &bytes[..cap] } else { bytes };
    String::from_utf8_lossy(slice).into_owned()
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
