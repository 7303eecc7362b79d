// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

use thiserror::Error;

/// Errors decoding a channel frame.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("frame exceeds maximum size of {max} bytes ({actual} bytes)")]
    TooLarge { max: usize, actual: usize },
}

/// Rejects a frame before it is even parsed, bounding memory use against a
/// misbehaving or malicious peer.
pub fn check_frame_size(bytes: &[u8], max: usize) -> Result<(), ProtocolError> {
    if bytes.len() > max {
        return Err(ProtocolError::TooLarge { max, actual: bytes.len() });
    }
    Ok(())
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
