// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

use super::*;

#[test]
fn frame_within_limit_passes() {
    assert!(check_frame_size(b"hello", 10).is_ok());
}

#[test]
fn frame_over_limit_is_rejected() {
    let err = check_frame_size(b"hello world", 5).unwrap_err();
    match err {
        ProtocolError::TooLarge { max, actual } => {
            assert_eq!(max, 5);
            assert_eq!(actual, 11);
        }
        _ => panic!("expected TooLarge"),
    }
}

#[test]
fn malformed_json_wraps_serde_error() {
    let result: Result<serde_json::Value, _> = serde_json::from_str("not json");
    let err: ProtocolError = result.unwrap_err().into();
    assert!(matches!(err, ProtocolError::Malformed(_)));
}
