use super::*;
use std::time::Duration;
use tempfile::tempdir;
use yare::parameterized;

#[parameterized(
    plain = {"myapp", true},
    with_tag_and_registry = {"registry.example.com/myapp:1.0", true},
    contains_space = {"my app", false},
    empty = {"", false},
)]
fn tag_validity(tag: &str, expected: bool) {
    assert_eq!(is_valid_docker_tag(tag), expected);
}

#[tokio::test]
async fn docker_build_rejects_bad_tag_before_spawn() {
    let dir = tempdir().unwrap();
    let result = docker_build(dir.path(), "bad tag", Duration::from_secs(5)).await;
    assert_eq!(result.returncode, -1);
    assert!(result.stderr.contains("invalid docker tag"));
}
