use super::*;
use std::time::Duration;
use tempfile::tempdir;

fn init_repo(dir: &Path) {
    std::process::Command::new("git").arg("init").arg("-q").current_dir(dir).status().unwrap();
    std::process::Command::new("git").args(["config", "user.email", "a@b.c"]).current_dir(dir).status().unwrap();
    std::process::Command::new("git").args(["config", "user.name", "Test"]).current_dir(dir).status().unwrap();
}

#[tokio::test]
async fn git_status_on_clean_repo_succeeds() {
    let dir = tempdir().unwrap();
    init_repo(dir.path());
    let result = git_status(dir.path(), Duration::from_secs(10)).await;
    assert_eq!(result.returncode, 0);
}

#[tokio::test]
async fn git_commit_creates_a_commit() {
    let dir = tempdir().unwrap();
    init_repo(dir.path());
    std::fs::write(dir.path().join("a.txt"), "content").unwrap();
    std::process::Command::new("git").args(["add", "."]).current_dir(dir.path()).status().unwrap();

    let result = git_commit(dir.path(), "add a.txt", Duration::from_secs(10)).await;
    assert_eq!(result.returncode, 0);
}
