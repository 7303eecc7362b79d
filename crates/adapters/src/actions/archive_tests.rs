use super::*;
use tempfile::tempdir;

#[tokio::test]
async fn zips_project_directory() {
    let project = tempdir().unwrap();
    std::fs::write(project.path().join("a.txt"), "hello").unwrap();
    std::fs::create_dir(project.path().join("sub")).unwrap();
    std::fs::write(project.path().join("sub/b.txt"), "world").unwrap();

    let out = tempdir().unwrap().path().join("out.zip");
    let result = zip_project(project.path(), &out).await;
    assert_eq!(result.returncode, 0);
    assert!(out.exists());

    let archive = zip::ZipArchive::new(std::fs::File::open(&out).unwrap()).unwrap();
    assert_eq!(archive.len(), 2);
}

#[tokio::test]
async fn aborts_when_exceeding_cap() {
    let project = tempdir().unwrap();
    let big = vec![0u8; (MAX_ZIP_OUTPUT_BYTES + 1) as usize];
    std::fs::write(project.path().join("big.bin"), &big).unwrap();

    let out = tempdir().unwrap().path().join("out.zip");
    let result = zip_project(project.path(), &out).await;
    assert_eq!(result.returncode, -1);
    assert!(result.stderr.contains("exceeded"));
    assert!(!out.exists());
}
