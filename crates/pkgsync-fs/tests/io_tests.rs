use pkgsync_fs::{Error, NormalizedPath, io};
use std::fs;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tempfile::TempDir;

fn set_mtime(path: &std::path::Path, secs: u64) {
    let file = fs::OpenOptions::new().write(true).open(path).unwrap();
    file.set_modified(UNIX_EPOCH + Duration::from_secs(secs))
        .unwrap();
}

#[test]
fn test_write_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("test.txt"));

    io::write_atomic(&path, b"hello world").unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "hello world");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("test.txt");
    fs::write(&file_path, "original").unwrap();

    let path = NormalizedPath::new(&file_path);
    io::write_atomic(&path, b"updated").unwrap();

    let content = fs::read_to_string(&file_path).unwrap();
    assert_eq!(content, "updated");
}

#[test]
fn test_write_atomic_leaves_no_temp_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("state.json"));

    io::write_atomic(&path, b"{}").unwrap();

    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "temp files left behind: {:?}", leftovers);
}

#[test]
fn test_read_text_nonexistent_file() {
    let path = NormalizedPath::new("/nonexistent/file.txt");
    let result = io::read_text(&path);
    assert!(matches!(result, Err(Error::Io { .. })));
}

#[test]
fn test_copy_preserving_keeps_mtime() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source.json");
    let target = temp.path().join("target.json");
    fs::write(&source, "{\"a\": 1}").unwrap();
    set_mtime(&source, 1_600_000_000);

    let bytes = io::copy_preserving(&source, &target).unwrap();

    assert_eq!(bytes, 8);
    assert_eq!(fs::read_to_string(&target).unwrap(), "{\"a\": 1}");
    let source_mtime = fs::metadata(&source).unwrap().modified().unwrap();
    let target_mtime = fs::metadata(&target).unwrap().modified().unwrap();
    assert_eq!(source_mtime, target_mtime);
}

#[test]
fn test_copy_preserving_overwrites_newer_target() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source.json");
    let target = temp.path().join("target.json");
    fs::write(&source, "old").unwrap();
    fs::write(&target, "new").unwrap();
    set_mtime(&source, 1_000);

    io::copy_preserving(&source, &target).unwrap();

    assert_eq!(fs::read_to_string(&target).unwrap(), "old");
    let target_mtime = fs::metadata(&target).unwrap().modified().unwrap();
    assert_eq!(target_mtime, UNIX_EPOCH + Duration::from_secs(1_000));
}

#[test]
fn test_copy_preserving_read_only_source() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("locked.json");
    let target = temp.path().join("copy.json");
    fs::write(&source, "locked").unwrap();
    set_mtime(&source, 2_000);
    let mut perms = fs::metadata(&source).unwrap().permissions();
    perms.set_readonly(true);
    fs::set_permissions(&source, perms).unwrap();

    io::copy_preserving(&source, &target).unwrap();

    let meta = fs::metadata(&target).unwrap();
    assert!(meta.permissions().readonly());
    assert_eq!(
        meta.modified().unwrap(),
        UNIX_EPOCH + Duration::from_secs(2_000)
    );
}

#[test]
fn test_copy_preserving_missing_source_fails() {
    let temp = TempDir::new().unwrap();
    let result = io::copy_preserving(&temp.path().join("nope"), &temp.path().join("out"));
    assert!(result.is_err());
    assert!(!temp.path().join("out").exists());
}

#[test]
fn test_remove_file_if_exists() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("gone.json");
    fs::write(&file, "x").unwrap();

    assert!(io::remove_file_if_exists(&file).unwrap());
    assert!(!file.exists());
    assert!(!io::remove_file_if_exists(&file).unwrap());
}

#[test]
fn test_remove_file_if_exists_ignores_directories() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("folder");
    fs::create_dir(&dir).unwrap();

    assert!(!io::remove_file_if_exists(&dir).unwrap());
    assert!(dir.is_dir());
}

#[test]
fn test_ensure_parent_dir_creates_one_level() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("snippets").join("rust.json");

    assert!(io::ensure_parent_dir(&target).unwrap());
    assert!(temp.path().join("snippets").is_dir());
    assert!(!io::ensure_parent_dir(&target).unwrap());
}

#[test]
fn test_ensure_parent_dir_refuses_two_levels() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("a").join("b").join("c.json");

    let result = io::ensure_parent_dir(&target);

    assert!(matches!(result, Err(Error::MissingParent { .. })));
    assert!(!temp.path().join("a").exists());
}

#[test]
fn test_copy_time_is_not_now() {
    // A plain byte copy would stamp the target with the current time.
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("s");
    let target = temp.path().join("t");
    fs::write(&source, "s").unwrap();
    set_mtime(&source, 10);

    io::copy_preserving(&source, &target).unwrap();

    let age = SystemTime::now()
        .duration_since(fs::metadata(&target).unwrap().modified().unwrap())
        .unwrap();
    assert!(age > Duration::from_secs(60 * 60 * 24 * 365));
}
